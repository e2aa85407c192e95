//! Progressive tier unlocking.
//!
//! Everything here is recomputed from the current stats on every call. There
//! is deliberately no cached unlock state: if mastery of a lower tier drops
//! back below a threshold, the dependent tier locks again.

use crate::model::{Catalog, ItemStats, StatsMap, Tier};

/// Easy-tier mastery required before medium items appear.
pub const MEDIUM_UNLOCK_EASY_MASTERY: f64 = 30.0;
/// Medium-tier mastery required before hard items appear.
pub const HARD_UNLOCK_MEDIUM_MASTERY: f64 = 70.0;
/// Easy-tier mastery additionally required before hard items appear.
pub const HARD_UNLOCK_EASY_MASTERY: f64 = 50.0;

/// Percentage of a tier's items that are currently mastered, in `[0, 100]`.
///
/// An empty tier reports `0.0`.
#[must_use]
pub fn mastery_percentage(catalog: &Catalog, stats: &StatsMap, tier: Tier) -> f64 {
    let mut total = 0usize;
    let mut mastered = 0usize;

    for item in catalog.items_in_tier(tier) {
        total += 1;
        if stats.get(item.id()).is_some_and(ItemStats::is_mastered) {
            mastered += 1;
        }
    }

    if total == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let pct = (mastered as f64 / total as f64) * 100.0;
    pct
}

/// Tiers currently eligible for selection, in unlock order.
///
/// `Easy` is always present; the others depend on live mastery percentages.
#[must_use]
pub fn available_tiers(catalog: &Catalog, stats: &StatsMap) -> Vec<Tier> {
    let easy = mastery_percentage(catalog, stats, Tier::Easy);
    let medium = mastery_percentage(catalog, stats, Tier::Medium);

    let mut available = vec![Tier::Easy];
    if easy >= MEDIUM_UNLOCK_EASY_MASTERY {
        available.push(Tier::Medium);
    }
    if medium >= HARD_UNLOCK_MEDIUM_MASTERY && easy >= HARD_UNLOCK_EASY_MASTERY {
        available.push(Tier::Hard);
    }
    available
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemId, ItemStats, VocabItem};
    use crate::time::fixed_now;

    fn catalog(easy: usize, medium: usize, hard: usize) -> Catalog {
        let mut items = Vec::new();
        for i in 0..easy {
            items.push(VocabItem::new(
                ItemId::new(format!("e{i}")),
                format!("easy {i}"),
                format!("fácil {i}"),
                Tier::Easy,
            ));
        }
        for i in 0..medium {
            items.push(VocabItem::new(
                ItemId::new(format!("m{i}")),
                format!("medium {i}"),
                format!("medio {i}"),
                Tier::Medium,
            ));
        }
        for i in 0..hard {
            items.push(VocabItem::new(
                ItemId::new(format!("h{i}")),
                format!("hard {i}"),
                format!("difícil {i}"),
                Tier::Hard,
            ));
        }
        Catalog::new(items).unwrap()
    }

    fn mastered(id: &str) -> (ItemId, ItemStats) {
        let id = ItemId::new(id);
        (
            id.clone(),
            ItemStats {
                item_id: id,
                correct_count: 1,
                incorrect_count: 0,
                last_seen_at: fixed_now(),
                next_review_at: fixed_now(),
            },
        )
    }

    fn struggling(id: &str) -> (ItemId, ItemStats) {
        let id = ItemId::new(id);
        (
            id.clone(),
            ItemStats {
                item_id: id,
                correct_count: 1,
                incorrect_count: 3,
                last_seen_at: fixed_now(),
                next_review_at: fixed_now(),
            },
        )
    }

    #[test]
    fn empty_tier_reports_zero() {
        let catalog = catalog(2, 0, 0);
        let stats = StatsMap::new();
        assert_eq!(mastery_percentage(&catalog, &stats, Tier::Medium), 0.0);
    }

    #[test]
    fn mastery_counts_only_mastered_items() {
        let catalog = catalog(4, 0, 0);
        let stats: StatsMap = [mastered("e0"), mastered("e1"), struggling("e2")]
            .into_iter()
            .collect();

        let pct = mastery_percentage(&catalog, &stats, Tier::Easy);
        assert_eq!(pct, 50.0);
        assert!((0.0..=100.0).contains(&pct));
    }

    #[test]
    fn easy_is_always_available() {
        let catalog = catalog(3, 3, 3);
        assert_eq!(available_tiers(&catalog, &StatsMap::new()), vec![Tier::Easy]);
    }

    #[test]
    fn medium_unlocks_at_thirty_percent_easy() {
        let catalog = catalog(10, 5, 5);

        let below: StatsMap = [mastered("e0"), mastered("e1")].into_iter().collect();
        assert_eq!(available_tiers(&catalog, &below), vec![Tier::Easy]);

        let at: StatsMap = [mastered("e0"), mastered("e1"), mastered("e2")]
            .into_iter()
            .collect();
        assert_eq!(available_tiers(&catalog, &at), vec![Tier::Easy, Tier::Medium]);
    }

    #[test]
    fn hard_needs_both_thresholds() {
        let catalog = catalog(2, 2, 2);

        // 100% easy, 50% medium: hard stays locked.
        let partial: StatsMap = [mastered("e0"), mastered("e1"), mastered("m0")]
            .into_iter()
            .collect();
        assert_eq!(
            available_tiers(&catalog, &partial),
            vec![Tier::Easy, Tier::Medium]
        );

        // 100% easy, 100% medium: everything open.
        let full: StatsMap = [
            mastered("e0"),
            mastered("e1"),
            mastered("m0"),
            mastered("m1"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            available_tiers(&catalog, &full),
            vec![Tier::Easy, Tier::Medium, Tier::Hard]
        );
    }

    #[test]
    fn regressed_mastery_relocks_tiers() {
        let catalog = catalog(2, 2, 0);

        let unlocked: StatsMap = [mastered("e0")].into_iter().collect();
        assert_eq!(
            available_tiers(&catalog, &unlocked),
            vec![Tier::Easy, Tier::Medium]
        );

        // The same item drifting below an even ratio takes medium away again.
        let regressed: StatsMap = [struggling("e0")].into_iter().collect();
        assert_eq!(available_tiers(&catalog, &regressed), vec![Tier::Easy]);
    }
}
