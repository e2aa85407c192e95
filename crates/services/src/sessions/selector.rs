use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use vocab_core::model::{Catalog, StatsMap, VocabItem};
use vocab_core::unlock;

use super::round::Round;

/// Upper bound on items per round.
pub const ROUND_SIZE: usize = 5;

/// Draws bounded, randomized practice rounds from the eligible pool.
///
/// Owns its random source so callers can seed it for reproducible rounds;
/// by default it seeds from OS entropy.
pub struct RoundSelector {
    catalog: Arc<Catalog>,
    rng: StdRng,
}

impl RoundSelector {
    /// Selector with an OS-seeded random source.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Selector with a fixed seed, for reproducible selection.
    #[must_use]
    pub fn with_seed(catalog: Arc<Catalog>, seed: u64) -> Self {
        Self {
            catalog,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Draws the next round from the current history.
    ///
    /// Pool construction: items of unlocked tiers, narrowed to due ones
    /// (never answered, or review time passed). When that leaves fewer than
    /// `ROUND_SIZE` items the due filter is dropped so a round can always be
    /// formed from the unlocked tiers. Locked tiers never contribute, even
    /// in the fallback. `min(ROUND_SIZE, pool)` items are drawn uniformly
    /// without replacement, and the target column gets its own independent
    /// shuffle of the same items.
    ///
    /// An empty catalog yields an empty round.
    pub fn select_round(&mut self, stats: &StatsMap, now: DateTime<Utc>) -> Round {
        let tiers = unlock::available_tiers(&self.catalog, stats);

        let available: Vec<&VocabItem> = self
            .catalog
            .items()
            .iter()
            .filter(|item| tiers.contains(&item.tier()))
            .collect();

        let due: Vec<&VocabItem> = available
            .iter()
            .copied()
            .filter(|item| stats.get(item.id()).is_none_or(|s| s.is_due(now)))
            .collect();

        let mut pool = if due.len() < ROUND_SIZE { available } else { due };

        pool.shuffle(&mut self.rng);
        pool.truncate(ROUND_SIZE);

        let source: Vec<VocabItem> = pool.into_iter().cloned().collect();
        let mut target = source.clone();
        target.shuffle(&mut self.rng);

        Round::new(source, target)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
