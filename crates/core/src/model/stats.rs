use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ItemId;

/// Number of correct answers after which an item counts as learned in the
/// aggregate statistics.
pub const LEARNED_THRESHOLD: u32 = 3;

/// Per-item answer history keyed by id.
///
/// A `BTreeMap` keeps iteration (and therefore the persisted pair list)
/// deterministically ordered.
pub type StatsMap = BTreeMap<ItemId, ItemStats>;

//
// ─── ITEM STATS ────────────────────────────────────────────────────────────────
//

/// Mutable per-item answer history.
///
/// Created lazily on an item's first answer and updated on every subsequent
/// one. `next_review_at` is always recomputed from the latest answer, never
/// accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    pub item_id: ItemId,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub last_seen_at: DateTime<Utc>,
    pub next_review_at: DateTime<Utc>,
}

impl ItemStats {
    /// Total number of recorded answers for this item.
    #[must_use]
    pub fn total_answered(&self) -> u32 {
        self.correct_count + self.incorrect_count
    }

    /// An item is due once its scheduled review time has passed.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }

    /// Mastered items count toward tier mastery: at least one correct answer
    /// and no worse than an even correct/incorrect ratio.
    #[must_use]
    pub fn is_mastered(&self) -> bool {
        self.correct_count > 0 && self.correct_count >= self.incorrect_count
    }

    /// Learned items are reported in the aggregate statistics view.
    #[must_use]
    pub fn is_learned(&self) -> bool {
        self.correct_count >= LEARNED_THRESHOLD
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
