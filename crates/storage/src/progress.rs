use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vocab_core::model::{ItemId, ItemStats, StatsMap};

use crate::kv::{InMemoryStore, KeyValueStore};

const STATS_KEY: &str = "vocab_trainer_stats";
const TOTAL_PLAYS_KEY: &str = "vocab_trainer_total_plays";
const TOTAL_CORRECT_KEY: &str = "vocab_trainer_total_correct";

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Read-only aggregate view over the stored history.
///
/// Everything except `total_plays` is recomputed from the stats blob on each
/// call; only the round counters are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total_plays: u64,
    pub total_answered: u64,
    pub total_correct: u64,
    pub total_incorrect: u64,
    /// Rounded percentage of answers that were correct; 0 when nothing has
    /// been answered yet.
    pub accuracy: u32,
    pub words_learned: usize,
}

//
// ─── PROGRESS STORE ────────────────────────────────────────────────────────────
//

/// Owns all persisted progress: per-item stats and the round counters.
///
/// Built entirely on the three `KeyValueStore` primitives. Persistence
/// failures never reach callers: reads fall back to empty/zero state and
/// writes are logged and dropped, so a broken backend degrades the app to a
/// fresh-profile experience instead of crashing it.
#[derive(Clone)]
pub struct ProgressStore {
    backend: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Store backed by process-local memory, for tests and ephemeral runs.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    //
    // ─── ITEM STATS ────────────────────────────────────────────────────────
    //

    /// Loads all per-item stats; missing or corrupt data yields an empty map.
    #[must_use]
    pub fn item_stats(&self) -> StatsMap {
        let raw = match self.backend.get(STATS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StatsMap::new(),
            Err(err) => {
                tracing::warn!(%err, "failed to read stats blob, treating as empty");
                return StatsMap::new();
            }
        };

        match serde_json::from_str::<Vec<(ItemId, ItemStats)>>(&raw) {
            Ok(pairs) => pairs.into_iter().collect(),
            Err(err) => {
                tracing::warn!(%err, "corrupt stats blob, treating as empty");
                StatsMap::new()
            }
        }
    }

    /// Persists the full stats map as an ordered list of `(id, stats)` pairs.
    pub fn save_item_stats(&self, stats: &StatsMap) {
        let pairs: Vec<(_, _)> = stats.iter().collect();
        let json = match serde_json::to_string(&pairs) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(%err, "failed to serialize stats blob");
                return;
            }
        };
        if let Err(err) = self.backend.set(STATS_KEY, &json) {
            tracing::warn!(%err, "failed to persist stats blob");
        }
    }

    /// Read-modify-write update of a single item's stats.
    pub fn upsert_item(&self, stats: ItemStats) {
        let mut map = self.item_stats();
        map.insert(stats.item_id.clone(), stats);
        self.save_item_stats(&map);
    }

    //
    // ─── ROUND COUNTERS ────────────────────────────────────────────────────
    //

    /// Number of fully completed rounds.
    #[must_use]
    pub fn total_plays(&self) -> u64 {
        self.read_counter(TOTAL_PLAYS_KEY)
    }

    /// Running total of matches made in completed rounds.
    #[must_use]
    pub fn total_correct_in_rounds(&self) -> u64 {
        self.read_counter(TOTAL_CORRECT_KEY)
    }

    /// Bumps both counters for one fully matched round.
    ///
    /// Called exactly once per completed round, never per answer.
    pub fn record_round_completion(&self, round_len: usize) {
        self.write_counter(TOTAL_PLAYS_KEY, self.total_plays() + 1);
        self.write_counter(
            TOTAL_CORRECT_KEY,
            self.total_correct_in_rounds() + round_len as u64,
        );
    }

    fn read_counter(&self, key: &str) -> u64 {
        match self.backend.get(key) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(key, raw = %raw, "corrupt counter, treating as zero");
                0
            }),
            Ok(None) => 0,
            Err(err) => {
                tracing::warn!(key, %err, "failed to read counter, treating as zero");
                0
            }
        }
    }

    fn write_counter(&self, key: &str, value: u64) {
        if let Err(err) = self.backend.set(key, &value.to_string()) {
            tracing::warn!(key, %err, "failed to persist counter");
        }
    }

    //
    // ─── AGGREGATES ────────────────────────────────────────────────────────
    //

    /// Recomputes the derived statistics view from the current history.
    #[must_use]
    pub fn summary(&self) -> ProgressSummary {
        let stats = self.item_stats();

        let total_correct: u64 = stats.values().map(|s| u64::from(s.correct_count)).sum();
        let total_incorrect: u64 = stats.values().map(|s| u64::from(s.incorrect_count)).sum();
        let total_answered = total_correct + total_incorrect;

        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let accuracy = if total_answered > 0 {
            ((total_correct as f64 / total_answered as f64) * 100.0).round() as u32
        } else {
            0
        };

        ProgressSummary {
            total_plays: self.total_plays(),
            total_answered,
            total_correct,
            total_incorrect,
            accuracy,
            words_learned: stats.values().filter(|s| s.is_learned()).count(),
        }
    }

    /// Clears all per-item stats and round counters.
    pub fn reset(&self) {
        for key in [STATS_KEY, TOTAL_PLAYS_KEY, TOTAL_CORRECT_KEY] {
            if let Err(err) = self.backend.delete(key) {
                tracing::warn!(key, %err, "failed to clear key during reset");
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::ItemId;
    use vocab_core::scheduler::Scheduler;
    use vocab_core::time::fixed_now;

    fn answered(id: &str, correct: u32, incorrect: u32) -> ItemStats {
        ItemStats {
            item_id: ItemId::new(id),
            correct_count: correct,
            incorrect_count: incorrect,
            last_seen_at: fixed_now(),
            next_review_at: fixed_now(),
        }
    }

    #[test]
    fn empty_store_reports_empty_state() {
        let store = ProgressStore::in_memory();
        assert!(store.item_stats().is_empty());
        assert_eq!(store.total_plays(), 0);
        assert_eq!(store.total_correct_in_rounds(), 0);
    }

    #[test]
    fn upsert_then_reload_round_trips() {
        let store = ProgressStore::in_memory();
        let scheduler = Scheduler::new();

        let fresh = scheduler.initialize(ItemId::new("dog"), fixed_now());
        let updated = scheduler.update(&fresh, true, fixed_now());
        store.upsert_item(updated.clone());

        let loaded = store.item_stats();
        assert_eq!(loaded.get(&ItemId::new("dog")), Some(&updated));
    }

    #[test]
    fn upsert_preserves_other_items() {
        let store = ProgressStore::in_memory();
        store.upsert_item(answered("dog", 1, 0));
        store.upsert_item(answered("cat", 0, 1));

        let loaded = store.item_stats();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&ItemId::new("dog")].correct_count, 1);
        assert_eq!(loaded[&ItemId::new("cat")].incorrect_count, 1);
    }

    #[test]
    fn corrupt_stats_blob_degrades_to_empty() {
        let backend = Arc::new(InMemoryStore::new());
        backend.set("vocab_trainer_stats", "not json").unwrap();

        let store = ProgressStore::new(backend);
        assert!(store.item_stats().is_empty());
    }

    #[test]
    fn corrupt_counter_degrades_to_zero() {
        let backend = Arc::new(InMemoryStore::new());
        backend.set("vocab_trainer_total_plays", "three").unwrap();

        let store = ProgressStore::new(backend);
        assert_eq!(store.total_plays(), 0);
    }

    #[test]
    fn round_completion_bumps_both_counters() {
        let store = ProgressStore::in_memory();
        store.record_round_completion(5);
        store.record_round_completion(3);

        assert_eq!(store.total_plays(), 2);
        assert_eq!(store.total_correct_in_rounds(), 8);
    }

    #[test]
    fn summary_recomputes_from_stats() {
        let store = ProgressStore::in_memory();
        store.upsert_item(answered("dog", 3, 1));
        store.upsert_item(answered("cat", 1, 1));
        store.record_round_completion(5);

        let summary = store.summary();
        assert_eq!(summary.total_plays, 1);
        assert_eq!(summary.total_answered, 6);
        assert_eq!(summary.total_correct, 4);
        assert_eq!(summary.total_incorrect, 2);
        assert_eq!(summary.accuracy, 67);
        assert_eq!(summary.words_learned, 1);
    }

    #[test]
    fn summary_on_empty_history_is_all_zero() {
        let summary = ProgressStore::in_memory().summary();
        assert_eq!(summary.total_answered, 0);
        assert_eq!(summary.accuracy, 0);
        assert_eq!(summary.words_learned, 0);
    }

    #[test]
    fn reset_clears_stats_and_counters() {
        let store = ProgressStore::in_memory();
        store.upsert_item(answered("dog", 2, 0));
        store.record_round_completion(5);

        store.reset();

        assert!(store.item_stats().is_empty());
        assert_eq!(store.total_plays(), 0);
        assert_eq!(store.total_correct_in_rounds(), 0);
        assert_eq!(store.summary().total_answered, 0);
    }
}
