use chrono::{DateTime, Duration, Utc};

use crate::model::{ItemId, ItemStats};

//
// ─── INTERVAL POLICY ───────────────────────────────────────────────────────────
//

/// Base interval granted after the first correct answer, in days.
pub const BASE_INTERVAL_DAYS: i64 = 1;
/// Growth factor applied per additional correct answer.
pub const INTERVAL_MULTIPLIER: u32 = 2;
/// Ceiling for the exponential schedule, in days.
pub const MAX_INTERVAL_DAYS: i64 = 30;
/// Discrete review steps indexed by `correct_count - 1`; the last step repeats.
pub const STEP_INTERVALS_DAYS: [i64; 4] = [1, 3, 7, 14];
/// Retry delay after an incorrect answer, independent of history.
pub const RETRY_INTERVAL_MINUTES: i64 = 1;

/// Strategy for growing the review interval after a correct answer.
///
/// Both strategies share the same contract (an interval derived solely from
/// the running correct count) but produce different numbers; they are kept
/// separate rather than merged. `Exponential` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntervalPolicy {
    /// `base × multiplier^(n-1)` days, capped at `MAX_INTERVAL_DAYS`.
    #[default]
    Exponential,
    /// Fixed table of 1/3/7/14 days, capped at the last step.
    Stepped,
}

impl IntervalPolicy {
    /// Interval granted after the `correct_count`-th correct answer.
    ///
    /// `correct_count` is the count *including* the answer being applied, so
    /// it is always at least 1 here.
    #[must_use]
    pub fn interval_after(self, correct_count: u32) -> Duration {
        let step = correct_count.saturating_sub(1);
        match self {
            IntervalPolicy::Exponential => {
                // 2^5 days already exceeds the 30-day cap, so clamping the
                // exponent keeps the arithmetic in range.
                let exponent = step.min(5);
                let days = BASE_INTERVAL_DAYS * i64::from(INTERVAL_MULTIPLIER.pow(exponent));
                Duration::days(days.min(MAX_INTERVAL_DAYS))
            }
            IntervalPolicy::Stepped => {
                let index = (step as usize).min(STEP_INTERVALS_DAYS.len() - 1);
                Duration::days(STEP_INTERVALS_DAYS[index])
            }
        }
    }
}

//
// ─── SCHEDULER ─────────────────────────────────────────────────────────────────
//

/// Deterministic-interval scheduler for vocabulary reviews.
///
/// Pure data transformation: the caller supplies `now`, the scheduler never
/// touches a clock or storage and cannot fail. `next_review_at` is recomputed
/// from scratch on every update.
///
/// # Examples
///
/// ```
/// # use vocab_core::scheduler::Scheduler;
/// # use vocab_core::model::ItemId;
/// # use vocab_core::time::fixed_now;
/// let scheduler = Scheduler::new();
/// let now = fixed_now();
///
/// let fresh = scheduler.initialize(ItemId::new("casa"), now);
/// assert!(fresh.is_due(now));
///
/// let after = scheduler.update(&fresh, true, now);
/// assert_eq!(after.correct_count, 1);
/// assert!(after.next_review_at > now);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler {
    policy: IntervalPolicy,
}

impl Scheduler {
    /// Creates a scheduler with the default exponential policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler with an explicit interval policy.
    #[must_use]
    pub fn with_policy(policy: IntervalPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> IntervalPolicy {
        self.policy
    }

    /// Fresh stats for an item that has never been answered.
    ///
    /// The item is immediately due: `next_review_at` equals `now`.
    #[must_use]
    pub fn initialize(&self, item_id: ItemId, now: DateTime<Utc>) -> ItemStats {
        ItemStats {
            item_id,
            correct_count: 0,
            incorrect_count: 0,
            last_seen_at: now,
            next_review_at: now,
        }
    }

    /// Applies one answer and returns the updated stats.
    ///
    /// Correct answers grow the interval according to the policy; incorrect
    /// answers schedule a short retry so the item resurfaces soon. In both
    /// cases `last_seen_at` moves to `now`.
    #[must_use]
    pub fn update(&self, stats: &ItemStats, was_correct: bool, now: DateTime<Utc>) -> ItemStats {
        let mut updated = stats.clone();
        updated.last_seen_at = now;

        if was_correct {
            updated.correct_count += 1;
            updated.next_review_at = now + self.policy.interval_after(updated.correct_count);
        } else {
            updated.incorrect_count += 1;
            updated.next_review_at = now + Duration::minutes(RETRY_INTERVAL_MINUTES);
        }

        updated
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn fresh(scheduler: &Scheduler) -> ItemStats {
        scheduler.initialize(ItemId::new("dog"), fixed_now())
    }

    #[test]
    fn initialize_is_immediately_due() {
        let s = Scheduler::new();
        let stats = fresh(&s);
        assert_eq!(stats.correct_count, 0);
        assert_eq!(stats.incorrect_count, 0);
        assert!(stats.is_due(fixed_now()));
    }

    #[test]
    fn correct_increments_count_and_pushes_review_out() {
        let s = Scheduler::new();
        let now = fixed_now();
        let updated = s.update(&fresh(&s), true, now);

        assert_eq!(updated.correct_count, 1);
        assert_eq!(updated.incorrect_count, 0);
        assert_eq!(updated.last_seen_at, now);
        assert!(updated.next_review_at > updated.last_seen_at);
        assert_eq!(updated.next_review_at, now + Duration::days(1));
    }

    #[test]
    fn incorrect_schedules_short_retry() {
        let s = Scheduler::new();
        let now = fixed_now();
        let stats = s.update(&fresh(&s), true, now);

        let failed = s.update(&stats, false, now);
        assert_eq!(failed.incorrect_count, 1);
        assert_eq!(failed.correct_count, 1);
        assert_eq!(
            failed.next_review_at,
            now + Duration::minutes(RETRY_INTERVAL_MINUTES)
        );

        // The retry delay is always sooner than the correct-path interval
        // would have been from the same prior state.
        let passed = s.update(&stats, true, now);
        assert!(failed.next_review_at < passed.next_review_at);
    }

    #[test]
    fn exponential_intervals_double_until_the_cap() {
        let policy = IntervalPolicy::Exponential;
        assert_eq!(policy.interval_after(1), Duration::days(1));
        assert_eq!(policy.interval_after(2), Duration::days(2));
        assert_eq!(policy.interval_after(3), Duration::days(4));
        assert_eq!(policy.interval_after(4), Duration::days(8));
        assert_eq!(policy.interval_after(5), Duration::days(16));
        assert_eq!(policy.interval_after(6), Duration::days(30));
        assert_eq!(policy.interval_after(40), Duration::days(30));
    }

    #[test]
    fn stepped_intervals_follow_the_table_and_cap() {
        let policy = IntervalPolicy::Stepped;
        assert_eq!(policy.interval_after(1), Duration::days(1));
        assert_eq!(policy.interval_after(2), Duration::days(3));
        assert_eq!(policy.interval_after(3), Duration::days(7));
        assert_eq!(policy.interval_after(4), Duration::days(14));
        assert_eq!(policy.interval_after(9), Duration::days(14));
    }

    #[test]
    fn third_correct_answer_outschedules_the_second() {
        let s = Scheduler::new();
        let now = fixed_now();

        let mut stats = fresh(&s);
        stats = s.update(&stats, true, now);
        let second = s.update(&stats, true, now);
        let third = s.update(&second, true, now);

        assert_eq!(third.correct_count, 3);
        assert!(third.next_review_at > second.next_review_at);
    }

    #[test]
    fn update_recomputes_rather_than_accumulates() {
        let s = Scheduler::new();
        let now = fixed_now();
        let later = now + Duration::days(10);

        let stats = s.update(&fresh(&s), true, now);
        let again = s.update(&stats, true, later);

        // Derived purely from `later` and the new count, not from the old
        // next_review_at.
        assert_eq!(again.next_review_at, later + Duration::days(2));
    }

    #[test]
    fn retry_delay_is_policy_independent() {
        let now = fixed_now();
        for policy in [IntervalPolicy::Exponential, IntervalPolicy::Stepped] {
            let s = Scheduler::with_policy(policy);
            let failed = s.update(&fresh(&s), false, now);
            assert_eq!(
                failed.next_review_at,
                now + Duration::minutes(RETRY_INTERVAL_MINUTES)
            );
        }
    }

    #[test]
    fn policies_share_the_first_interval_but_diverge_later() {
        let exp = IntervalPolicy::Exponential;
        let step = IntervalPolicy::Stepped;
        assert_eq!(exp.interval_after(1), step.interval_after(1));
        assert_ne!(exp.interval_after(2), step.interval_after(2));
    }
}
