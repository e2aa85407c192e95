use std::fmt;

use serde::Serialize;
use storage::{ProgressStore, ProgressSummary};
use vocab_core::model::{ItemId, Tier};
use vocab_core::scheduler::Scheduler;
use vocab_core::time::Clock;
use vocab_core::unlock;

use super::progress::RoundProgress;
use super::round::Round;
use super::selector::RoundSelector;

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// Transient outcome signal shown after a target pick.
///
/// Clearing it is the presentation layer's job (typically a short timer via
/// [`SessionController::clear_feedback`]); nothing in the state machine waits
/// for it, and stale feedback never blocks the next pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Feedback {
    Correct,
    Incorrect,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Interaction state, derived on demand from the round and pending pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// No source-side item chosen yet.
    Selecting,
    /// A source item is pending, awaiting the target-side pick.
    SourcePicked,
    /// Every item in the round is matched; terminal for this round.
    RoundComplete,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives one practice round at a time against the progress store.
///
/// This is the only type the presentation layer talks to: it exposes the
/// round in both orderings plus the matched/pending/feedback state, and the
/// four mutating operations (`pick_source`, `pick_target`, `advance_round`,
/// `reset_progress`). Invalid picks are ignored rather than reported; there
/// is nothing sensible for a UI to do with them.
///
/// One logical actor at a time: each call runs to completion before the next,
/// and persistence is read-modify-write per answer.
pub struct SessionController {
    selector: RoundSelector,
    scheduler: Scheduler,
    progress: ProgressStore,
    clock: Clock,
    round: Round,
    pending_source: Option<ItemId>,
    feedback: Option<Feedback>,
}

impl SessionController {
    /// Creates a controller and immediately draws the first round.
    ///
    /// `clock` comes first-class so tests can pin time before any selection
    /// happens.
    #[must_use]
    pub fn new(
        clock: Clock,
        mut selector: RoundSelector,
        scheduler: Scheduler,
        progress: ProgressStore,
    ) -> Self {
        let round = selector.select_round(&progress.item_stats(), clock.now());
        Self {
            selector,
            scheduler,
            progress,
            clock,
            round,
            pending_source: None,
            feedback: None,
        }
    }

    //
    // ─── READ SURFACE ──────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn round(&self) -> &Round {
        &self.round
    }

    #[must_use]
    pub fn pending_source(&self) -> Option<&ItemId> {
        self.pending_source.as_ref()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    #[must_use]
    pub fn is_round_complete(&self) -> bool {
        self.round.is_complete()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.round.is_complete() {
            SessionState::RoundComplete
        } else if self.pending_source.is_some() {
            SessionState::SourcePicked
        } else {
            SessionState::Selecting
        }
    }

    #[must_use]
    pub fn round_progress(&self) -> RoundProgress {
        RoundProgress {
            total: self.round.len(),
            matched: self.round.matched_count(),
            remaining: self.round.len() - self.round.matched_count(),
            is_complete: self.round.is_complete(),
        }
    }

    /// Live mastery percentage for a tier, recomputed from stored stats.
    #[must_use]
    pub fn mastery(&self, tier: Tier) -> f64 {
        unlock::mastery_percentage(self.selector.catalog(), &self.progress.item_stats(), tier)
    }

    /// Tiers currently eligible for selection.
    #[must_use]
    pub fn available_tiers(&self) -> Vec<Tier> {
        unlock::available_tiers(self.selector.catalog(), &self.progress.item_stats())
    }

    /// Aggregate statistics view for display.
    #[must_use]
    pub fn summary(&self) -> ProgressSummary {
        self.progress.summary()
    }

    //
    // ─── MUTATING OPERATIONS ───────────────────────────────────────────────
    //

    /// Chooses (or replaces) the pending source-side item.
    ///
    /// Ignored for matched items, items outside the round, and completed
    /// rounds. Accepted while stale feedback is still showing.
    pub fn pick_source(&mut self, id: &ItemId) {
        if self.round.is_complete() || !self.round.contains(id) || self.round.is_matched(id) {
            return;
        }
        self.pending_source = Some(id.clone());
    }

    /// Resolves the pending source against a target-side pick.
    ///
    /// No-op without a pending source, or when the target is matched or
    /// unknown. Otherwise the answer is recorded against the *source* item
    /// (stats created lazily on first answer) whatever the outcome, and the
    /// pending selection is consumed. A correct pick marks the pair matched
    /// and, once the last pair falls, completes the round and bumps the
    /// aggregate counters exactly once.
    pub fn pick_target(&mut self, id: &ItemId) {
        if self.round.is_complete() {
            return;
        }
        let Some(source_id) = self.pending_source.clone() else {
            return;
        };
        if !self.round.contains(id) || self.round.is_matched(id) {
            return;
        }

        let was_correct = source_id == *id;
        let now = self.clock.now();

        let stats = self.progress.item_stats();
        let prior = stats
            .get(&source_id)
            .cloned()
            .unwrap_or_else(|| self.scheduler.initialize(source_id.clone(), now));
        self.progress
            .upsert_item(self.scheduler.update(&prior, was_correct, now));

        self.pending_source = None;
        if was_correct {
            self.round.mark_matched(&source_id);
            self.feedback = Some(Feedback::Correct);
            if self.round.is_complete() {
                self.progress.record_round_completion(self.round.len());
            }
        } else {
            self.feedback = Some(Feedback::Incorrect);
        }
    }

    /// Clears transient feedback; a best-effort signal from the presentation
    /// layer's timer. Dropping or delaying it affects nothing but display.
    pub fn clear_feedback(&mut self) {
        self.feedback = None;
    }

    /// Draws a fresh round. Only valid once the current round is complete;
    /// ignored otherwise.
    pub fn advance_round(&mut self) {
        if !self.round.is_complete() {
            return;
        }
        self.start_round();
    }

    /// Wipes all stored history and starts over with a fresh round.
    ///
    /// Valid from any state; afterwards every item is due again and tier
    /// availability is re-evaluated from zero mastery.
    pub fn reset_progress(&mut self) {
        self.progress.reset();
        self.start_round();
    }

    fn start_round(&mut self) {
        let stats = self.progress.item_stats();
        self.round = self.selector.select_round(&stats, self.clock.now());
        self.pending_source = None;
        self.feedback = None;
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("round_len", &self.round.len())
            .field("matched", &self.round.matched_count())
            .field("pending_source", &self.pending_source)
            .field("feedback", &self.feedback)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
