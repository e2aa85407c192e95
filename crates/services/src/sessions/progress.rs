use serde::Serialize;

/// Aggregated view of round progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundProgress {
    pub total: usize,
    pub matched: usize,
    pub remaining: usize,
    pub is_complete: bool,
}
