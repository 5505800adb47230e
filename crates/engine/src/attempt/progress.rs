use serde::Serialize;

use super::engine::AttemptState;

/// Aggregated view of attempt progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptProgress {
    pub total: usize,
    pub answered: usize,
    pub current_index: usize,
    pub remaining_seconds: u64,
    pub state: AttemptState,
}
