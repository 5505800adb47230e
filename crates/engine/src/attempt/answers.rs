use std::collections::HashMap;

use assess_core::model::{AnswerValue, QuestionId};

use crate::error::EngineError;

/// Buffer of the learner's current responses, keyed by question id.
///
/// Overwrite-only: recording a value replaces any prior one. The store does
/// no constraint validation (that is the question source's concern). Once
/// submission begins the store is closed and every mutator fails with
/// `SessionClosed`.
#[derive(Debug, Default)]
pub struct AnswerStore {
    values: HashMap<QuestionId, AnswerValue>,
    closed: bool,
}

impl AnswerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the response for a question.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SessionClosed` once submission has begun.
    pub fn record(&mut self, question_id: QuestionId, value: AnswerValue) -> Result<(), EngineError> {
        if self.closed {
            return Err(EngineError::SessionClosed);
        }
        self.values.insert(question_id, value);
        Ok(())
    }

    /// The current response for a question, if any was recorded.
    #[must_use]
    pub fn value(&self, question_id: QuestionId) -> Option<&AnswerValue> {
        self.values.get(&question_id)
    }

    /// Number of distinct questions holding a recorded, non-blank value.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.values.values().filter(|v| !v.is_blank()).count()
    }

    /// Freeze the store; all later mutation fails with `SessionClosed`.
    pub fn close(&mut self) {
        self.closed = true;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
