use serde::{Deserialize, Serialize};

use crate::model::ids::AssessmentId;
use crate::model::question::Question;

/// One assessment as handed to the engine at attempt start: the ordered
/// question set plus the timing and attempt limits that govern the sitting.
///
/// Question order is fixed here; any shuffling is the question source's
/// presentation concern and happens before this is built. The engine treats
/// the session as read-only — attempt bookkeeping lives with the external
/// eligibility collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSession {
    assessment_id: AssessmentId,
    questions: Vec<Question>,
    duration_seconds: u32,
    max_attempts: u32,
    attempts_consumed: u32,
}

impl AssessmentSession {
    #[must_use]
    pub fn new(
        assessment_id: AssessmentId,
        questions: Vec<Question>,
        duration_seconds: u32,
        max_attempts: u32,
        attempts_consumed: u32,
    ) -> Self {
        Self {
            assessment_id,
            questions,
            duration_seconds,
            max_attempts,
            attempts_consumed,
        }
    }

    #[must_use]
    pub fn assessment_id(&self) -> AssessmentId {
        self.assessment_id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn attempts_consumed(&self) -> u32 {
        self.attempts_consumed
    }

    /// True while the learner still has attempts available.
    #[must_use]
    pub fn has_attempts_left(&self) -> bool {
        self.attempts_consumed < self.max_attempts
    }

    /// Sum of all question point values.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.questions
            .iter()
            .map(Question::points)
            .fold(0, u32::saturating_add)
    }
}
