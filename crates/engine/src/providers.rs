//! Collaborator seams the engine consumes but never reimplements: question
//! loading, grading, and attempt eligibility.
//!
//! The in-memory implementations here back tests and demos; a real deployment
//! supplies its own implementations over whatever backend it has.

use std::collections::HashMap;
use std::sync::Mutex;

use rand::seq::SliceRandom;
use thiserror::Error;

use assess_core::model::{AnswerValue, AssessmentId, Question};

//
// ─── QUESTION SOURCE ───────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionSourceError {
    #[error("no question set is registered for assessment {0}")]
    UnknownAssessment(AssessmentId),
}

/// Supplies the ordered question set for an assessment.
///
/// Expected to be synchronous: any network fetch happens upstream, before an
/// attempt is started.
pub trait QuestionSource: Send + Sync {
    /// Load the ordered questions for one assessment.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::UnknownAssessment` when the id is not
    /// known to this source.
    fn load_questions(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<Question>, QuestionSourceError>;
}

/// In-memory question source keyed by assessment id.
///
/// Shuffling is a presentation concern of the source, never of the engine:
/// when enabled, each load returns a fresh ordering, and that ordering is
/// fixed for the attempt from the moment the session is built.
#[derive(Debug, Default)]
pub struct StaticQuestionSet {
    sets: HashMap<AssessmentId, Vec<Question>>,
    shuffle: bool,
}

impl StaticQuestionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable shuffling of loaded question sets.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Register (or replace) the question set for an assessment.
    pub fn insert(&mut self, assessment_id: AssessmentId, questions: Vec<Question>) {
        self.sets.insert(assessment_id, questions);
    }
}

impl QuestionSource for StaticQuestionSet {
    fn load_questions(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        let mut questions = self
            .sets
            .get(&assessment_id)
            .cloned()
            .ok_or(QuestionSourceError::UnknownAssessment(assessment_id))?;

        if self.shuffle {
            questions.shuffle(&mut rand::rng());
        }
        Ok(questions)
    }
}

//
// ─── GRADER ────────────────────────────────────────────────────────────────────
//

/// A grading collaborator failed for one question. Recovered locally by the
/// engine: the question contributes zero points pending review, and the
/// submission proceeds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("grading unavailable: {0}")]
pub struct GradingUnavailable(pub String);

/// Signal produced by the grading collaborator for one answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeSignal {
    /// Auto-graded point award.
    Points(u32),
    /// Grading deferred to manual review (free-text formats).
    Pending,
}

/// External grading collaborator, consulted only while submitting.
///
/// The engine owns no subject-matter grading logic; it aggregates whatever
/// signal this trait returns.
pub trait Grader: Send + Sync {
    /// Grade one answered question.
    ///
    /// # Errors
    ///
    /// Returns `GradingUnavailable` when no signal can be produced; the
    /// engine records the question as ungraded rather than failing the
    /// submission.
    fn grade(
        &self,
        question: &Question,
        answer: &AnswerValue,
    ) -> Result<GradeSignal, GradingUnavailable>;
}

//
// ─── ELIGIBILITY ───────────────────────────────────────────────────────────────
//

/// Snapshot of a learner's standing for one assessment, supplied by the
/// external session collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub attempts_consumed: u32,
    pub max_attempts: u32,
    pub window_open: bool,
}

impl Eligibility {
    /// True when both the attempt budget and the scheduling window allow a
    /// new attempt.
    #[must_use]
    pub fn can_start(&self) -> bool {
        self.window_open && self.attempts_consumed < self.max_attempts
    }
}

/// Read-only eligibility input for the start guard, plus the bookkeeping
/// callback fired when a submission completes.
pub trait EligibilityGate: Send + Sync {
    fn check(&self, assessment_id: AssessmentId) -> Eligibility;

    /// Called once per completed submission so the collaborator can count
    /// the consumed attempt.
    fn record_attempt(&self, assessment_id: AssessmentId);
}

/// In-memory eligibility gate with a fixed attempt budget and window flag.
#[derive(Debug)]
pub struct FixedEligibility {
    max_attempts: u32,
    window_open: bool,
    consumed: Mutex<HashMap<AssessmentId, u32>>,
}

impl FixedEligibility {
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            window_open: true,
            consumed: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_window_open(mut self, open: bool) -> Self {
        self.window_open = open;
        self
    }

    /// Pre-load consumed attempts, e.g. to model a returning learner.
    pub fn set_consumed(&self, assessment_id: AssessmentId, consumed: u32) {
        self.consumed
            .lock()
            .expect("eligibility lock poisoned")
            .insert(assessment_id, consumed);
    }
}

impl EligibilityGate for FixedEligibility {
    fn check(&self, assessment_id: AssessmentId) -> Eligibility {
        let consumed = self
            .consumed
            .lock()
            .expect("eligibility lock poisoned")
            .get(&assessment_id)
            .copied()
            .unwrap_or(0);

        Eligibility {
            attempts_consumed: consumed,
            max_attempts: self.max_attempts,
            window_open: self.window_open,
        }
    }

    fn record_attempt(&self, assessment_id: AssessmentId) {
        let mut consumed = self.consumed.lock().expect("eligibility lock poisoned");
        let count = consumed.entry(assessment_id).or_insert(0);
        *count = count.saturating_add(1);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
