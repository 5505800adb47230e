use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{AttemptId, QuestionId};

//
// ─── PER-QUESTION OUTCOME ──────────────────────────────────────────────────────
//

/// Grading signal recorded for one question at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum GradeOutcome {
    /// The grading collaborator produced a point value.
    Scored(u32),
    /// Free-text formats: deferred to manual review, counts 0 for now.
    PendingReview,
    /// The grading collaborator failed; counts 0 pending review.
    GradingFailed,
    /// No answer was recorded; the grader was never consulted.
    Unanswered,
}

impl GradeOutcome {
    /// Points this outcome contributes to the earned total.
    #[must_use]
    pub fn points_earned(&self) -> u32 {
        match self {
            GradeOutcome::Scored(points) => *points,
            GradeOutcome::PendingReview
            | GradeOutcome::GradingFailed
            | GradeOutcome::Unanswered => 0,
        }
    }

    /// True when the question still needs a human to look at it.
    #[must_use]
    pub fn needs_review(&self) -> bool {
        matches!(
            self,
            GradeOutcome::PendingReview | GradeOutcome::GradingFailed
        )
    }
}

/// One question's contribution to a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub points_possible: u32,
    pub outcome: GradeOutcome,
}

//
// ─── SUBMISSION RESULT ─────────────────────────────────────────────────────────
//

/// Aggregate result of one submitted attempt.
///
/// Built exactly once per attempt, when the machine passes through
/// `Submitting`, and immutable afterward. `points_earned` is a client-side
/// estimate; questions awaiting manual review contribute zero until graded
/// elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    attempt_id: AttemptId,
    points_possible: u32,
    points_earned: u32,
    answered_count: usize,
    pending_review: u32,
    submitted_at: DateTime<Utc>,
    outcomes: Vec<QuestionOutcome>,
}

impl SubmissionResult {
    /// Aggregate per-question outcomes into a result.
    ///
    /// `answered_count` is the answer store's count frozen at the moment
    /// submission began, not recomputed from the outcomes.
    #[must_use]
    pub fn from_outcomes(
        attempt_id: AttemptId,
        answered_count: usize,
        submitted_at: DateTime<Utc>,
        outcomes: Vec<QuestionOutcome>,
    ) -> Self {
        let mut points_possible = 0_u32;
        let mut points_earned = 0_u32;
        let mut pending_review = 0_u32;

        for entry in &outcomes {
            points_possible = points_possible.saturating_add(entry.points_possible);
            points_earned = points_earned.saturating_add(entry.outcome.points_earned());
            if entry.outcome.needs_review() {
                pending_review = pending_review.saturating_add(1);
            }
        }

        Self {
            attempt_id,
            points_possible,
            points_earned,
            answered_count,
            pending_review,
            submitted_at,
            outcomes,
        }
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn points_possible(&self) -> u32 {
        self.points_possible
    }

    #[must_use]
    pub fn points_earned(&self) -> u32 {
        self.points_earned
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answered_count
    }

    /// Number of questions still awaiting manual review.
    #[must_use]
    pub fn pending_review(&self) -> u32 {
        self.pending_review
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    /// Earned points as a rounded percentage of possible points; 0 when the
    /// assessment carries no points at all.
    #[must_use]
    pub fn percent_earned(&self) -> u32 {
        if self.points_possible == 0 {
            return 0;
        }
        let ratio = f64::from(self.points_earned) / f64::from(self.points_possible);
        (ratio * 100.0).round() as u32
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
