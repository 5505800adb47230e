use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuestionError {
    #[error("question prompt must not be empty")]
    EmptyPrompt,

    #[error("question point value must be positive")]
    NonPositivePoints,

    #[error("single-choice question must offer at least one option")]
    NoOptions,

    #[error("text length bounds are inverted: min {min} > max {max}")]
    InvalidLengthBounds { min: usize, max: usize },

    #[error("numeric tolerance must be finite and non-negative, got {provided}")]
    InvalidTolerance { provided: f64 },
}

//
// ─── RESPONSE FORMAT ───────────────────────────────────────────────────────────
//

/// Shape of the response a question expects, with its type-specific
/// constraints.
///
/// Single-choice and numeric responses can be graded automatically; both text
/// formats are deferred to manual review by the grading collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseFormat {
    SingleChoice {
        options: Vec<String>,
    },
    ShortText {
        min_len: usize,
        max_len: usize,
    },
    LongText {
        min_len: usize,
        max_len: usize,
    },
    Numeric {
        tolerance: f64,
        unit: Option<String>,
    },
}

impl ResponseFormat {
    /// True when a grading collaborator can score this format without a human.
    #[must_use]
    pub fn is_auto_gradable(&self) -> bool {
        matches!(
            self,
            ResponseFormat::SingleChoice { .. } | ResponseFormat::Numeric { .. }
        )
    }

    fn validate(&self) -> Result<(), QuestionError> {
        match self {
            ResponseFormat::SingleChoice { options } => {
                if options.is_empty() {
                    return Err(QuestionError::NoOptions);
                }
            }
            ResponseFormat::ShortText { min_len, max_len }
            | ResponseFormat::LongText { min_len, max_len } => {
                if min_len > max_len {
                    return Err(QuestionError::InvalidLengthBounds {
                        min: *min_len,
                        max: *max_len,
                    });
                }
            }
            ResponseFormat::Numeric { tolerance, .. } => {
                if !tolerance.is_finite() || *tolerance < 0.0 {
                    return Err(QuestionError::InvalidTolerance {
                        provided: *tolerance,
                    });
                }
            }
        }
        Ok(())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single question in an assessment. Immutable for the duration of a
/// session; the engine only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    format: ResponseFormat,
    points: u32,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt,
    /// `QuestionError::NonPositivePoints` for a zero point value, and the
    /// format's own validation error for malformed constraints.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        format: ResponseFormat,
        points: u32,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if points == 0 {
            return Err(QuestionError::NonPositivePoints);
        }
        format.validate()?;

        Ok(Self {
            id,
            prompt,
            format,
            points,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn format(&self) -> &ResponseFormat {
        &self.format
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
