use serde::{Deserialize, Serialize};

/// A learner's response to one question.
///
/// Which variant is expected depends on the question's `ResponseFormat`; the
/// engine stores whatever it is handed and leaves constraint validation to
/// the question source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Choice(String),
    Text(String),
    Number(f64),
}

impl AnswerValue {
    /// True when the value does not count as an answer: only whitespace-only
    /// text qualifies. A recorded choice or number is always an answer.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(text) => text.trim().is_empty(),
            AnswerValue::Choice(_) | AnswerValue::Number(_) => false,
        }
    }
}
