#![forbid(unsafe_code)]

pub mod attempt;
pub mod error;
pub mod providers;

pub use assess_core::Clock;

pub use error::{EngineError, NotEligibleReason};
pub use providers::{
    Eligibility, EligibilityGate, FixedEligibility, GradeSignal, Grader, GradingUnavailable,
    QuestionSource, QuestionSourceError, StaticQuestionSet,
};

pub use attempt::{
    AnswerStore, AttemptEngine, AttemptEvent, AttemptProgress, AttemptState, Cursor,
};
