//! Shared error types for the engine crate.

use thiserror::Error;

use assess_core::timer::TimerError;

use crate::providers::QuestionSourceError;

/// Why a learner may not start an attempt right now.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NotEligibleReason {
    #[error("all {allowed} attempts have been used ({consumed} consumed)")]
    AttemptsExhausted { consumed: u32, allowed: u32 },
    #[error("the assessment window is not open")]
    WindowClosed,
}

/// Errors emitted by `AttemptEngine`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Starting was refused; the machine stays in `NotStarted`.
    #[error("cannot start a new attempt: {0}")]
    NotEligible(#[from] NotEligibleReason),

    /// Mutation arrived after submission began. Non-fatal; callers should
    /// simply stop forwarding input.
    #[error("attempt is closed to further input")]
    SessionClosed,

    /// An attempt operation was invoked before `start_assessment`.
    #[error("no attempt has been started")]
    NoActiveAttempt,

    /// A second `start_assessment` arrived while an attempt is running.
    #[error("an attempt is already in progress")]
    AttemptInProgress,

    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error(transparent)]
    Questions(#[from] QuestionSourceError),
}
