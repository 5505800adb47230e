use std::fmt;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use serde::Serialize;
use tracing::debug;

use assess_core::Clock;
use assess_core::model::{
    AnswerValue, AssessmentId, AssessmentSession, AttemptId, Question, QuestionId,
    SubmissionResult,
};
use assess_core::timer::{CountdownTimer, Tick};

use crate::error::{EngineError, NotEligibleReason};
use crate::providers::{EligibilityGate, Grader, QuestionSource};

use super::answers::AnswerStore;
use super::cursor::Cursor;
use super::events::{AttemptEvent, EventBus};
use super::progress::AttemptProgress;
use super::scoring;

//
// ─── STATE MACHINE ─────────────────────────────────────────────────────────────
//

/// Lifecycle of one attempt. Transitions only move forward on the submission
/// path; `abandon` is the single documented exit that resets to `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    NotStarted,
    InProgress,
    Submitting,
    Submitted,
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttemptState::NotStarted => "not-started",
            AttemptState::InProgress => "in-progress",
            AttemptState::Submitting => "submitting",
            AttemptState::Submitted => "submitted",
        };
        write!(f, "{label}")
    }
}

/// Which side fired the `InProgress -> Submitting` transition. The first
/// trigger wins; the loser is discarded silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitTrigger {
    Learner,
    Expiry,
}

//
// ─── ACTIVE ATTEMPT ────────────────────────────────────────────────────────────
//

/// Everything scoped to one started attempt. Built fresh on every
/// `start_assessment`; nothing is pooled or reused across attempts.
struct ActiveAttempt {
    attempt_id: AttemptId,
    session: AssessmentSession,
    answers: AnswerStore,
    cursor: Cursor,
    timer: CountdownTimer,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// The timed attempt engine: submission controller, answer buffer, navigation
/// cursor and countdown timer behind one single-threaded surface.
///
/// All mutation — answer edits, navigation, timer polls, submission — is
/// expected to interleave on one event-processing sequence. The countdown is
/// driven by `poll_tick`, called once per second by the host loop; expiry and
/// an explicit `submit` are mutually exclusive triggers for submission, and
/// whichever the sequence processes first wins.
pub struct AttemptEngine {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    grader: Arc<dyn Grader>,
    gate: Arc<dyn EligibilityGate>,
    state: AttemptState,
    active: Option<ActiveAttempt>,
    outcome: Option<SubmissionResult>,
    events: EventBus,
}

impl AttemptEngine {
    #[must_use]
    pub fn new(
        clock: Clock,
        source: Arc<dyn QuestionSource>,
        grader: Arc<dyn Grader>,
        gate: Arc<dyn EligibilityGate>,
    ) -> Self {
        Self {
            clock,
            source,
            grader,
            gate,
            state: AttemptState::NotStarted,
            active: None,
            outcome: None,
            events: EventBus::new(),
        }
    }

    /// Subscribe to the engine's notification stream. Any number of
    /// subscribers is fine; polling the accessors instead is equally valid.
    pub fn subscribe(&mut self) -> Receiver<AttemptEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// Assemble a session from the question source and the eligibility
    /// collaborator's current numbers.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Questions` when the source does not know the
    /// assessment.
    pub fn load_session(
        &self,
        assessment_id: AssessmentId,
        duration_seconds: u32,
    ) -> Result<AssessmentSession, EngineError> {
        let questions = self.source.load_questions(assessment_id)?;
        let eligibility = self.gate.check(assessment_id);
        Ok(AssessmentSession::new(
            assessment_id,
            questions,
            duration_seconds,
            eligibility.max_attempts,
            eligibility.attempts_consumed,
        ))
    }

    /// `NotStarted -> InProgress`: begin a fresh attempt for the session.
    ///
    /// Establishes a new answer store, cursor and countdown scoped to this
    /// attempt. Also valid from `Submitted` (a new attempt replaces the
    /// finished machine) and after `abandon`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotEligible` when attempts are exhausted or the
    /// scheduling window is closed, `EngineError::Timer` for a non-positive
    /// duration, and `EngineError::AttemptInProgress` when an attempt is
    /// already running. On every error the state is left untouched.
    pub fn start_assessment(
        &mut self,
        session: AssessmentSession,
    ) -> Result<AttemptId, EngineError> {
        match self.state {
            AttemptState::NotStarted | AttemptState::Submitted => {}
            AttemptState::InProgress | AttemptState::Submitting => {
                return Err(EngineError::AttemptInProgress);
            }
        }

        let eligibility = self.gate.check(session.assessment_id());
        if !eligibility.window_open {
            return Err(NotEligibleReason::WindowClosed.into());
        }
        if !session.has_attempts_left() {
            return Err(NotEligibleReason::AttemptsExhausted {
                consumed: session.attempts_consumed(),
                allowed: session.max_attempts(),
            }
            .into());
        }

        let timer = CountdownTimer::start(self.clock, session.duration_seconds())?;

        let attempt_id = AttemptId::new();
        let assessment_id = session.assessment_id();
        let total_questions = session.question_count();
        let duration_seconds = session.duration_seconds();

        self.active = Some(ActiveAttempt {
            attempt_id,
            answers: AnswerStore::new(),
            cursor: Cursor::new(total_questions),
            timer,
            session,
        });
        self.outcome = None;

        let from = self.state;
        self.state = AttemptState::InProgress;
        debug!(%attempt_id, %assessment_id, duration_seconds, "attempt started");
        self.events.emit(&AttemptEvent::Started {
            attempt_id,
            assessment_id,
            total_questions,
            duration_seconds,
        });
        self.events.emit(&AttemptEvent::StateChanged {
            from,
            to: AttemptState::InProgress,
        });

        Ok(attempt_id)
    }

    /// Record (or overwrite) the learner's response for a question.
    ///
    /// A question id that is not part of the session is ignored silently, in
    /// line with the navigation contract: stray UI input must never be fatal.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NoActiveAttempt` before a start and
    /// `EngineError::SessionClosed` once submission has begun.
    pub fn record_answer(
        &mut self,
        question_id: QuestionId,
        value: AnswerValue,
    ) -> Result<(), EngineError> {
        match self.state {
            AttemptState::NotStarted => return Err(EngineError::NoActiveAttempt),
            AttemptState::Submitting | AttemptState::Submitted => {
                return Err(EngineError::SessionClosed);
            }
            AttemptState::InProgress => {}
        }
        let Some(active) = self.active.as_mut() else {
            return Err(EngineError::NoActiveAttempt);
        };

        let known = active
            .session
            .questions()
            .iter()
            .any(|q| q.id() == question_id);
        if !known {
            debug!(question = %question_id, "ignoring answer for unknown question");
            return Ok(());
        }

        active.answers.record(question_id, value)?;
        self.events.emit(&AttemptEvent::AnswerRecorded { question_id });
        Ok(())
    }

    /// Move the cursor to `index`; out-of-range indices (and calls outside
    /// `InProgress`) are silent no-ops.
    pub fn go_to(&mut self, index: usize) {
        if self.state != AttemptState::InProgress {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.cursor.go_to(index) {
            let index = active.cursor.current();
            self.events.emit(&AttemptEvent::CursorMoved { index });
        }
    }

    /// Advance to the next question; no-op at the end of the list.
    pub fn next(&mut self) {
        let next = self.current_index().saturating_add(1);
        self.go_to(next);
    }

    /// Step back to the previous question; no-op at the first question.
    pub fn previous(&mut self) {
        if let Some(prev) = self.current_index().checked_sub(1) {
            self.go_to(prev);
        }
    }

    /// Observe the countdown once; the host loop calls this once per second.
    ///
    /// Emits a `Tick` while running. Expiry stops the timer and submits
    /// automatically with whatever answers exist at that instant; any later
    /// `submit` call simply returns the stored result. Outside `InProgress`
    /// this is a silent no-op, which is what discards the losing trigger of
    /// the submit/expiry race.
    pub fn poll_tick(&mut self) {
        if self.state != AttemptState::InProgress {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };

        match active.timer.poll() {
            Tick::Running(remaining) => {
                self.events.emit(&AttemptEvent::Tick {
                    remaining_seconds: remaining,
                });
            }
            Tick::Expired => {
                debug!("countdown expired, submitting automatically");
                self.events.emit(&AttemptEvent::Expired);
                self.finish_submission(SubmitTrigger::Expiry);
            }
            Tick::Idle => {}
        }
    }

    /// Explicit learner submission.
    ///
    /// Idempotent and repeatable in its result: once the attempt is
    /// submitted, every further call returns the same `SubmissionResult`,
    /// never an error.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NoActiveAttempt` only when nothing was ever
    /// started.
    pub fn submit(&mut self) -> Result<SubmissionResult, EngineError> {
        match self.state {
            AttemptState::NotStarted => Err(EngineError::NoActiveAttempt),
            AttemptState::InProgress => {
                self.finish_submission(SubmitTrigger::Learner);
                self.outcome.clone().ok_or(EngineError::NoActiveAttempt)
            }
            AttemptState::Submitting | AttemptState::Submitted => {
                self.outcome.clone().ok_or(EngineError::NoActiveAttempt)
            }
        }
    }

    /// Abandon the running attempt without producing a result.
    ///
    /// Stops the countdown, discards the answer store and returns the machine
    /// to `NotStarted` so a later fresh attempt can be started. Attempt
    /// bookkeeping is the eligibility collaborator's concern; an abandoned
    /// attempt records nothing here.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NoActiveAttempt` before a start and
    /// `EngineError::SessionClosed` after submission.
    pub fn abandon(&mut self) -> Result<(), EngineError> {
        match self.state {
            AttemptState::InProgress => {
                if let Some(active) = self.active.as_mut() {
                    active.timer.stop();
                }
                self.active = None;
                self.state = AttemptState::NotStarted;
                debug!("attempt abandoned before submission");
                self.events.emit(&AttemptEvent::Abandoned);
                Ok(())
            }
            AttemptState::NotStarted => Err(EngineError::NoActiveAttempt),
            AttemptState::Submitting | AttemptState::Submitted => {
                Err(EngineError::SessionClosed)
            }
        }
    }

    /// Remaining whole seconds on the countdown; 0 when nothing is running.
    /// After submission this reports the value frozen when the timer stopped.
    #[must_use]
    pub fn remaining_seconds(&self) -> u64 {
        self.active
            .as_ref()
            .map_or(0, |active| active.timer.remaining())
    }

    /// The stored result; `Some` only once the attempt reached `Submitted`.
    #[must_use]
    pub fn result(&self) -> Option<&SubmissionResult> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.active.as_ref().map(|active| active.attempt_id)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.active
            .as_ref()
            .map_or(0, |active| active.cursor.current())
    }

    /// The question the cursor currently points at.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        let active = self.active.as_ref()?;
        active.session.questions().get(active.cursor.current())
    }

    /// The recorded response for a question, if any.
    #[must_use]
    pub fn answer(&self, question_id: QuestionId) -> Option<&AnswerValue> {
        self.active.as_ref()?.answers.value(question_id)
    }

    /// Number of questions holding a recorded, non-blank value.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.active
            .as_ref()
            .map_or(0, |active| active.answers.answered_count())
    }

    /// Aggregated progress snapshot for the presentation layer.
    #[must_use]
    pub fn progress(&self) -> AttemptProgress {
        AttemptProgress {
            total: self
                .active
                .as_ref()
                .map_or(0, |active| active.session.question_count()),
            answered: self.answered_count(),
            current_index: self.current_index(),
            remaining_seconds: self.remaining_seconds(),
            state: self.state,
        }
    }

    /// Replace the engine clock (and the running timer's). Used by tests to
    /// advance a fixed clock.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
        if let Some(active) = self.active.as_mut() {
            active.timer.set_clock(clock);
        }
    }

    /// `InProgress -> Submitting -> Submitted`, all within the current call.
    ///
    /// Freezes the answer store and its count, stops the timer regardless of
    /// which trigger fired, aggregates grading signals, and stores the result.
    /// Never fails outward: degraded grading still produces a result, because
    /// the learner cannot retry past the deadline.
    fn finish_submission(&mut self, trigger: SubmitTrigger) {
        let Self {
            clock,
            grader,
            gate,
            state,
            active,
            outcome,
            events,
            ..
        } = self;
        if *state != AttemptState::InProgress {
            return;
        }
        let Some(active) = active.as_mut() else {
            return;
        };

        debug!(?trigger, "submission triggered");
        active.timer.stop();
        active.answers.close();
        let answered_count = active.answers.answered_count();

        *state = AttemptState::Submitting;
        events.emit(&AttemptEvent::StateChanged {
            from: AttemptState::InProgress,
            to: AttemptState::Submitting,
        });

        let result = scoring::score_attempt(
            active.attempt_id,
            active.session.questions(),
            &active.answers,
            grader.as_ref(),
            answered_count,
            clock.now(),
        );
        gate.record_attempt(active.session.assessment_id());

        *outcome = Some(result.clone());
        *state = AttemptState::Submitted;
        events.emit(&AttemptEvent::StateChanged {
            from: AttemptState::Submitting,
            to: AttemptState::Submitted,
        });
        events.emit(&AttemptEvent::Submitted { result });
    }
}

impl fmt::Debug for AttemptEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptEngine")
            .field("state", &self.state)
            .field("has_active_attempt", &self.active.is_some())
            .field("has_result", &self.outcome.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
