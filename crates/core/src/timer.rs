use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::time::Clock;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("countdown duration must be positive, got {provided}")]
    InvalidDuration { provided: u32 },
}

//
// ─── TICK ──────────────────────────────────────────────────────────────────────
//

/// Outcome of a single timer poll.
///
/// `Running` is emitted at most once per observed remaining value, `Expired`
/// at most once per started timer, and `Idle` for every poll that has nothing
/// new to report (timer stopped, or the same second observed twice).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running(u64),
    Expired,
    Idle,
}

//
// ─── COUNTDOWN TIMER ───────────────────────────────────────────────────────────
//

/// Deadline-based countdown with single-expiry semantics.
///
/// The remaining time is always derived from the injected [`Clock`] against a
/// deadline computed at start, so a delayed or skipped poll (for example when
/// the host process was suspended) clamps to zero instead of going negative.
/// Once the countdown reaches zero it stops itself and can never restart; a
/// new attempt gets a new timer.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    clock: Clock,
    deadline: DateTime<Utc>,
    duration_seconds: u32,
    last_reported: Option<u64>,
    frozen_remaining: Option<u64>,
    running: bool,
    expired: bool,
}

impl CountdownTimer {
    /// Start a countdown of `duration_seconds` against the given clock.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidDuration` when `duration_seconds` is zero.
    pub fn start(clock: Clock, duration_seconds: u32) -> Result<Self, TimerError> {
        if duration_seconds == 0 {
            return Err(TimerError::InvalidDuration {
                provided: duration_seconds,
            });
        }

        let deadline = clock.now() + Duration::seconds(i64::from(duration_seconds));
        Ok(Self {
            clock,
            deadline,
            duration_seconds,
            last_reported: None,
            frozen_remaining: None,
            running: true,
            expired: false,
        })
    }

    /// Remaining whole seconds, never negative.
    ///
    /// After `stop()` or expiry this reports the value frozen at that moment.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        if let Some(frozen) = self.frozen_remaining {
            return frozen;
        }
        let left = (self.deadline - self.clock.now()).num_seconds();
        u64::try_from(left).unwrap_or(0)
    }

    /// Observe the countdown once; intended to be called once per second by
    /// the host event loop.
    ///
    /// Reaching zero stops the timer autonomously and yields `Tick::Expired`
    /// exactly once, even if polls were skipped and the deadline is long past.
    pub fn poll(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }

        let remaining = self.remaining();
        if remaining == 0 {
            self.running = false;
            self.expired = true;
            self.frozen_remaining = Some(0);
            return Tick::Expired;
        }

        if self.last_reported == Some(remaining) {
            return Tick::Idle;
        }
        self.last_reported = Some(remaining);
        Tick::Running(remaining)
    }

    /// Stop the countdown, freezing the remaining time. Idempotent; calls
    /// after the first (or after expiry) are no-ops.
    pub fn stop(&mut self) {
        if self.running {
            self.frozen_remaining = Some(self.remaining());
            self.running = false;
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True once the countdown reached zero on its own.
    #[must_use]
    pub fn has_expired(&self) -> bool {
        self.expired
    }

    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// Replace the timer's clock. Used by tests to advance a fixed clock that
    /// was copied into the timer at start.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_clock;

    #[test]
    fn zero_duration_is_rejected() {
        let err = CountdownTimer::start(fixed_clock(), 0).unwrap_err();
        assert_eq!(err, TimerError::InvalidDuration { provided: 0 });
    }

    #[test]
    fn remaining_counts_down_with_the_clock() {
        let mut clock = fixed_clock();
        let mut timer = CountdownTimer::start(clock, 30).unwrap();
        assert_eq!(timer.remaining(), 30);

        clock.advance_secs(1);
        timer.set_clock(clock);
        assert_eq!(timer.remaining(), 29);
        assert_eq!(timer.poll(), Tick::Running(29));

        // Same second observed twice reports nothing new.
        assert_eq!(timer.poll(), Tick::Idle);
    }

    #[test]
    fn expiry_fires_exactly_once() {
        let mut clock = fixed_clock();
        let mut timer = CountdownTimer::start(clock, 5).unwrap();

        clock.advance_secs(5);
        timer.set_clock(clock);
        assert_eq!(timer.poll(), Tick::Expired);
        assert!(timer.has_expired());
        assert!(!timer.is_running());

        clock.advance_secs(10);
        timer.set_clock(clock);
        assert_eq!(timer.poll(), Tick::Idle);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn skipped_polls_clamp_to_zero() {
        let mut clock = fixed_clock();
        let mut timer = CountdownTimer::start(clock, 60).unwrap();

        // Host suspended: the clock jumps far past the deadline.
        clock.advance_secs(3600);
        timer.set_clock(clock);
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.poll(), Tick::Expired);
        assert_eq!(timer.poll(), Tick::Idle);
    }

    #[test]
    fn stop_freezes_remaining_and_is_idempotent() {
        let mut clock = fixed_clock();
        let mut timer = CountdownTimer::start(clock, 60).unwrap();

        clock.advance_secs(10);
        timer.set_clock(clock);
        timer.stop();
        assert_eq!(timer.remaining(), 50);
        assert!(!timer.is_running());
        assert!(!timer.has_expired());

        // Later stops and clock movement change nothing.
        clock.advance_secs(100);
        timer.set_clock(clock);
        timer.stop();
        assert_eq!(timer.remaining(), 50);
        assert_eq!(timer.poll(), Tick::Idle);
    }

    #[test]
    fn expiry_does_not_fire_after_stop() {
        let mut clock = fixed_clock();
        let mut timer = CountdownTimer::start(clock, 5).unwrap();
        timer.stop();

        clock.advance_secs(60);
        timer.set_clock(clock);
        assert_eq!(timer.poll(), Tick::Idle);
        assert!(!timer.has_expired());
    }
}
