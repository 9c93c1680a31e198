//! The session clock: at most one active session and its live counter.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::session::{WorkSession, seconds_between};

/// Invalid clock transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// Clock-in was requested while a session is already running.
    #[error("already clocked in since {since}")]
    AlreadyWorking { since: DateTime<Utc> },
    /// Clock-out was requested with no running session.
    #[error("not clocked in")]
    NotWorking,
}

/// Tracks the active session and the elapsed seconds shown for it.
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    active: Option<WorkSession>,
    elapsed: i64,
}

impl SessionClock {
    /// Creates an idle clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock resuming a session restored from a backing store.
    pub fn resume(active: WorkSession, now: DateTime<Utc>) -> Self {
        let mut clock = Self {
            active: Some(active),
            elapsed: 0,
        };
        clock.tick(now);
        clock
    }

    pub const fn is_working(&self) -> bool {
        self.active.is_some()
    }

    pub const fn active(&self) -> Option<&WorkSession> {
        self.active.as_ref()
    }

    /// Elapsed seconds as of the last tick. Zero while idle.
    pub const fn elapsed(&self) -> i64 {
        self.elapsed
    }

    /// Elapsed seconds to add to totals: `Some` only while working.
    pub const fn live_elapsed(&self) -> Option<i64> {
        if self.active.is_some() {
            Some(self.elapsed)
        } else {
            None
        }
    }

    /// Validates that a clock-in would succeed, without starting a session.
    pub fn check_idle(&self) -> Result<(), ClockError> {
        match &self.active {
            Some(active) => Err(ClockError::AlreadyWorking {
                since: active.clock_in,
            }),
            None => Ok(()),
        }
    }

    /// Installs an already-created session as the active one.
    ///
    /// Callers check [`Self::check_idle`] first.
    pub(crate) fn begin(&mut self, session: WorkSession) {
        self.active = Some(session);
        self.elapsed = 0;
    }

    /// Ends the running session at `now` and returns the completed entry.
    pub fn clock_out(&mut self, now: DateTime<Utc>) -> Result<WorkSession, ClockError> {
        let active = self.active.take().ok_or(ClockError::NotWorking)?;
        self.elapsed = 0;
        Ok(active.complete(now))
    }

    /// Recomputes the elapsed counter from the active session's clock-in.
    ///
    /// Returns `false` once the clock is idle, which tells a periodic driver
    /// to stop.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match &self.active {
            Some(active) => {
                self.elapsed = seconds_between(active.clock_in, now);
                true
            }
            None => {
                self.elapsed = 0;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone};

    fn nine() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 22, 9, 0, 0).unwrap()
    }

    fn clock_in(clock: &mut SessionClock, now: DateTime<Utc>) -> Result<(), ClockError> {
        clock.check_idle()?;
        clock.begin(WorkSession::start(now));
        Ok(())
    }

    #[test]
    fn clock_in_starts_at_zero() {
        let mut clock = SessionClock::new();
        clock_in(&mut clock, nine()).unwrap();
        assert_eq!(clock.active().unwrap().clock_in, nine());
        assert!(clock.is_working());
        assert_eq!(clock.elapsed(), 0);
    }

    #[test]
    fn clock_in_while_working_is_rejected() {
        let mut clock = SessionClock::new();
        clock_in(&mut clock, nine()).unwrap();
        let first_id = clock.active().unwrap().id.clone();

        let err = clock_in(&mut clock, nine() + Duration::hours(1)).unwrap_err();
        assert_eq!(err, ClockError::AlreadyWorking { since: nine() });
        assert_eq!(clock.active().unwrap().id, first_id);
        assert_eq!(clock.active().unwrap().clock_in, nine());
    }

    #[test]
    fn clock_out_without_session_is_rejected() {
        let mut clock = SessionClock::new();
        assert_eq!(clock.clock_out(nine()), Err(ClockError::NotWorking));
    }

    #[test]
    fn clock_out_computes_duration_and_resets() {
        let mut clock = SessionClock::new();
        clock_in(&mut clock, nine()).unwrap();
        clock.tick(nine() + Duration::seconds(90));
        assert_eq!(clock.elapsed(), 90);

        let entry = clock.clock_out(nine() + Duration::seconds(125)).unwrap();
        assert_eq!(entry.duration, Some(125));
        assert!(!clock.is_working());
        assert_eq!(clock.elapsed(), 0);
        assert_eq!(clock.live_elapsed(), None);
    }

    #[test]
    fn repeated_sessions_keep_duration_consistent() {
        let mut clock = SessionClock::new();
        let mut start = nine();
        for minutes in [0_i64, 1, 59, 61, 600] {
            clock_in(&mut clock, start).unwrap();
            let end = start + Duration::minutes(minutes) + Duration::milliseconds(400);
            let entry = clock.clock_out(end).unwrap();
            let out = entry.clock_out.unwrap();
            assert_eq!(entry.duration, Some((out - entry.clock_in).num_seconds()));
            assert!(entry.duration.unwrap() >= 0);
            start = end + Duration::minutes(5);
        }
    }

    #[test]
    fn tick_reports_idle() {
        let mut clock = SessionClock::new();
        assert!(!clock.tick(nine()));
        clock_in(&mut clock, nine()).unwrap();
        assert!(clock.tick(nine() + Duration::seconds(1)));
        assert_eq!(clock.live_elapsed(), Some(1));
    }

    #[test]
    fn resume_computes_elapsed_immediately() {
        let session = WorkSession::start(nine());
        let clock = SessionClock::resume(session, nine() + Duration::minutes(3));
        assert!(clock.is_working());
        assert_eq!(clock.elapsed(), 180);
    }
}
