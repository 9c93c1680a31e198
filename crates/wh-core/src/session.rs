//! Work sessions: one contiguous interval from clock-in to clock-out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SessionId;

/// A work session.
///
/// While active, `clock_out` and `duration` are `None`. A completed session
/// (an entry) has both set, with `duration` equal to the whole seconds between
/// clock-in and clock-out.
///
/// Serialized with camelCase field names and RFC 3339 timestamps, which is the
/// shape the local store keeps under `timeEntries` and `currentSession`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    pub id: SessionId,
    pub clock_in: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_out: Option<DateTime<Utc>>,
    /// Duration in whole seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

impl WorkSession {
    /// Starts a new session at `now`.
    #[must_use]
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::at(now),
            clock_in: now,
            clock_out: None,
            duration: None,
        }
    }

    /// Returns the completed session, clocked out at `now`.
    #[must_use]
    pub fn complete(self, now: DateTime<Utc>) -> Self {
        self.with_times(self.clock_in, now)
    }

    /// Returns a copy with rewritten timestamps and a recomputed duration.
    #[must_use]
    pub fn with_times(&self, clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            clock_in,
            clock_out: Some(clock_out),
            duration: Some(seconds_between(clock_in, clock_out)),
        }
    }

    /// Recorded duration, or 0 when none was recorded.
    pub fn duration_or_zero(&self) -> i64 {
        self.duration.unwrap_or(0)
    }
}

/// Whole seconds from `start` to `end`, floored and never negative.
///
/// A clock that jumped backwards yields 0 rather than a negative duration.
pub fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    millis.div_euclid(1000).max(0)
}
