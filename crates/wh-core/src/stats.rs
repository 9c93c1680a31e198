//! Derived statistics over the entry sequence.
//!
//! All functions are pure: they take the entries, the live elapsed time (if a
//! session is running), the current instant and the time zone used to answer
//! calendar questions.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::Serialize;

use crate::session::WorkSession;

/// Number of entries shown in the recent history.
pub const RECENT_LIMIT: usize = 10;

/// Aggregate totals in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub today: i64,
    pub week: i64,
    pub all_time: i64,
}

impl Totals {
    /// Computes all three totals at `now`.
    pub fn compute<Tz: TimeZone>(
        entries: &[WorkSession],
        live_elapsed: Option<i64>,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Self {
        Self {
            today: today_total(entries, live_elapsed, now, tz),
            week: week_total(entries, live_elapsed, now, tz),
            all_time: all_time_total(entries, live_elapsed),
        }
    }
}

/// Sum of durations of entries clocked in on today's calendar date in `tz`.
pub fn today_total<Tz: TimeZone>(
    entries: &[WorkSession],
    live_elapsed: Option<i64>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> i64 {
    let today = now.with_timezone(tz).date_naive();
    let recorded: i64 = entries
        .iter()
        .filter(|entry| entry.clock_in.with_timezone(tz).date_naive() == today)
        .map(WorkSession::duration_or_zero)
        .sum();
    recorded + live_elapsed.unwrap_or(0)
}

/// Start of the current week: `now` minus one day per weekday since Sunday.
///
/// The result is not truncated to midnight, so the boundary keeps the current
/// time of day (Wednesday 15:00 gives Sunday 15:00).
pub fn week_start<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let weekday = now.with_timezone(tz).weekday().num_days_from_sunday();
    now - Duration::days(i64::from(weekday))
}

/// Sum of durations of entries clocked in at or after [`week_start`].
pub fn week_total<Tz: TimeZone>(
    entries: &[WorkSession],
    live_elapsed: Option<i64>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> i64 {
    let start = week_start(now, tz);
    let recorded: i64 = entries
        .iter()
        .filter(|entry| entry.clock_in >= start)
        .map(WorkSession::duration_or_zero)
        .sum();
    recorded + live_elapsed.unwrap_or(0)
}

/// Sum of all recorded durations.
pub fn all_time_total(entries: &[WorkSession], live_elapsed: Option<i64>) -> i64 {
    let recorded: i64 = entries.iter().map(WorkSession::duration_or_zero).sum();
    recorded + live_elapsed.unwrap_or(0)
}

/// The last `limit` entries, most recent first.
pub fn recent(entries: &[WorkSession], limit: usize) -> impl Iterator<Item = &WorkSession> {
    entries.iter().rev().take(limit)
}
