//! Display formatting for durations, times and dates.

use chrono::{DateTime, TimeZone, Utc};

/// Formats whole seconds as `H:MM:SS`, or `M:SS` under an hour.
///
/// Hours and the leading minute digit carry no zero padding. Negative input
/// renders as `0:00`.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Wall-clock time as `HH:MM` (24-hour) in `tz`.
pub fn format_time<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%H:%M").to_string()
}

/// Wall-clock time with seconds, `HH:MM:SS`, in `tz`.
pub fn format_time_with_seconds<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%H:%M:%S").to_string()
}

/// Calendar date as `DD/MM/YYYY` in `tz`.
pub fn format_date<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%d/%m/%Y").to_string()
}
