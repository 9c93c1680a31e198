//! Status command: working state, live elapsed time and totals.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use wh_core::{EntryStore, Tracker, format_duration, format_time};

use super::notify;

/// Status as printed by `wh status --json`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub working: bool,
    pub since: Option<DateTime<Utc>>,
    pub elapsed_seconds: Option<i64>,
    pub today_seconds: i64,
    pub week_seconds: i64,
    pub all_time_seconds: i64,
}

impl StatusReport {
    pub fn new<S: EntryStore, Tz: TimeZone>(tracker: &Tracker<S>, now: DateTime<Utc>, tz: &Tz) -> Self {
        let clock = tracker.clock();
        let totals = tracker.totals(now, tz);
        Self {
            working: clock.is_working(),
            since: clock.active().map(|active| active.clock_in),
            elapsed_seconds: clock.live_elapsed(),
            today_seconds: totals.today,
            week_seconds: totals.week,
            all_time_seconds: totals.all_time,
        }
    }
}

/// Prints the status. A store that cannot be read is reported and treated
/// as empty.
pub async fn run<S, W, Tz>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    now: DateTime<Utc>,
    tz: &Tz,
    json: bool,
) -> Result<()>
where
    S: EntryStore,
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if let Err(err) = tracker.load(now).await {
        notify("Could not load entries", &err);
    }
    let report = StatusReport::new(tracker, now, tz);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    match (report.since, report.elapsed_seconds) {
        (Some(since), Some(elapsed)) => writeln!(
            writer,
            "Working since {} ({})",
            format_time(since, tz),
            format_duration(elapsed)
        )?,
        _ => writeln!(writer, "Not working")?,
    }
    writeln!(writer, "Today: {}", format_duration(report.today_seconds))?;
    writeln!(writer, "This week: {}", format_duration(report.week_seconds))?;
    writeln!(writer, "All time: {}", format_duration(report.all_time_seconds))?;
    Ok(())
}
