//! History command: recent entries, most recent first.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use wh_core::{EntryStore, Tracker, WorkSession, format_date, format_duration, format_time};

use super::notify;

pub async fn run<S, W, Tz>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    now: DateTime<Utc>,
    tz: &Tz,
    limit: usize,
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
    let entries: Vec<&WorkSession> = tracker.recent(limit).collect();

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No entries recorded.")?;
        return Ok(());
    }

    for entry in entries {
        writeln!(writer, "{}", format_entry(entry, tz))?;
    }
    Ok(())
}

/// `DD/MM/YYYY  HH:MM - HH:MM  H:MM:SS  <id>`
fn format_entry<Tz: TimeZone>(entry: &WorkSession, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let clock_out = entry
        .clock_out
        .map_or_else(|| "--:--".to_string(), |at| format_time(at, tz));
    let duration = entry
        .duration
        .map_or_else(|| "-".to_string(), format_duration);
    format!(
        "{}  {} - {}  {}  {}",
        format_date(entry.clock_in, tz),
        format_time(entry.clock_in, tz),
        clock_out,
        duration,
        entry.id
    )
}
