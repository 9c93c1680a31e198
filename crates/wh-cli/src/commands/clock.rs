//! `wh in` and `wh out`.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, TimeZone, Utc};
use wh_core::format::format_time_with_seconds;
use wh_core::{EntryStore, Tracker, TrackerError, format_duration};

use super::notify;

pub async fn clock_in<S, W, Tz>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<()>
where
    S: EntryStore,
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tracker.load(now).await.context("failed to load entries")?;
    if let Some(active) = tracker.clock().active() {
        bail!(
            "already clocked in since {}",
            format_time_with_seconds(active.clock_in, tz)
        );
    }

    let session = tracker.clock_in(now).await?;
    writeln!(
        writer,
        "Clocked in at {}",
        format_time_with_seconds(session.clock_in, tz)
    )?;
    Ok(())
}

/// Ends the running session.
///
/// A session the store fails to save is still reported as clocked out, with
/// a notification; the save is not retried.
pub async fn clock_out<S, W>(writer: &mut W, tracker: &mut Tracker<S>, now: DateTime<Utc>) -> Result<()>
where
    S: EntryStore,
    W: Write,
{
    tracker.load(now).await.context("failed to load entries")?;
    if !tracker.clock().is_working() {
        bail!("not clocked in");
    }

    let duration = match tracker.clock_out(now).await {
        Ok(entry) => entry.duration_or_zero(),
        Err(TrackerError::Save { id, source }) => {
            notify("Entry not saved", &source);
            tracker.find(&id).map_or(0, |entry| entry.duration_or_zero())
        }
        Err(err) => return Err(err.into()),
    };
    writeln!(writer, "Clocked out. Worked {}", format_duration(duration))?;
    Ok(())
}
