//! Edit command: rewrite an entry's clock-in and clock-out.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use wh_core::{EditForm, EntryStore, SessionId, Tracker, format_date, format_duration, format_time};

use crate::EditArgs;

/// Applies the given times to the entry, or prints its current values when
/// no time is given. A time left out keeps the entry's current value.
pub async fn run<S, W, Tz>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    now: DateTime<Utc>,
    tz: &Tz,
    args: &EditArgs,
) -> Result<()>
where
    S: EntryStore,
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let id = SessionId::new(args.id.as_str()).context("invalid entry id")?;
    tracker.load(now).await.context("failed to load entries")?;
    let entry = tracker
        .find(&id)
        .with_context(|| format!("no entry with id {id}"))?;
    let mut form = EditForm::from_entry(entry, tz);

    if args.clock_in.is_none() && args.clock_out.is_none() {
        writeln!(writer, "Clock in:  {}", form.clock_in)?;
        writeln!(writer, "Clock out: {}", form.clock_out)?;
        return Ok(());
    }

    if let Some(clock_in) = &args.clock_in {
        form.clock_in.clone_from(clock_in);
    }
    if let Some(clock_out) = &args.clock_out {
        form.clock_out.clone_from(clock_out);
    }

    let updated = tracker.edit(&id, &form, now, tz).await?;
    let clock_out = updated.clock_out.unwrap_or(updated.clock_in);
    writeln!(
        writer,
        "Updated {id}: {} {} - {} ({})",
        format_date(updated.clock_in, tz),
        format_time(updated.clock_in, tz),
        format_time(clock_out, tz),
        format_duration(updated.duration_or_zero())
    )?;
    Ok(())
}
