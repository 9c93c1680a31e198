//! Watch command: a live counter for the running session.

use std::fmt::Display;
use std::io::{self, Write};
use std::ops::ControlFlow;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use wh_core::{EntryStore, SessionClock, Tracker, format_duration, format_time, stats};

use super::clock;
use crate::ticker::{TICK_PERIOD, Ticker};

/// Redraws the elapsed time every second until Ctrl-C.
///
/// The counter runs from the session loaded at start; a clock-out from
/// another `wh` process does not stop it.
/// With `clock_out`, the session is ended once interrupted.
pub async fn run<S, Tz>(tracker: &mut Tracker<S>, tz: &Tz, clock_out: bool) -> Result<()>
where
    S: EntryStore,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut stdout = io::stdout();
    let now = Utc::now();
    tracker.load(now).await.context("failed to load entries")?;
    let Some(active) = tracker.clock().active().cloned() else {
        writeln!(stdout, "Not working")?;
        return Ok(());
    };

    let recorded_today = stats::today_total(tracker.entries(), None, now, tz);
    writeln!(
        stdout,
        "Working since {} (Ctrl-C to stop)",
        format_time(active.clock_in, tz)
    )?;

    let mut display = SessionClock::resume(active, now);
    write!(stdout, "{}", counter_line(display.elapsed(), recorded_today))?;
    stdout.flush()?;

    let ticker = Ticker::spawn(TICK_PERIOD, move || {
        if !display.tick(Utc::now()) {
            return ControlFlow::Break(());
        }
        let mut stdout = io::stdout().lock();
        let drawn = write!(stdout, "{}", counter_line(display.elapsed(), recorded_today))
            .and_then(|()| stdout.flush());
        match drawn {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => {
                tracing::debug!(error = %err, "stopping counter");
                ControlFlow::Break(())
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    ticker.cancel();
    writeln!(stdout)?;

    if clock_out {
        clock::clock_out(&mut stdout, tracker, Utc::now()).await?;
    }
    Ok(())
}

/// The counter, drawn over the previous one.
fn counter_line(elapsed: i64, recorded_today: i64) -> String {
    format!(
        "\r{}  (today {})",
        format_duration(elapsed),
        format_duration(recorded_today + elapsed)
    )
}
