//! CLI subcommand implementations.
//!
//! Each command takes the tracker, the current instant and the display time
//! zone explicitly, so tests can drive them with an in-memory store and UTC.

pub mod clock;
pub mod edit;
pub mod history;
pub mod status;
pub mod watch;

use std::fmt::Display;
use std::io;

use anyhow::Result;
use chrono::{Local, Utc};
use wh_core::{EntryStore, Tracker};

use crate::Commands;

/// Runs `command` against `tracker`, writing to stdout in local time.
pub async fn dispatch<S: EntryStore>(tracker: &mut Tracker<S>, command: &Commands) -> Result<()> {
    let now = Utc::now();
    let mut stdout = io::stdout();
    match command {
        Commands::In => clock::clock_in(&mut stdout, tracker, now, &Local).await,
        Commands::Out => clock::clock_out(&mut stdout, tracker, now).await,
        Commands::Status { json } => status::run(&mut stdout, tracker, now, &Local, *json).await,
        Commands::History { limit, json } => {
            history::run(&mut stdout, tracker, now, &Local, *limit, *json).await
        }
        Commands::Edit(args) => edit::run(&mut stdout, tracker, now, &Local, args).await,
        Commands::Watch { clock_out } => watch::run(tracker, &Local, *clock_out).await,
    }
}

/// Reports a non-fatal failure to the user.
pub(crate) fn notify(title: &str, detail: &dyn Display) {
    eprintln!("{title}: {detail}");
}
