//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use wh_core::RECENT_LIMIT;

use crate::config::Backend;

/// Work hours clock.
///
/// Clock in and out, see today/week/all-time totals, and review or correct
/// recorded sessions.
#[derive(Debug, Parser)]
#[command(name = "wh", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backing store to use, overriding the configuration.
    #[arg(long, global = true, value_enum)]
    pub backend: Option<Backend>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a work session.
    In,

    /// End the running work session and record it.
    Out,

    /// Show working state and totals.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List recent entries, most recent first.
    History {
        /// Number of entries to show.
        #[arg(short = 'n', long, default_value_t = RECENT_LIMIT)]
        limit: usize,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Change the clock-in and clock-out of an entry.
    ///
    /// Without times, prints the entry's current values.
    Edit(EditArgs),

    /// Show the running session's counter, updated every second.
    Watch {
        /// Clock out when interrupted.
        #[arg(long)]
        clock_out: bool,
    },
}

/// Arguments for `wh edit`.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// The entry ID (see `wh history`).
    pub id: String,

    /// New clock-in, as YYYY-MM-DDTHH:MM local time.
    #[arg(long)]
    pub clock_in: Option<String>,

    /// New clock-out, as YYYY-MM-DDTHH:MM local time.
    #[arg(long)]
    pub clock_out: Option<String>,
}
