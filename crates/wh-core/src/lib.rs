//! Core domain logic for the work hours clock.
//!
//! This crate contains the fundamental types and logic for:
//! - Sessions: the clock-in/clock-out record and its duration arithmetic
//! - The session clock: the single active session and its live counter
//! - Statistics: today/week/all-time totals and recent history
//! - Editing: the datetime form used to rewrite an entry
//! - Storage: the [`EntryStore`] seam implemented by the backing stores

pub mod clock;
pub mod edit;
pub mod format;
pub mod session;
pub mod stats;
pub mod store;
pub mod tracker;
pub mod types;

pub use clock::{ClockError, SessionClock};
pub use edit::{EditError, EditForm};
pub use format::{format_date, format_duration, format_time};
pub use session::{WorkSession, seconds_between};
pub use stats::{RECENT_LIMIT, Totals};
pub use store::{EntryStore, Loaded};
pub use tracker::{Tracker, TrackerError};
pub use types::{SessionId, ValidationError};
