//! The edit form used to rewrite an entry's clock-in and clock-out.
//!
//! Values use the local datetime-input format `YYYY-MM-DDTHH:MM`, interpreted
//! in the caller's time zone.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::session::WorkSession;

/// Format of a datetime-input value.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Edit form rejections. None of these reach the backing store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A required field was left empty.
    #[error("{field} is required")]
    Missing { field: &'static str },
    /// A field did not parse as `YYYY-MM-DDTHH:MM`.
    #[error("invalid {field}: {value} (expected YYYY-MM-DDTHH:MM)")]
    Invalid { field: &'static str, value: String },
    /// The wall-clock time does not exist in the time zone (DST gap).
    #[error("{field} {value} does not exist in the local time zone")]
    Nonexistent { field: &'static str, value: String },
    /// Clock-out precedes clock-in.
    #[error("clock-out {clock_out} is before clock-in {clock_in}")]
    ClockOutBeforeClockIn {
        clock_in: DateTime<Utc>,
        clock_out: DateTime<Utc>,
    },
}

/// Editable clock-in/clock-out values for one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub clock_in: String,
    pub clock_out: String,
}

impl EditForm {
    /// Pre-fills the form from an entry's timestamps.
    ///
    /// A missing clock-out leaves that field empty.
    pub fn from_entry<Tz: TimeZone>(entry: &WorkSession, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            clock_in: to_datetime_local(entry.clock_in, tz),
            clock_out: entry
                .clock_out
                .map(|at| to_datetime_local(at, tz))
                .unwrap_or_default(),
        }
    }

    /// Parses both fields into instants.
    pub fn parse<Tz: TimeZone>(&self, tz: &Tz) -> Result<(DateTime<Utc>, DateTime<Utc>), EditError> {
        let clock_in = parse_field("clock-in", &self.clock_in, tz)?;
        let clock_out = parse_field("clock-out", &self.clock_out, tz)?;
        if clock_out < clock_in {
            return Err(EditError::ClockOutBeforeClockIn {
                clock_in,
                clock_out,
            });
        }
        Ok((clock_in, clock_out))
    }

    /// Applies the form to `entry`, recomputing the duration.
    pub fn apply<Tz: TimeZone>(&self, entry: &WorkSession, tz: &Tz) -> Result<WorkSession, EditError> {
        let (clock_in, clock_out) = self.parse(tz)?;
        Ok(entry.with_times(clock_in, clock_out))
    }
}

/// Renders an instant as a datetime-input value in `tz`.
pub fn to_datetime_local<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format(DATETIME_LOCAL_FORMAT).to_string()
}

fn parse_field<Tz: TimeZone>(
    field: &'static str,
    value: &str,
    tz: &Tz,
) -> Result<DateTime<Utc>, EditError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EditError::Missing { field });
    }
    let naive = NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| EditError::Invalid {
            field,
            value: value.to_string(),
        })?;
    // Ambiguous times (DST fall-back) resolve to the earlier instant.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| EditError::Nonexistent {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::FixedOffset;

    use crate::types::SessionId;

    fn entry() -> WorkSession {
        let clock_in = Utc.with_ymd_and_hms(2025, 7, 22, 6, 0, 42).unwrap();
        WorkSession {
            id: SessionId::new("session_1").unwrap(),
            clock_in,
            clock_out: Some(Utc.with_ymd_and_hms(2025, 7, 22, 14, 30, 0).unwrap()),
            duration: Some(30_558),
        }
    }

    fn plus_three() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    #[test]
    fn from_entry_prefills_local_values() {
        let form = EditForm::from_entry(&entry(), &plus_three());
        assert_eq!(form.clock_in, "2025-07-22T09:00");
        assert_eq!(form.clock_out, "2025-07-22T17:30");
    }

    #[test]
    fn from_entry_leaves_missing_clock_out_empty() {
        let mut open = entry();
        open.clock_out = None;
        let form = EditForm::from_entry(&open, &Utc);
        assert!(form.clock_out.is_empty());
        assert_eq!(
            form.parse(&Utc),
            Err(EditError::Missing { field: "clock-out" })
        );
    }

    #[test]
    fn apply_recomputes_duration() {
        let form = EditForm {
            clock_in: "2025-07-22T08:00".to_string(),
            clock_out: "2025-07-22T16:45".to_string(),
        };
        let edited = form.apply(&entry(), &plus_three()).unwrap();
        assert_eq!(edited.id, entry().id);
        assert_eq!(
            edited.clock_in,
            Utc.with_ymd_and_hms(2025, 7, 22, 5, 0, 0).unwrap()
        );
        assert_eq!(edited.duration, Some(8 * 3600 + 45 * 60));
    }

    #[test]
    fn missing_field_is_rejected() {
        let form = EditForm {
            clock_in: "2025-07-22T08:00".to_string(),
            clock_out: "  ".to_string(),
        };
        assert_eq!(
            form.parse(&Utc),
            Err(EditError::Missing { field: "clock-out" })
        );
    }

    #[test]
    fn malformed_field_is_rejected() {
        let form = EditForm {
            clock_in: "22/07/2025 08:00".to_string(),
            clock_out: "2025-07-22T16:45".to_string(),
        };
        assert!(matches!(
            form.parse(&Utc),
            Err(EditError::Invalid { field: "clock-in", .. })
        ));
    }

    #[test]
    fn clock_out_before_clock_in_is_rejected() {
        let form = EditForm {
            clock_in: "2025-07-22T17:00".to_string(),
            clock_out: "2025-07-22T09:00".to_string(),
        };
        assert!(matches!(
            form.parse(&Utc),
            Err(EditError::ClockOutBeforeClockIn { .. })
        ));
    }

    #[test]
    fn accepts_seconds() {
        let form = EditForm {
            clock_in: "2025-07-22T08:00:30".to_string(),
            clock_out: "2025-07-22T08:01:00".to_string(),
        };
        let (start, end) = form.parse(&Utc).unwrap();
        assert_eq!((end - start).num_seconds(), 30);
    }
}
