//! Spreadsheet rows and their text encoding.
//!
//! Each row stores a session as locale text: the clock-in date, two wall-clock
//! times and the duration in seconds as a numeric string.

use std::fmt::Display;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use wh_core::{SessionId, WorkSession, seconds_between};

/// `DD/MM/YYYY` or `DD.MM.YYYY`; day and month may be unpadded.
static SHEET_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[./](\d{1,2})[./](\d{4})$").unwrap());

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M:%S";

/// One row of the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    #[serde(rename = "ID", default, deserialize_with = "text")]
    pub id: String,
    #[serde(rename = "Date", default, deserialize_with = "text")]
    pub date: String,
    #[serde(rename = "Clock In", default, deserialize_with = "text")]
    pub clock_in: String,
    #[serde(rename = "Clock Out", default, deserialize_with = "text")]
    pub clock_out: String,
    #[serde(rename = "Duration (sec)", default, deserialize_with = "text")]
    pub duration: String,
}

impl SheetRow {
    /// Encodes a session as a row, with dates and times in `tz`.
    pub fn from_session<Tz: TimeZone>(session: &WorkSession, tz: &Tz) -> Self
    where
        Tz::Offset: Display,
    {
        let clock_in = session.clock_in.with_timezone(tz);
        Self {
            id: session.id.to_string(),
            date: clock_in.format(DATE_FORMAT).to_string(),
            clock_in: clock_in.format(TIME_FORMAT).to_string(),
            clock_out: session
                .clock_out
                .map(|at| at.with_timezone(tz).format(TIME_FORMAT).to_string())
                .unwrap_or_default(),
            duration: session
                .duration
                .map(|seconds| seconds.to_string())
                .unwrap_or_default(),
        }
    }

    /// Decodes the row, or `None` when its ID or clock-in is unusable.
    ///
    /// A clock-out earlier than the clock-in is taken to be on the next day.
    /// A missing or non-numeric duration falls back to the difference between
    /// the two times.
    pub fn to_session<Tz: TimeZone>(&self, tz: &Tz) -> Option<WorkSession> {
        let id = SessionId::new(self.id.trim()).ok()?;
        let clock_in = parse_sheet_datetime(&self.date, &self.clock_in, tz)?;
        let clock_out = parse_sheet_datetime(&self.date, &self.clock_out, tz).map(|out| {
            if out < clock_in {
                out + Duration::days(1)
            } else {
                out
            }
        });
        let duration = self
            .duration
            .trim()
            .parse::<i64>()
            .ok()
            .map(|seconds| seconds.max(0))
            .or_else(|| clock_out.map(|out| seconds_between(clock_in, out)));

        Some(WorkSession {
            id,
            clock_in,
            clock_out,
            duration,
        })
    }
}

/// Parses a sheet date and time of day into an instant in `tz`.
///
/// Returns `None` for empty or malformed text and for wall-clock times that
/// do not exist in `tz`.
pub fn parse_sheet_datetime<Tz: TimeZone>(date: &str, time: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let date = parse_sheet_date(date)?;
    let time = time.trim();
    if time.is_empty() {
        return None;
    }
    let time = NaiveTime::parse_from_str(time, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .ok()?;
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_sheet_date(date: &str) -> Option<NaiveDate> {
    let caps = SHEET_DATE_RE.captures(date.trim())?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Accepts a cell as text, a number, or null.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
