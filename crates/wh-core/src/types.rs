//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// A validated session identifier.
///
/// Session IDs must be non-empty strings. New sessions get a time-based token
/// (`session_<unix millis>`); IDs loaded from a backing store are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty {
                field: "session ID",
            });
        }
        Ok(Self(id))
    }

    /// Generates the ID for a session started at `at`.
    #[must_use]
    pub fn at(at: DateTime<Utc>) -> Self {
        Self(format!("session_{}", at.timestamp_millis()))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for SessionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    #[test]
    fn session_id_rejects_empty() {
        assert_eq!(
            SessionId::new(""),
            Err(ValidationError::Empty {
                field: "session ID"
            })
        );
    }

    #[test]
    fn session_id_from_timestamp_uses_millis() {
        let at = Utc.with_ymd_and_hms(2025, 7, 22, 9, 0, 0).unwrap();
        let id = SessionId::at(at);
        assert_eq!(id.as_str(), "session_1753174800000");
    }

    #[test]
    fn session_id_deserialize_rejects_empty() {
        let result: Result<SessionId, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let id = SessionId::new("row-7").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""row-7""#);
    }
}
