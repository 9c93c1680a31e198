//! The local backing store: sessions kept as JSON in the key-value table.

use serde_json::Value;
use wh_core::{EntryStore, Loaded, WorkSession};

use crate::{Database, DbError};

/// Key holding the JSON array of completed entries.
pub const TIME_ENTRIES_KEY: &str = "timeEntries";
/// Key holding the JSON of the in-progress session.
pub const CURRENT_SESSION_KEY: &str = "currentSession";
/// Key holding the `"true"`/`"false"` working flag.
pub const IS_WORKING_KEY: &str = "isWorking";

/// Backing store on local device storage.
#[derive(Debug)]
pub struct LocalStore {
    db: Database,
}

impl LocalStore {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// Reads the stored entry list as raw JSON values.
    fn read_values(&self) -> Result<Vec<Value>, DbError> {
        let Some(raw) = self.db.get(TIME_ENTRIES_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| DbError::InvalidValue {
            key: TIME_ENTRIES_KEY,
            source,
        })
    }

    /// Reads the stored entries, skipping any that fail to parse.
    fn read_entries(&self) -> Result<Vec<WorkSession>, DbError> {
        let values = self.read_values()?;
        let mut entries = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<WorkSession>(value) {
                Ok(entry) => entries.push(entry),
                Err(err) => tracing::debug!(error = %err, "skipping unreadable entry"),
            }
        }
        Ok(entries)
    }

    /// Reads the in-progress session while the working flag is set.
    fn read_active(&self) -> Result<Option<WorkSession>, DbError> {
        if self.db.get(IS_WORKING_KEY)?.as_deref() != Some("true") {
            return Ok(None);
        }
        let Some(raw) = self.db.get(CURRENT_SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<WorkSession>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring unreadable current session");
                Ok(None)
            }
        }
    }

    fn write_entries(&mut self, values: &[Value]) -> Result<(), DbError> {
        let encoded = encode(TIME_ENTRIES_KEY, values)?;
        self.db.write_all(&[
            (TIME_ENTRIES_KEY, Some(encoded.as_str())),
            (CURRENT_SESSION_KEY, None),
            (IS_WORKING_KEY, Some("false")),
        ])
    }
}

fn encode<T: serde::Serialize + ?Sized>(key: &'static str, value: &T) -> Result<String, DbError> {
    serde_json::to_string(value).map_err(|source| DbError::Encode { key, source })
}

fn to_value(entry: &WorkSession) -> Result<Value, DbError> {
    serde_json::to_value(entry).map_err(|source| DbError::Encode {
        key: TIME_ENTRIES_KEY,
        source,
    })
}

fn has_id(value: &Value, entry: &WorkSession) -> bool {
    value.get("id").and_then(Value::as_str) == Some(entry.id.as_str())
}

impl EntryStore for LocalStore {
    type Error = DbError;

    async fn load(&mut self) -> Result<Loaded, DbError> {
        let entries = self.read_entries()?;
        let active = self.read_active()?;
        tracing::debug!(
            entries = entries.len(),
            working = active.is_some(),
            "read local storage"
        );
        Ok(Loaded { entries, active })
    }

    async fn mark_active(&mut self, session: &WorkSession) -> Result<(), DbError> {
        let encoded = encode(CURRENT_SESSION_KEY, session)?;
        self.db.write_all(&[
            (CURRENT_SESSION_KEY, Some(encoded.as_str())),
            (IS_WORKING_KEY, Some("true")),
        ])
    }

    async fn append(&mut self, entry: &WorkSession) -> Result<(), DbError> {
        // Stored values that no longer parse are kept as they are.
        let mut values = self.read_values()?;
        values.push(to_value(entry)?);
        self.write_entries(&values)?;
        tracing::debug!(id = %entry.id, total = values.len(), "appended entry");
        Ok(())
    }

    async fn update(&mut self, entry: &WorkSession) -> Result<(), DbError> {
        let mut values = self.read_values()?;
        let slot = values
            .iter_mut()
            .find(|stored| has_id(stored, entry))
            .ok_or_else(|| DbError::UnknownEntry(entry.id.to_string()))?;
        *slot = to_value(entry)?;

        // Updating must not touch the in-progress marker.
        let encoded = encode(TIME_ENTRIES_KEY, &values)?;
        self.db.set(TIME_ENTRIES_KEY, &encoded)?;
        tracing::debug!(id = %entry.id, "updated entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use wh_core::{EditForm, SessionId, Tracker};

    fn nine() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 22, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn empty_storage_loads_nothing() {
        let mut store = LocalStore::open_in_memory().unwrap();
        assert_eq!(store.load().await.unwrap(), Loaded::default());
    }

    #[tokio::test]
    async fn mark_active_writes_marker_keys() {
        let mut store = LocalStore::open_in_memory().unwrap();
        let session = WorkSession::start(nine());
        store.mark_active(&session).await.unwrap();

        let db = store.database();
        assert_eq!(db.get(IS_WORKING_KEY).unwrap().as_deref(), Some("true"));
        let raw = db.get(CURRENT_SESSION_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""clockIn":"2025-07-22T09:00:00Z""#));

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.active, Some(session));
    }

    #[tokio::test]
    async fn append_rewrites_list_and_clears_marker() {
        let mut store = LocalStore::open_in_memory().unwrap();
        let session = WorkSession::start(nine());
        store.mark_active(&session).await.unwrap();

        let entry = session.complete(nine() + Duration::seconds(30_600));
        store.append(&entry).await.unwrap();

        let db = store.database();
        assert_eq!(db.get(IS_WORKING_KEY).unwrap().as_deref(), Some("false"));
        assert_eq!(db.get(CURRENT_SESSION_KEY).unwrap(), None);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.entries, vec![entry]);
        assert_eq!(loaded.active, None);
    }

    #[tokio::test]
    async fn round_trip_preserves_times_and_duration() {
        let mut store = LocalStore::open_in_memory().unwrap();
        let first = WorkSession::start(nine()).complete(nine() + Duration::milliseconds(3_661_250));
        let second = WorkSession::start(nine() + Duration::hours(2))
            .complete(nine() + Duration::hours(3));
        store.append(&first).await.unwrap();
        store.append(&second).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.entries, vec![first.clone(), second]);
        assert_eq!(loaded.entries[0].clock_out, first.clock_out);
        assert_eq!(loaded.entries[0].duration, Some(3661));
    }

    #[tokio::test]
    async fn unreadable_entries_are_skipped() {
        let mut store = LocalStore::open_in_memory().unwrap();
        store
            .database()
            .set(
                TIME_ENTRIES_KEY,
                r#"[
                    {"id":"good","clockIn":"2025-07-22T09:00:00Z","clockOut":"2025-07-22T10:00:00Z","duration":3600},
                    {"id":"bad","clockIn":"yesterday-ish","duration":5},
                    {"id":"","clockIn":"2025-07-22T09:00:00Z"}
                ]"#,
            )
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].id.as_str(), "good");
    }

    #[tokio::test]
    async fn rewrites_keep_unreadable_entries_in_storage() {
        let mut store = LocalStore::open_in_memory().unwrap();
        store
            .database()
            .set(
                TIME_ENTRIES_KEY,
                r#"[
                    {"id":"good","clockIn":"2025-07-22T09:00:00Z","clockOut":"2025-07-22T10:00:00Z","duration":3600},
                    {"id":"legacy","clockIn":"22/07/2025 09:00","clockOut":"22/07/2025 10:00","duration":3600}
                ]"#,
            )
            .unwrap();

        let entry = WorkSession::start(nine() + Duration::days(1))
            .complete(nine() + Duration::days(1) + Duration::hours(1));
        store.append(&entry).await.unwrap();
        let good = store.load().await.unwrap().entries[0].clone();
        let edited = good.with_times(nine() - Duration::hours(1), nine());
        store.update(&edited).await.unwrap();

        let raw = store.database().get(TIME_ENTRIES_KEY).unwrap().unwrap();
        let stored: Vec<Value> = serde_json::from_str(&raw).unwrap();
        let ids: Vec<_> = stored.iter().map(|value| value["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["good", "legacy", entry.id.as_str()]);
        assert_eq!(stored[1]["clockIn"], "22/07/2025 09:00");
        assert_eq!(stored[0]["duration"], 3600);
        assert_eq!(stored[0]["clockIn"], "2025-07-22T08:00:00Z");

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.entries, vec![edited, entry]);
    }

    #[tokio::test]
    async fn marker_ignored_when_flag_is_false() {
        let mut store = LocalStore::open_in_memory().unwrap();
        let db = store.database();
        db.set(
            CURRENT_SESSION_KEY,
            r#"{"id":"session_1","clockIn":"2025-07-22T09:00:00Z"}"#,
        )
        .unwrap();
        db.set(IS_WORKING_KEY, "false").unwrap();

        assert_eq!(store.load().await.unwrap().active, None);
    }

    #[tokio::test]
    async fn corrupt_entry_list_is_an_error() {
        let mut store = LocalStore::open_in_memory().unwrap();
        store.database().set(TIME_ENTRIES_KEY, "not json").unwrap();
        assert!(matches!(
            store.load().await,
            Err(DbError::InvalidValue {
                key: TIME_ENTRIES_KEY,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn update_replaces_entry_and_keeps_marker() {
        let mut store = LocalStore::open_in_memory().unwrap();
        let entry = WorkSession::start(nine()).complete(nine() + Duration::hours(1));
        store.append(&entry).await.unwrap();
        let running = WorkSession::start(nine() + Duration::hours(5));
        store.mark_active(&running).await.unwrap();

        let edited = entry.with_times(nine() - Duration::hours(1), nine() + Duration::hours(1));
        store.update(&edited).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.entries, vec![edited]);
        assert_eq!(loaded.active, Some(running));
    }

    #[tokio::test]
    async fn update_unknown_entry_fails() {
        let mut store = LocalStore::open_in_memory().unwrap();
        let stray = WorkSession::start(nine()).complete(nine());
        assert!(matches!(
            store.update(&stray).await,
            Err(DbError::UnknownEntry(_))
        ));
    }

    #[tokio::test]
    async fn tracker_state_survives_reopen() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("wh.db");

        let mut tracker = Tracker::new(LocalStore::new(Database::open(&path).unwrap()));
        tracker.load(nine()).await.unwrap();
        tracker.clock_in(nine()).await.unwrap();
        drop(tracker);

        let mut tracker = Tracker::new(LocalStore::new(Database::open(&path).unwrap()));
        tracker.load(nine() + Duration::minutes(30)).await.unwrap();
        assert!(tracker.clock().is_working());
        let entry = tracker.clock_out(nine() + Duration::hours(1)).await.unwrap();

        let form = EditForm {
            clock_in: "2025-07-22T08:30".to_string(),
            clock_out: "2025-07-22T10:00".to_string(),
        };
        let id: SessionId = entry.id.clone();
        tracker.edit(&id, &form, nine(), &Utc).await.unwrap();
        drop(tracker);

        let mut tracker = Tracker::new(LocalStore::new(Database::open(&path).unwrap()));
        tracker.load(nine()).await.unwrap();
        assert!(!tracker.clock().is_working());
        assert_eq!(tracker.entries().len(), 1);
        assert_eq!(tracker.entries()[0].duration, Some(5400));
    }
}
