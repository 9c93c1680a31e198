//! The tracker: session clock plus entry sequence over a backing store.

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::clock::{ClockError, SessionClock};
use crate::edit::{EditError, EditForm};
use crate::session::WorkSession;
use crate::stats::{self, Totals};
use crate::store::{EntryStore, Loaded};
use crate::types::SessionId;

/// Tracker errors, generic over the backing store's error type.
#[derive(Debug, Error)]
pub enum TrackerError<E> {
    #[error(transparent)]
    Clock(#[from] ClockError),
    #[error(transparent)]
    Edit(#[from] EditError),
    /// No entry has the requested ID.
    #[error("no entry with id {0}")]
    UnknownEntry(SessionId),
    #[error("failed to load entries: {0}")]
    Load(#[source] E),
    #[error("failed to start session: {0}")]
    MarkActive(#[source] E),
    /// The entry was recorded in memory but the store rejected it.
    #[error("failed to save entry {id}: {source}")]
    Save {
        id: SessionId,
        #[source]
        source: E,
    },
    #[error("failed to update entry {id}: {source}")]
    Update {
        id: SessionId,
        #[source]
        source: E,
    },
}

/// Work hours tracker over a backing store `S`.
#[derive(Debug)]
pub struct Tracker<S> {
    store: S,
    clock: SessionClock,
    entries: Vec<WorkSession>,
}

impl<S: EntryStore> Tracker<S> {
    /// Creates an idle tracker with no entries. Call [`Self::load`] to read
    /// the store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SessionClock::new(),
            entries: Vec::new(),
        }
    }

    /// Replaces the in-memory state with the store's contents.
    ///
    /// On failure the current state is left untouched.
    pub async fn load(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError<S::Error>> {
        let Loaded { entries, active } = self.store.load().await.map_err(TrackerError::Load)?;
        tracing::debug!(
            entries = entries.len(),
            working = active.is_some(),
            "loaded entries"
        );
        self.entries = entries;
        self.clock = match active {
            Some(active) => SessionClock::resume(active, now),
            None => SessionClock::new(),
        };
        Ok(())
    }

    /// Starts a session at `now`.
    ///
    /// The in-progress marker is persisted before the clock starts, so a
    /// store failure leaves the tracker idle.
    pub async fn clock_in(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<&WorkSession, TrackerError<S::Error>> {
        self.clock.check_idle()?;
        let session = WorkSession::start(now);
        self.store
            .mark_active(&session)
            .await
            .map_err(TrackerError::MarkActive)?;
        tracing::debug!(id = %session.id, "clocked in");
        self.clock.begin(session);
        self.clock
            .active()
            .ok_or(TrackerError::Clock(ClockError::NotWorking))
    }

    /// Ends the running session at `now` and persists it.
    ///
    /// The completed entry joins the in-memory sequence before the store is
    /// called; a [`TrackerError::Save`] means only persistence failed.
    pub async fn clock_out(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<WorkSession, TrackerError<S::Error>> {
        let entry = self.clock.clock_out(now)?;
        self.entries.push(entry.clone());
        tracing::debug!(id = %entry.id, duration = ?entry.duration, "clocked out");

        if let Err(source) = self.store.append(&entry).await {
            tracing::warn!(id = %entry.id, error = %source, "entry not saved");
            return Err(TrackerError::Save {
                id: entry.id,
                source,
            });
        }
        Ok(entry)
    }

    /// Rewrites an entry from an edit form and reloads from the store.
    ///
    /// Invalid input is rejected before the store is called. If the update
    /// fails the in-memory entries are unchanged.
    pub async fn edit<Tz: TimeZone>(
        &mut self,
        id: &SessionId,
        form: &EditForm,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<WorkSession, TrackerError<S::Error>> {
        let current = self
            .find(id)
            .ok_or_else(|| TrackerError::UnknownEntry(id.clone()))?;
        let updated = form.apply(current, tz)?;

        self.store
            .update(&updated)
            .await
            .map_err(|source| TrackerError::Update {
                id: id.clone(),
                source,
            })?;

        if let Err(err) = self.load(now).await {
            tracing::warn!(error = %err, "reload after update failed, applying edit locally");
            if let Some(slot) = self.entries.iter_mut().find(|entry| entry.id == *id) {
                *slot = updated.clone();
            }
        }
        Ok(updated)
    }

    /// Today, week and all-time totals, including live time while working.
    pub fn totals<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> Totals {
        Totals::compute(&self.entries, self.clock.live_elapsed(), now, tz)
    }

    /// The last `limit` entries, most recent first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &WorkSession> {
        stats::recent(&self.entries, limit)
    }

    pub fn find(&self, id: &SessionId) -> Option<&WorkSession> {
        self.entries.iter().find(|entry| entry.id == *id)
    }

    pub fn entries(&self) -> &[WorkSession] {
        &self.entries
    }

    pub const fn clock(&self) -> &SessionClock {
        &self.clock
    }
}
