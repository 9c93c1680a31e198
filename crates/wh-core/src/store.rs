//! The persistence seam shared by every backing store.

use crate::session::WorkSession;

/// Everything a backing store knows at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loaded {
    /// Completed entries in insertion order.
    pub entries: Vec<WorkSession>,
    /// The in-progress session, if one was persisted.
    pub active: Option<WorkSession>,
}

/// A persistence strategy for work sessions.
///
/// Implementations:
/// - `wh_db::LocalStore`: key-value storage on the device
/// - `wh_sheet::SheetStore`: a spreadsheet-backed row API
#[allow(async_fn_in_trait)]
pub trait EntryStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Loads completed entries and any in-progress session.
    async fn load(&mut self) -> Result<Loaded, Self::Error>;

    /// Persists the in-progress session marker.
    async fn mark_active(&mut self, session: &WorkSession) -> Result<(), Self::Error>;

    /// Persists a completed entry and clears the in-progress marker.
    async fn append(&mut self, entry: &WorkSession) -> Result<(), Self::Error>;

    /// Rewrites an existing entry, matched by ID.
    async fn update(&mut self, entry: &WorkSession) -> Result<(), Self::Error>;
}
