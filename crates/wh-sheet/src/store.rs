//! The remote backing store.

use std::fmt::Display;
use std::fs;
use std::path::PathBuf;

use chrono::TimeZone;
use wh_core::{EntryStore, Loaded, WorkSession};

use crate::{SheetClient, SheetError, SheetRow};

/// Backing store on a spreadsheet row API.
///
/// Rows are written and read as wall-clock text in `tz`. The in-progress
/// session never reaches the sheet: it is kept in an optional local marker
/// file, or only in memory when no marker path is set.
#[derive(Debug)]
pub struct SheetStore<Tz: TimeZone> {
    client: SheetClient,
    tz: Tz,
    marker: Option<PathBuf>,
}

impl<Tz> SheetStore<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub const fn new(client: SheetClient, tz: Tz) -> Self {
        Self {
            client,
            tz,
            marker: None,
        }
    }

    /// Keeps the in-progress session in a file at `path` between runs.
    #[must_use]
    pub fn with_marker(mut self, path: impl Into<PathBuf>) -> Self {
        self.marker = Some(path.into());
        self
    }

    fn read_marker(&self) -> Result<Option<WorkSession>, SheetError> {
        let Some(path) = &self.marker else {
            return Ok(None);
        };
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(|source| SheetError::MarkerFormat {
                    path: path.clone(),
                    source,
                }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SheetError::Marker {
                path: path.clone(),
                source,
            }),
        }
    }

    fn write_marker(&self, session: &WorkSession) -> Result<(), SheetError> {
        let Some(path) = &self.marker else {
            return Ok(());
        };
        let marker_err = |source: std::io::Error| SheetError::Marker {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(marker_err)?;
        }
        let json = serde_json::to_string_pretty(session).map_err(|source| {
            SheetError::MarkerFormat {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(path, json).map_err(marker_err)
    }

    fn clear_marker(&self) -> Result<(), SheetError> {
        let Some(path) = &self.marker else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SheetError::Marker {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl<Tz> EntryStore for SheetStore<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    type Error = SheetError;

    async fn load(&mut self) -> Result<Loaded, SheetError> {
        let active = self.read_marker()?;
        let rows = self.client.fetch_rows().await?;
        let total = rows.len();
        let entries: Vec<_> = rows
            .iter()
            .filter_map(|row| row.to_session(&self.tz))
            .collect();
        if entries.len() < total {
            tracing::debug!(dropped = total - entries.len(), "skipped unparseable rows");
        }
        Ok(Loaded { entries, active })
    }

    async fn mark_active(&mut self, session: &WorkSession) -> Result<(), SheetError> {
        self.write_marker(session)
    }

    async fn append(&mut self, entry: &WorkSession) -> Result<(), SheetError> {
        // The session is over whether or not the sheet accepts the row.
        self.clear_marker()?;
        let row = SheetRow::from_session(entry, &self.tz);
        self.client.create_row(&row).await?;
        tracing::debug!(id = %entry.id, "row created");
        Ok(())
    }

    async fn update(&mut self, entry: &WorkSession) -> Result<(), SheetError> {
        let row = SheetRow::from_session(entry, &self.tz);
        self.client.update_row(entry.id.as_str(), &row).await?;
        tracing::debug!(id = %entry.id, "row updated");
        Ok(())
    }
}
