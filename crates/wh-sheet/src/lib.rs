//! Spreadsheet row API integration for the work hours clock.
//!
//! Sessions are kept as rows of a spreadsheet exposed over a tabular REST
//! API:
//! - `GET <endpoint>` returns every row
//! - `POST <endpoint>` with `{"data": [row]}` creates a row
//! - `PUT <endpoint>/ID/<id>` with `{"data": [row]}` rewrites the row by ID

mod row;
mod store;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::Serialize;
use thiserror::Error;

pub use row::{SheetRow, parse_sheet_datetime};
pub use store::SheetStore;

/// Default request timeout for API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sheet client errors.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The endpoint is not a usable HTTP(S) URL.
    #[error("invalid sheet endpoint: {reason}")]
    InvalidEndpoint { reason: String },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned a non-success status.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// Failed to read or write the in-progress marker file.
    #[error("failed to access marker {}: {source}", path.display())]
    Marker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The in-progress marker file holds invalid JSON.
    #[error("invalid marker {}: {source}", path.display())]
    MarkerFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Row API client.
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct SheetClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl fmt::Debug for SheetClient {
    // The endpoint path carries the sheet token.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetClient")
            .field("host", &self.endpoint.host_str())
            .field("endpoint", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct RowsPayload<'a> {
    data: &'a [SheetRow],
}

impl SheetClient {
    /// Creates a client for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute `http`/`https`
    /// URL, or if the HTTP client fails to build.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SheetError> {
        let endpoint = Url::parse(endpoint.trim()).map_err(|err| SheetError::InvalidEndpoint {
            reason: err.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SheetError::InvalidEndpoint {
                reason: format!("unsupported scheme {}", endpoint.scheme()),
            });
        }
        if endpoint.cannot_be_a_base() {
            return Err(SheetError::InvalidEndpoint {
                reason: "endpoint cannot carry a path".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SheetError::ClientBuild)?;

        Ok(Self { http, endpoint })
    }

    /// Fetches every row of the sheet.
    pub async fn fetch_rows(&self) -> Result<Vec<SheetRow>, SheetError> {
        let response = self.http.get(self.endpoint.clone()).send().await?;
        let body = checked_body(response).await?;
        serde_json::from_str(&body).map_err(|err| SheetError::InvalidResponse(err.to_string()))
    }

    /// Appends a row.
    pub async fn create_row(&self, row: &SheetRow) -> Result<(), SheetError> {
        let payload = RowsPayload {
            data: std::slice::from_ref(row),
        };
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;
        checked_body(response).await?;
        Ok(())
    }

    /// Rewrites the row whose `ID` column equals `id`.
    pub async fn update_row(&self, id: &str, row: &SheetRow) -> Result<(), SheetError> {
        let payload = RowsPayload {
            data: std::slice::from_ref(row),
        };
        let response = self
            .http
            .put(self.row_url(id)?)
            .json(&payload)
            .send()
            .await?;
        checked_body(response).await?;
        Ok(())
    }

    /// `<endpoint>/ID/<id>`, with `id` percent-encoded as a path segment.
    fn row_url(&self, id: &str) -> Result<Url, SheetError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| SheetError::InvalidEndpoint {
                reason: "endpoint cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .push("ID")
            .push(id);
        Ok(url)
    }
}

async fn checked_body(response: reqwest::Response) -> Result<String, SheetError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(SheetError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
