//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Where entries are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Key-value database on this machine.
    #[default]
    Local,
    /// Spreadsheet row API.
    Sheet,
}

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backing store for entries.
    pub backend: Backend,
    /// Path to the local database file.
    pub database_path: PathBuf,
    /// Row API endpoint for the sheet backend.
    pub sheet_url: Option<String>,
    /// File holding the in-progress session for the sheet backend.
    pub active_path: PathBuf,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("backend", &self.backend)
            .field("database_path", &self.database_path)
            .field("sheet_url", &self.sheet_url.as_ref().map(|_| "[REDACTED]"))
            .field("active_path", &self.active_path)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let state_dir = dirs_state_path().unwrap_or_else(|| data_dir.clone());
        Self {
            backend: Backend::Local,
            database_path: data_dir.join("wh.db"),
            sheet_url: None,
            active_path: state_dir.join("active.json"),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WH_*)
        figment = figment.merge(Env::prefixed("WH_"));

        figment.extract()
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Returns the platform-specific config directory for wh.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wh"))
}

/// Returns the platform-specific data directory for wh.
///
/// On Linux: `~/.local/share/wh`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("wh"))
}

/// Returns the platform-specific state directory for wh.
///
/// On Linux: `~/.local/state/wh`. Not every platform has one.
pub fn dirs_state_path() -> Option<PathBuf> {
    dirs::state_dir().map(|p| p.join("wh"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_dirs_data_path_ends_with_wh() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "wh");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("wh.db"));
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.sheet_url, None);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
backend = "sheet"
sheet_url = "https://sheets.example.com/api/v1/abc"
active_path = "/tmp/wh-active.json"
timeout_secs = 5
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.backend, Backend::Sheet);
        assert_eq!(
            config.sheet_url.as_deref(),
            Some("https://sheets.example.com/api/v1/abc")
        );
        assert_eq!(config.active_path, PathBuf::from("/tmp/wh-active.json"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"backend = "cloud""#).unwrap();
        assert!(Config::load_from(Some(file.path())).is_err());
    }

    #[test]
    fn test_debug_redacts_sheet_url() {
        let config = Config {
            sheet_url: Some("https://sheets.example.com/api/v1/secret-token".to_string()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }
}
