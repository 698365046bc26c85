//! Store configuration.
//!
//! # Responsibility
//! - Describe where the record store lives and how connections are tuned.
//! - Load that description from JSON so hosts can ship it as a file.

use crate::db::DEFAULT_BUSY_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loading failure.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid store config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Location and connection tuning for the record store.
///
/// ```json
/// { "db_path": "/var/lib/portal/documroller.sqlite3", "busy_timeout_ms": 2000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file. Created on first open.
    pub db_path: PathBuf,
    /// How long a connection waits on a locked database. Defaults to 5s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_timeout_ms: Option<u64>,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout_ms: None,
        }
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Effective busy timeout.
    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout_ms
            .map_or(DEFAULT_BUSY_TIMEOUT, Duration::from_millis)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn busy_timeout_defaults_to_five_seconds() {
        let config = StoreConfig::new("/tmp/store.sqlite3");
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn from_json_reads_optional_timeout() {
        let config = StoreConfig::from_json_str(
            r#"{ "db_path": "/data/documroller.sqlite3", "busy_timeout_ms": 250 }"#,
        )
        .expect("config with timeout should parse");
        assert_eq!(config.db_path, PathBuf::from("/data/documroller.sqlite3"));
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));

        let without_timeout =
            StoreConfig::from_json_str(r#"{ "db_path": "/data/documroller.sqlite3" }"#)
                .expect("config without timeout should parse");
        assert_eq!(without_timeout.busy_timeout_ms, None);
    }

    #[test]
    fn from_json_rejects_missing_path() {
        let err = StoreConfig::from_json_str(r#"{ "busy_timeout_ms": 10 }"#)
            .expect_err("db_path is required");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file_with_path() {
        let err = StoreConfig::load("/definitely/not/here/store.json")
            .expect_err("missing file must fail");
        match err {
            ConfigError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here/store.json"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn with_busy_timeout_roundtrips_through_json() {
        let config =
            StoreConfig::new("/tmp/store.sqlite3").with_busy_timeout(Duration::from_millis(1500));
        let json = serde_json::to_string(&config).expect("config should serialize");
        assert_eq!(
            StoreConfig::from_json_str(&json).expect("serialized config should parse"),
            config
        );
    }
}
