//! Core record store for the DocumRoller content module.
//! Generic record access over SQLite plus module export/import.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod portable;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::documroller::DocumRoller;
pub use model::record::{Record, RecordId, ScopeId, ScopedRecord};
pub use portable::markup::MarkupError;
pub use portable::{Portable, PortableError, PortableResult};
pub use repo::context::{CommandKind, DataContext};
pub use repo::paging::PagedList;
pub use repo::record_repo::{
    RepoError, RepoResult, Repository, ScopedRepository, SqliteRepository,
};
pub use service::record_service::RecordService;

/// Minimal health-check API for host integration checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
