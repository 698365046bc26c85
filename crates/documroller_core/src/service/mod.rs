//! Core use-case services.
//!
//! # Responsibility
//! - Expose the record access facade used by module hosts.
//! - Keep callers decoupled from connection handling and SQL.

pub mod record_service;
