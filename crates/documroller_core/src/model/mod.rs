//! Record model for content persisted by the module.
//!
//! # Responsibility
//! - Define the capability traits every persisted record type implements.
//! - Define the concrete `DocumRoller` content record.
//!
//! # Invariants
//! - Every record is identified by an integer `RecordId` assigned by the store.
//! - Scoped records carry exactly one `ScopeId` (the owning module).

pub mod documroller;
pub mod record;
