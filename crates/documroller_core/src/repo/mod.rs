//! Repository layer: scoped data contexts and generic record repositories.
//!
//! # Responsibility
//! - Own the per-call connection scope (`DataContext`).
//! - Build every CRUD/paging statement from a record type's `Record`
//!   description, keeping SQL inside the persistence boundary.
//!
//! # Invariants
//! - One `DataContext` wraps exactly one connection and closes it on drop.
//! - Repository APIs return semantic errors (`NotFound`, `MissingId`) in
//!   addition to store transport errors.

pub mod context;
pub mod paging;
pub mod record_repo;
