//! Record access facade.
//!
//! # Responsibility
//! - Provide one uniform, type-parameterized entry point per record
//!   operation for module hosts.
//! - Delegate every operation to a repository resolved from a fresh
//!   `DataContext`.
//!
//! # Invariants
//! - Each call opens its own context and drops it before returning.
//! - Nothing is cached between calls.
//! - Store errors are returned unchanged; there is no retry.

use crate::config::StoreConfig;
use crate::model::record::{Record, RecordId, ScopeId, ScopedRecord};
use crate::repo::context::{CommandKind, DataContext};
use crate::repo::paging::PagedList;
use crate::repo::record_repo::{RepoError, RepoResult, Repository, ScopedRepository};
use rusqlite::types::Value;

/// Generic CRUD facade over the configured record store.
#[derive(Debug, Clone)]
pub struct RecordService {
    config: StoreConfig,
}

impl RecordService {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn context(&self) -> RepoResult<DataContext> {
        Ok(DataContext::open(&self.config)?)
    }

    /// Inserts `record` and returns its new identity.
    pub fn add<T: Record>(&self, record: &T) -> RepoResult<RecordId> {
        let ctx = self.context()?;
        ctx.repository::<T>().insert(record)
    }

    /// Gets one record by identity. Absence is `Ok(None)`.
    pub fn get<T: Record>(&self, id: RecordId) -> RepoResult<Option<T>> {
        let ctx = self.context()?;
        ctx.repository::<T>().get_by_id(id)
    }

    /// Gets one record by identity, only if it belongs to `scope_id`.
    pub fn get_in_scope<T: ScopedRecord>(
        &self,
        id: RecordId,
        scope_id: ScopeId,
    ) -> RepoResult<Option<T>> {
        let ctx = self.context()?;
        ctx.repository::<T>().get_by_id_in_scope(id, scope_id)
    }

    /// Replaces the stored row identified by `record`.
    ///
    /// Returns `NotFound` when no such row exists.
    pub fn update<T: Record>(&self, record: &T) -> RepoResult<()> {
        let ctx = self.context()?;
        ctx.repository::<T>().update(record)
    }

    /// Lists all records of `scope_id`, ordered by identity.
    pub fn objects_in_scope<T: ScopedRecord>(&self, scope_id: ScopeId) -> RepoResult<Vec<T>> {
        let ctx = self.context()?;
        ctx.repository::<T>().get_in_scope(scope_id)
    }

    /// Lists every record of type `T`, ordered by identity.
    pub fn objects<T: Record>(&self) -> RepoResult<Vec<T>> {
        let ctx = self.context()?;
        ctx.repository::<T>().get()
    }

    /// Lists records matching a raw SQLite condition such as
    /// `WHERE content LIKE ?1`. Arguments bind positionally.
    pub fn find<T: Record>(&self, condition: &str, args: &[Value]) -> RepoResult<Vec<T>> {
        let ctx = self.context()?;
        ctx.repository::<T>().find(condition, args)
    }

    /// Runs a raw command on the store, bypassing the typed repository.
    pub fn execute_query<T: Record>(
        &self,
        kind: CommandKind,
        text: &str,
        args: &[Value],
    ) -> RepoResult<Vec<T>> {
        let ctx = self.context()?;
        ctx.execute_query(kind, text, args)
    }

    /// Gets one page of the records in `scope_id`.
    pub fn page_in_scope<T: ScopedRecord>(
        &self,
        scope_id: ScopeId,
        page_index: u32,
        page_size: u32,
    ) -> RepoResult<PagedList<T>> {
        let ctx = self.context()?;
        ctx.repository::<T>()
            .get_page_in_scope(scope_id, page_index, page_size)
    }

    /// Gets one page across all records of type `T`.
    pub fn page<T: Record>(&self, page_index: u32, page_size: u32) -> RepoResult<PagedList<T>> {
        let ctx = self.context()?;
        ctx.repository::<T>().get_page(page_index, page_size)
    }

    /// Deletes the stored row identified by `record`.
    pub fn delete<T: Record>(&self, record: &T) -> RepoResult<()> {
        let ctx = self.context()?;
        ctx.repository::<T>().delete(record)
    }

    /// Fetches then deletes the record with `id` within one context.
    ///
    /// Returns `NotFound(id)` when nothing is stored under `id`.
    pub fn delete_by_id<T: Record>(&self, id: RecordId) -> RepoResult<()> {
        let ctx = self.context()?;
        let repo = ctx.repository::<T>();
        let record = repo.get_by_id(id)?.ok_or(RepoError::NotFound(id))?;
        repo.delete(&record)
    }
}
