//! Generic record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, listing, paging and condition queries for any `Record`.
//! - Derive every statement from the record's table description.
//!
//! # Invariants
//! - Listings and pages are ordered by identity ascending, so concatenating
//!   consecutive pages reproduces the full listing.
//! - Update/delete of a missing identity is `NotFound`, never a silent no-op.

use crate::db::DbError;
use crate::model::record::{select_sql, Record, RecordId, ScopeId, ScopedRecord};
use crate::repo::paging::PagedList;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// No row with this identity exists.
    NotFound(RecordId),
    /// Update/delete was called on a record that was never persisted.
    MissingId(&'static str),
    /// A raw command could not be turned into a statement.
    InvalidCommand(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::MissingId(table) => write!(f, "record in `{table}` has no identity"),
            Self::InvalidCommand(message) => write!(f, "invalid command: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::MissingId(_) | Self::InvalidCommand(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for one record type.
pub trait Repository<T: Record> {
    /// Inserts value columns and returns the store-assigned identity.
    /// Any identity already on `record` is ignored.
    fn insert(&self, record: &T) -> RepoResult<RecordId>;
    fn get_by_id(&self, id: RecordId) -> RepoResult<Option<T>>;
    /// Replaces every value column of the row identified by `record.id()`.
    fn update(&self, record: &T) -> RepoResult<()>;
    fn delete(&self, record: &T) -> RepoResult<()>;
    fn get(&self) -> RepoResult<Vec<T>>;
    fn get_page(&self, page_index: u32, page_size: u32) -> RepoResult<PagedList<T>>;
    /// Runs `SELECT <columns> FROM <table> <condition>`.
    ///
    /// `condition` is raw SQLite syntax (for example `WHERE content LIKE ?1`);
    /// `args` are bound positionally by SQLite and never escaped here.
    fn find(&self, condition: &str, args: &[Value]) -> RepoResult<Vec<T>>;
}

/// Scope-filtered queries for records that belong to a scope.
pub trait ScopedRepository<T: ScopedRecord>: Repository<T> {
    fn get_by_id_in_scope(&self, id: RecordId, scope_id: ScopeId) -> RepoResult<Option<T>>;
    fn get_in_scope(&self, scope_id: ScopeId) -> RepoResult<Vec<T>>;
    fn get_page_in_scope(
        &self,
        scope_id: ScopeId,
        page_index: u32,
        page_size: u32,
    ) -> RepoResult<PagedList<T>>;
}

/// SQLite-backed repository for record type `T`.
pub struct SqliteRepository<'conn, T> {
    conn: &'conn Connection,
    _record: PhantomData<fn() -> T>,
}

impl<'conn, T: Record> SqliteRepository<'conn, T> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _record: PhantomData,
        }
    }

    fn count(&self, condition: &str, args: &[Value]) -> RepoResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {} {condition}", T::TABLE);
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(args.iter()), |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn page_where(
        &self,
        condition: &str,
        args: &[Value],
        page_index: u32,
        page_size: u32,
    ) -> RepoResult<PagedList<T>> {
        let total_count = self.count(condition, args)?;

        let next = args.len();
        let sql = format!(
            "{} {condition} ORDER BY {} ASC LIMIT ?{} OFFSET ?{}",
            select_sql::<T>(),
            T::ID_COLUMN,
            next + 1,
            next + 2
        );
        let mut bind_values = args.to_vec();
        bind_values.push(Value::Integer(i64::from(page_size)));
        // u32 * u32 can exceed i64; past-the-end offsets just yield no rows.
        bind_values.push(Value::Integer(
            i64::from(page_index).saturating_mul(i64::from(page_size)),
        ));

        Ok(PagedList {
            items: query_records(self.conn, &sql, &bind_values)?,
            page_index,
            page_size,
            total_count,
        })
    }
}

impl<T: Record> Repository<T> for SqliteRepository<'_, T> {
    fn insert(&self, record: &T) -> RepoResult<RecordId> {
        let placeholders = (1..=T::COLUMNS.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            T::TABLE,
            T::COLUMNS.join(", ")
        );

        self.conn
            .execute(&sql, params_from_iter(record.to_values()))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_by_id(&self, id: RecordId) -> RepoResult<Option<T>> {
        let sql = format!("{} WHERE {} = ?1;", select_sql::<T>(), T::ID_COLUMN);
        let record = self
            .conn
            .query_row(&sql, params![id], |row| T::from_row(row))
            .optional()?;
        Ok(record)
    }

    fn update(&self, record: &T) -> RepoResult<()> {
        let id = record.id().ok_or(RepoError::MissingId(T::TABLE))?;
        let assignments = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE {} = ?{};",
            T::TABLE,
            T::ID_COLUMN,
            T::COLUMNS.len() + 1
        );

        let mut bind_values = record.to_values();
        bind_values.push(Value::Integer(id));
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, record: &T) -> RepoResult<()> {
        let id = record.id().ok_or(RepoError::MissingId(T::TABLE))?;
        let sql = format!("DELETE FROM {} WHERE {} = ?1;", T::TABLE, T::ID_COLUMN);
        let changed = self.conn.execute(&sql, params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn get(&self) -> RepoResult<Vec<T>> {
        let sql = format!("{} ORDER BY {} ASC;", select_sql::<T>(), T::ID_COLUMN);
        query_records(self.conn, &sql, &[])
    }

    fn get_page(&self, page_index: u32, page_size: u32) -> RepoResult<PagedList<T>> {
        self.page_where("", &[], page_index, page_size)
    }

    fn find(&self, condition: &str, args: &[Value]) -> RepoResult<Vec<T>> {
        let sql = format!("{} {condition}", select_sql::<T>());
        query_records(self.conn, &sql, args)
    }
}

impl<T: ScopedRecord> ScopedRepository<T> for SqliteRepository<'_, T> {
    fn get_by_id_in_scope(&self, id: RecordId, scope_id: ScopeId) -> RepoResult<Option<T>> {
        let sql = format!(
            "{} WHERE {} = ?1 AND {} = ?2;",
            select_sql::<T>(),
            T::ID_COLUMN,
            T::SCOPE_COLUMN
        );
        let record = self
            .conn
            .query_row(&sql, params![id, scope_id], |row| T::from_row(row))
            .optional()?;
        Ok(record)
    }

    fn get_in_scope(&self, scope_id: ScopeId) -> RepoResult<Vec<T>> {
        let sql = format!(
            "{} WHERE {} = ?1 ORDER BY {} ASC;",
            select_sql::<T>(),
            T::SCOPE_COLUMN,
            T::ID_COLUMN
        );
        query_records(self.conn, &sql, &[Value::Integer(scope_id)])
    }

    fn get_page_in_scope(
        &self,
        scope_id: ScopeId,
        page_index: u32,
        page_size: u32,
    ) -> RepoResult<PagedList<T>> {
        let condition = format!("WHERE {} = ?1", T::SCOPE_COLUMN);
        self.page_where(
            &condition,
            &[Value::Integer(scope_id)],
            page_index,
            page_size,
        )
    }
}

/// Prepares `sql`, binds `args` positionally and decodes every row as `T`.
pub(crate) fn query_records<T: Record>(
    conn: &Connection,
    sql: &str,
    args: &[Value],
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let records = stmt
        .query_map(params_from_iter(args.iter()), |row| T::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}
