//! Scoped data context: one connection per unit of work.
//!
//! # Responsibility
//! - Acquire a migrated connection for exactly one facade call.
//! - Hand out typed repositories and run raw commands on that connection.
//! - Release the connection deterministically when the context is dropped.

use crate::config::StoreConfig;
use crate::db::{open_db, DbResult};
use crate::model::record::Record;
use crate::repo::record_repo::{query_records, RepoError, RepoResult, SqliteRepository};
use log::debug;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::time::Instant;

/// How the text passed to [`DataContext::execute_query`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// A complete SQL statement.
    Text,
    /// A bare table name; every row of the table is selected.
    TableDirect,
    /// A stored procedure name. SQLite has none, so this is always rejected.
    StoredProcedure,
}

/// Short-lived store handle owning one SQLite connection.
pub struct DataContext {
    conn: Connection,
    opened_at: Instant,
}

impl DataContext {
    /// Opens the configured store and applies pending migrations.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        let conn = open_db(&config.db_path, config.busy_timeout())?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps an already-bootstrapped connection (for example one returned by
    /// `open_db_in_memory`).
    pub fn from_connection(conn: Connection) -> Self {
        debug!("event=context_open module=repo status=ok");
        Self {
            conn,
            opened_at: Instant::now(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Resolves the repository for record type `T`.
    pub fn repository<T: Record>(&self) -> SqliteRepository<'_, T> {
        SqliteRepository::new(&self.conn)
    }

    /// Runs a raw command directly on the connection and decodes each row
    /// as `T`. Rows must carry `T`'s identity and value columns by name.
    pub fn execute_query<T: Record>(
        &self,
        kind: CommandKind,
        text: &str,
        args: &[Value],
    ) -> RepoResult<Vec<T>> {
        match kind {
            CommandKind::Text => query_records(&self.conn, text, args),
            CommandKind::TableDirect => {
                let table = text.trim();
                if !is_plain_identifier(table) {
                    return Err(RepoError::InvalidCommand(format!(
                        "`{table}` is not a plain table name"
                    )));
                }
                query_records(&self.conn, &format!("SELECT * FROM {table};"), args)
            }
            CommandKind::StoredProcedure => Err(RepoError::InvalidCommand(format!(
                "stored procedure `{}` is not supported by SQLite",
                text.trim()
            ))),
        }
    }
}

impl Drop for DataContext {
    fn drop(&mut self) {
        debug!(
            "event=context_close module=repo status=ok duration_ms={}",
            self.opened_at.elapsed().as_millis()
        );
    }
}

fn is_plain_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
