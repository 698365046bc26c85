//! Capability traits that let the repository layer work on any record type.
//!
//! A record type describes its own table layout once; the generic
//! repository builds every statement from that description.

use rusqlite::types::Value;
use rusqlite::Row;

/// Store-assigned integer identity of a record.
pub type RecordId = i64;

/// Grouping key partitioning records (for example, a module id).
pub type ScopeId = i64;

/// A persisted entity with an integer identity.
pub trait Record: Sized {
    /// Backing table.
    const TABLE: &'static str;
    /// Integer primary key column.
    const ID_COLUMN: &'static str;
    /// Value columns written by insert/update, in [`Record::to_values`] order.
    const COLUMNS: &'static [&'static str];

    /// Returns the identity, or `None` before the record was inserted.
    fn id(&self) -> Option<RecordId>;

    /// Encodes value columns positionally, matching [`Record::COLUMNS`].
    fn to_values(&self) -> Vec<Value>;

    /// Decodes one row selected with the identity column plus all value columns.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// A record that belongs to exactly one scope.
pub trait ScopedRecord: Record {
    /// Column holding the scope identifier.
    const SCOPE_COLUMN: &'static str;

    fn scope_id(&self) -> ScopeId;
}

/// Returns the canonical projection for `T`: identity column first.
pub fn select_sql<T: Record>() -> String {
    format!(
        "SELECT {}, {} FROM {}",
        T::ID_COLUMN,
        T::COLUMNS.join(", "),
        T::TABLE
    )
}
