//! DocumRoller content record.
//!
//! # Invariants
//! - `documroller_id` is `None` until the store assigns one on insert.
//! - `created_on_date` is stored as unix epoch milliseconds.
//! - `created_by_user` is audit metadata only; nothing in core reads it.

use super::record::{Record, RecordId, ScopeId, ScopedRecord};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One rolling content item shown by a module instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumRoller {
    /// Store-assigned identity.
    pub documroller_id: Option<RecordId>,
    /// Owning module instance.
    pub module_id: ScopeId,
    /// Raw content text. May contain markup-significant characters.
    pub content: String,
    pub created_by_user: Option<i64>,
    /// Unix epoch milliseconds.
    pub created_on_date: i64,
}

impl DocumRoller {
    /// Creates a not-yet-persisted item owned by `module_id`, stamped with
    /// the current time.
    pub fn new(module_id: ScopeId, content: impl Into<String>) -> Self {
        Self {
            documroller_id: None,
            module_id,
            content: content.into(),
            created_by_user: None,
            created_on_date: now_epoch_ms(),
        }
    }

    /// Returns a copy carrying the given store identity.
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.documroller_id = Some(id);
        self
    }
}

impl Record for DocumRoller {
    const TABLE: &'static str = "documrollers";
    const ID_COLUMN: &'static str = "documroller_id";
    const COLUMNS: &'static [&'static str] = &[
        "module_id",
        "content",
        "created_by_user",
        "created_on_date",
    ];

    fn id(&self) -> Option<RecordId> {
        self.documroller_id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.module_id),
            Value::Text(self.content.clone()),
            self.created_by_user.map_or(Value::Null, Value::Integer),
            Value::Integer(self.created_on_date),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            documroller_id: Some(row.get("documroller_id")?),
            module_id: row.get("module_id")?,
            content: row.get("content")?,
            created_by_user: row.get("created_by_user")?,
            created_on_date: row.get("created_on_date")?,
        })
    }
}

impl ScopedRecord for DocumRoller {
    const SCOPE_COLUMN: &'static str = "module_id";

    fn scope_id(&self) -> ScopeId {
        self.module_id
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
