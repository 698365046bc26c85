//! Module portability: bulk export/import of a module's content.
//!
//! # Responsibility
//! - Expose the two entry points a host calls when copying a module.
//! - Translate between stored `DocumRoller` items and the markup document.
//!
//! # Invariants
//! - Export always returns a well-formed document, even for empty modules.
//! - Import rejects a document that is not well-formed, or has no root,
//!   before the first insert.
//! - Items are inserted in document order, each as one new record
//!   (re-importing duplicates). An item without `content`, or a store
//!   failure, stops the import and leaves earlier items inserted.

pub mod markup;

use crate::model::documroller::DocumRoller;
use crate::model::record::ScopeId;
use crate::repo::record_repo::RepoError;
use crate::service::record_service::RecordService;
use log::{error, info};
use markup::MarkupError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type PortableResult<T> = Result<T, PortableError>;

/// Export/import failure.
#[derive(Debug)]
pub enum PortableError {
    /// Import document could not be parsed.
    Markup(MarkupError),
    Repo(RepoError),
}

impl Display for PortableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markup(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PortableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Markup(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<MarkupError> for PortableError {
    fn from(value: MarkupError) -> Self {
        Self::Markup(value)
    }
}

impl From<RepoError> for PortableError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Host-facing module portability contract.
pub trait Portable {
    /// Serializes every item of `module_id` into a markup document.
    fn export_module(&self, module_id: ScopeId) -> PortableResult<String>;

    /// Creates one item in `module_id` per item element of `content`.
    ///
    /// `version` and `user_id` are accepted for host compatibility and are
    /// not applied to the created items.
    fn import_module(
        &self,
        module_id: ScopeId,
        content: &str,
        version: &str,
        user_id: i64,
    ) -> PortableResult<()>;
}

impl Portable for RecordService {
    fn export_module(&self, module_id: ScopeId) -> PortableResult<String> {
        let started_at = Instant::now();
        let items = self
            .objects_in_scope::<DocumRoller>(module_id)
            .inspect_err(|err| {
                error!(
                    "event=record_export module=portable status=error module_id={} error={}",
                    module_id, err
                );
            })?;

        let document = markup::write_items(items.iter().map(|item| item.content.as_str()));
        info!(
            "event=record_export module=portable status=ok module_id={} items={} bytes={} duration_ms={}",
            module_id,
            items.len(),
            document.len(),
            started_at.elapsed().as_millis()
        );
        Ok(document)
    }

    fn import_module(
        &self,
        module_id: ScopeId,
        content: &str,
        version: &str,
        user_id: i64,
    ) -> PortableResult<()> {
        let started_at = Instant::now();
        let contents = markup::read_document(content).inspect_err(|err| {
            error!(
                "event=record_import module=portable status=error module_id={} error_code=markup_invalid error={}",
                module_id, err
            );
        })?;

        let total = contents.len();
        for (imported, text) in contents.into_iter().enumerate() {
            let Some(text) = text else {
                let err = MarkupError::MissingContent { item: imported };
                error!(
                    "event=record_import module=portable status=error module_id={} imported={} total={} error_code=markup_invalid error={}",
                    module_id, imported, total, err
                );
                return Err(err.into());
            };
            let item = DocumRoller::new(module_id, text);
            if let Err(err) = self.add(&item) {
                error!(
                    "event=record_import module=portable status=error module_id={} imported={} total={} error_code=insert_failed error={}",
                    module_id, imported, total, err
                );
                return Err(err.into());
            }
        }

        info!(
            "event=record_import module=portable status=ok module_id={} items={} version={} user_id={} duration_ms={}",
            module_id,
            total,
            version,
            user_id,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
