//! Listing reconciliation engine.
//!
//! # Overview
//!
//! One run opens an edit session, reads the base locale, and reconciles every
//! listing locale against the local sources:
//!
//! ```text
//! open edit -> details (base locale) -> listings -> per locale:
//!     text   : words(base) -> words(locale) -> translate -> compare -> put
//!     images : per category discover -> hash -> plan -> delete -> upload
//! -> commit once, only if anything changed
//! ```
//!
//! Locales run concurrently; within a locale text and image categories run
//! concurrently. The only shared mutable state is the commit coordinator's
//! dirty flag. The commit happens after every worker has finished.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::store::StoreError;
use crate::words::{Substitutions, WordsError, WordsStore};

pub mod engine;
pub mod images;
pub mod report;
pub mod session;
pub mod text;

pub use engine::run;
pub use report::{CommitStatus, LocaleReport, LocaleStatus, SyncReport, WorkOutcome};
pub use session::{CommitCoordinator, CommitOutcome, EditSession};

/// Failure of the reconciliation engine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No local words resolve for the locale.
    #[error("no local words for locale '{0}'")]
    Resolution(String),
    /// Remote store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Local words store failure.
    #[error(transparent)]
    Words(#[from] WordsError),
    /// Local file failure.
    #[error("reading {path}: {source}")]
    Io {
        /// File or directory that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Attempt to translate the base locale into itself.
    #[error("refusing to translate base locale '{0}' into itself")]
    SelfTranslation(String),
    /// The store reported no default language.
    #[error("package has no default language")]
    NoBaseLocale,
    /// The package has no listing to process.
    #[error("no listings")]
    NoListings,
    /// Requested locales have no listing.
    #[error("unknown listing locale(s): {}", .0.join(", "))]
    UnknownLocales(Vec<String>),
    /// A blocking file task panicked or was aborted.
    #[error("background task failed: {0}")]
    Task(String),
    /// The run was interrupted.
    #[error("cancelled")]
    Cancelled,
    /// The final commit failed.
    #[error("commit failed: {0}")]
    Commit(StoreError),
}

impl SyncError {
    /// Whether the error comes from user input rather than the run itself.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::UnknownLocales(_))
    }
}

/// Stop with `SyncError::Cancelled` once `cancel` is set.
pub(crate) fn ensure_not_cancelled(cancel: &AtomicBool) -> Result<(), SyncError> {
    if cancel.load(Ordering::Relaxed) {
        Err(SyncError::Cancelled)
    } else {
        Ok(())
    }
}

/// What: Run file reads and hashing on the blocking pool.
///
/// Inputs:
/// - `work`: Blocking closure.
///
/// Output:
/// - The closure's result.
///
/// # Errors
/// - Errors returned by `work`.
/// - `SyncError::Task` when the blocking task panicked or was cancelled.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, SyncError>
where
    F: FnOnce() -> Result<T, SyncError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| SyncError::Task(e.to_string()))?
}

/// Local sources of a run. A missing source disables that kind of work.
#[derive(Debug, Clone, Default)]
pub struct LocalAssets {
    /// Words store; `None` skips text.
    pub words: Option<WordsStore>,
    /// Image tree root; `None` skips images.
    pub images_dir: Option<PathBuf>,
    /// Title substitutions.
    pub substitutions: Substitutions,
}

/// Run parameters.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Package to update.
    pub package: String,
    /// Listing locales to process; empty means all.
    pub locales: Vec<String>,
    /// Title length ceiling in characters.
    pub title_max_len: usize,
    /// Locales processed at the same time.
    pub concurrency: usize,
    /// Include the base listing in the report.
    pub show_base_listing: bool,
}

impl SyncOptions {
    /// Options for `package` with default limits.
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            locales: Vec::new(),
            title_max_len: crate::config::DEFAULT_TITLE_MAX_LEN,
            concurrency: crate::config::DEFAULT_CONCURRENCY,
            show_base_listing: false,
        }
    }
}
