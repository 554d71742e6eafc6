//! Aggregated run report.

use std::fmt;

use crate::store::ListingText;

/// Outcome of one kind of work (text or images) for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkOutcome {
    /// Remote already matched the local source.
    Unchanged,
    /// At least one remote mutation was made.
    Updated,
    /// The work failed; earlier mutations for this locale may be staged.
    Failed(String),
}

/// Per-locale status shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleStatus {
    /// Nothing was changed.
    NoChanges,
    /// Something was changed.
    Updated,
    /// At least one kind of work failed.
    Error(String),
}

impl fmt::Display for LocaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChanges => f.write_str("no changes"),
            Self::Updated => f.write_str("updated"),
            Self::Error(reason) => write!(f, "error: {reason}"),
        }
    }
}

/// What happened to one listing locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleReport {
    /// Distribution locale.
    pub locale: String,
    /// Text outcome; `None` when text was not attempted (base locale or images only).
    pub text: Option<WorkOutcome>,
    /// Image outcome; `None` when images were not attempted.
    pub images: Option<WorkOutcome>,
}

impl LocaleReport {
    /// What: Fold text and image outcomes into one status.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `Error` if any work failed (reasons joined), else `Updated` if any work
    ///   changed something, else `NoChanges`.
    #[must_use]
    pub fn status(&self) -> LocaleStatus {
        let parts = [("text", &self.text), ("images", &self.images)];
        let failures: Vec<String> = parts
            .iter()
            .filter_map(|(kind, outcome)| match outcome {
                Some(WorkOutcome::Failed(reason)) => Some(format!("{kind}: {reason}")),
                _ => None,
            })
            .collect();
        if !failures.is_empty() {
            return LocaleStatus::Error(failures.join("; "));
        }
        if parts
            .iter()
            .any(|(_, o)| matches!(o, Some(WorkOutcome::Updated)))
        {
            LocaleStatus::Updated
        } else {
            LocaleStatus::NoChanges
        }
    }

    /// Whether this locale staged any change.
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self.text, Some(WorkOutcome::Updated))
            || matches!(self.images, Some(WorkOutcome::Updated))
    }
}

/// Final state of the edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitStatus {
    /// Changes were committed.
    Committed,
    /// Nothing changed; no commit was sent.
    NothingToCommit,
    /// The run was interrupted; staged changes were not committed.
    Cancelled,
    /// The commit call failed.
    Failed(String),
}

impl fmt::Display for CommitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Committed => f.write_str("committed"),
            Self::NothingToCommit => f.write_str("nothing to commit"),
            Self::Cancelled => f.write_str("cancelled, not committed"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Everything a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Package name.
    pub package: String,
    /// Base locale of the package.
    pub base_locale: String,
    /// Base listing, present when the run was asked to show it.
    pub base_listing: Option<ListingText>,
    /// Processed listing locales for which no words resolve.
    pub untranslatable: Vec<String>,
    /// One entry per processed locale, in listing order.
    pub locales: Vec<LocaleReport>,
    /// Commit result.
    pub commit: CommitStatus,
}

impl SyncReport {
    /// Whether every locale succeeded and the commit did not fail.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self.commit, CommitStatus::Failed(_) | CommitStatus::Cancelled)
            && self
                .locales
                .iter()
                .all(|l| !matches!(l.status(), LocaleStatus::Error(_)))
    }

    /// Number of locales with the given status kind.
    fn count(&self, pred: impl Fn(&LocaleStatus) -> bool) -> usize {
        self.locales.iter().filter(|l| pred(&l.status())).count()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.locales.len();
        for (i, locale) in self.locales.iter().enumerate() {
            writeln!(f, "{} ({}/{}): {}", locale.locale, i + 1, total, locale.status())?;
        }
        writeln!(
            f,
            "{} updated, {} unchanged, {} failed",
            self.count(|s| matches!(s, LocaleStatus::Updated)),
            self.count(|s| matches!(s, LocaleStatus::NoChanges)),
            self.count(|s| matches!(s, LocaleStatus::Error(_))),
        )?;
        write!(f, "commit: {}", self.commit)
    }
}
