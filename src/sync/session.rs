//! Edit session context and commit gating.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use super::SyncError;
use crate::locale::Locale;
use crate::store::{EditKey, ListingStore};

/// The one transaction context of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Package and edit id on the remote store.
    key: EditKey,
    /// Source-of-truth locale of the package.
    base_locale: Locale,
}

impl EditSession {
    /// Bind an opened edit to the package's base locale.
    #[must_use]
    pub const fn new(key: EditKey, base_locale: Locale) -> Self {
        Self { key, base_locale }
    }

    /// Edit key threaded into every remote call.
    #[must_use]
    pub const fn key(&self) -> &EditKey {
        &self.key
    }

    /// Package name.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.key.package
    }

    /// Base locale of the package.
    #[must_use]
    pub const fn base_locale(&self) -> &Locale {
        &self.base_locale
    }
}

/// Result of [`CommitCoordinator::finalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The edit was committed.
    Committed,
    /// No change was staged, so no commit was sent.
    NothingToCommit,
}

/// Collects "something changed" signals and commits once at the end.
///
/// The dirty flag is set by any worker that performed a remote mutation and
/// is never cleared.
#[derive(Debug, Default)]
pub struct CommitCoordinator {
    /// Set once any mutation succeeded.
    dirty: AtomicBool,
}

impl CommitCoordinator {
    /// Fresh coordinator with no change noted.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dirty: AtomicBool::new(false),
        }
    }

    /// Record that a remote mutation happened. Idempotent.
    pub fn note_change(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Whether any change was recorded.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// What: Commit the edit if and only if a change was recorded.
    ///
    /// Inputs:
    /// - `store`: Remote store.
    /// - `session`: Edit to commit.
    ///
    /// Output:
    /// - `Committed` after one commit call, `NothingToCommit` without any remote call.
    ///
    /// # Errors
    /// - `SyncError::Commit` when the store rejects the commit.
    ///
    /// Details:
    /// - Callers must only invoke this after every locale worker has finished.
    pub async fn finalize(
        &self,
        store: &dyn ListingStore,
        session: &EditSession,
    ) -> Result<CommitOutcome, SyncError> {
        if !self.is_dirty() {
            debug!(edit = %session.key(), "no changes; skipping commit");
            return Ok(CommitOutcome::NothingToCommit);
        }
        store
            .commit(session.key())
            .await
            .map_err(SyncError::Commit)?;
        info!(edit = %session.key(), "edit committed");
        Ok(CommitOutcome::Committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    /// What: A clean coordinator never calls commit.
    ///
    /// Inputs:
    /// - Fresh coordinator and an open edit.
    ///
    /// Output:
    /// - `NothingToCommit`, zero commits recorded.
    async fn finalize_clean_skips_commit() {
        let store = MemoryStore::new("en-US");
        let key = store.open_session("com.example").await.expect("open");
        let session = EditSession::new(key, "en-US".into());
        let outcome = CommitCoordinator::new()
            .finalize(&store, &session)
            .await
            .expect("finalize");
        assert_eq!(outcome, CommitOutcome::NothingToCommit);
        assert_eq!(store.commits(), 0);
    }

    #[tokio::test]
    /// What: Many change signals still produce exactly one commit.
    ///
    /// Inputs:
    /// - `note_change` called three times.
    ///
    /// Output:
    /// - `Committed`, one commit recorded.
    async fn finalize_dirty_commits_once() {
        let store = MemoryStore::new("en-US");
        let key = store.open_session("com.example").await.expect("open");
        let session = EditSession::new(key, "en-US".into());
        let coordinator = CommitCoordinator::new();
        for _ in 0..3 {
            coordinator.note_change();
        }
        let outcome = coordinator
            .finalize(&store, &session)
            .await
            .expect("finalize");
        assert_eq!(outcome, CommitOutcome::Committed);
        assert_eq!(store.commits(), 1);
    }
}
