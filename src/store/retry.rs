//! Bounded retry with exponential backoff for remote store calls.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use rand::RngExt;
use tracing::{debug, warn};

use super::{
    AppDetails, EditKey, ImageCategory, ListingStore, ListingText, RemoteImage, Result, Track,
};

/// Maximum jitter in milliseconds added to every backoff sleep.
const JITTER_MAX_MS: u64 = 250;

/// Retry policy applied uniformly to every remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. `1` disables retries.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled on each following retry.
    pub base_delay: Duration,
    /// Upper bound for a single backoff delay.
    pub max_delay: Duration,
    /// Whether to add random jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
        }
    }

    /// What: Compute the backoff before retry number `retry` (1-based).
    ///
    /// Inputs:
    /// - `retry`: Number of the retry about to happen.
    ///
    /// Output:
    /// - `base_delay * 2^(retry-1)`, capped at `max_delay`, without jitter.
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// What: Run `operation` until it succeeds, fails permanently, or attempts run out.
    ///
    /// Inputs:
    /// - `name`: Operation name for logs.
    /// - `operation`: Closure producing a fresh future per attempt.
    ///
    /// Output:
    /// - First success, or the last error.
    ///
    /// # Errors
    /// - Returns the error immediately when it is not transient.
    /// - Returns the last transient error once `max_attempts` is reached.
    pub async fn run<T, F, Fut>(&self, name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation = name, attempt, "remote call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let mut delay = self.backoff(attempt);
                    if self.jitter && !delay.is_zero() {
                        let jitter_ms = rand::rng().random_range(0..=JITTER_MAX_MS);
                        delay += Duration::from_millis(jitter_ms);
                    }
                    warn!(
                        operation = name,
                        attempt,
                        max_attempts = self.max_attempts,
                        backoff_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "remote call failed, retrying with exponential backoff"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Store decorator applying a [`RetryPolicy`] to every operation.
#[derive(Debug, Clone)]
pub struct RetryingStore<S> {
    /// Wrapped store.
    inner: S,
    /// Policy shared by all operations.
    policy: RetryPolicy,
}

impl<S> RetryingStore<S> {
    /// Wrap `inner` with `policy`.
    pub const fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Borrow the wrapped store.
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ListingStore> ListingStore for RetryingStore<S> {
    async fn open_session(&self, package: &str) -> Result<EditKey> {
        self.policy
            .run("open_session", || self.inner.open_session(package))
            .await
    }

    async fn app_details(&self, edit: &EditKey) -> Result<AppDetails> {
        self.policy
            .run("app_details", || self.inner.app_details(edit))
            .await
    }

    async fn list_listings(&self, edit: &EditKey) -> Result<Vec<ListingText>> {
        self.policy
            .run("list_listings", || self.inner.list_listings(edit))
            .await
    }

    async fn get_listing(&self, edit: &EditKey, locale: &str) -> Result<ListingText> {
        self.policy
            .run("get_listing", || self.inner.get_listing(edit, locale))
            .await
    }

    async fn put_listing(
        &self,
        edit: &EditKey,
        locale: &str,
        listing: &ListingText,
    ) -> Result<()> {
        self.policy
            .run("put_listing", || self.inner.put_listing(edit, locale, listing))
            .await
    }

    async fn list_images(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
    ) -> Result<Vec<RemoteImage>> {
        self.policy
            .run("list_images", || self.inner.list_images(edit, locale, category))
            .await
    }

    async fn upload_image(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()> {
        self.policy
            .run("upload_image", || {
                self.inner
                    .upload_image(edit, locale, category, bytes, content_type)
            })
            .await
    }

    async fn delete_image(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        image_id: &str,
    ) -> Result<()> {
        self.policy
            .run("delete_image", || {
                self.inner.delete_image(edit, locale, category, image_id)
            })
            .await
    }

    async fn commit(&self, edit: &EditKey) -> Result<()> {
        self.policy.run("commit", || self.inner.commit(edit)).await
    }

    async fn list_tracks(&self, edit: &EditKey) -> Result<Vec<Track>> {
        self.policy
            .run("list_tracks", || self.inner.list_tracks(edit))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Policy with no sleeping so tests stay fast.
    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
        }
    }

    #[test]
    /// What: Backoff doubles from the base delay and is capped.
    ///
    /// Inputs:
    /// - Base 500ms, cap 3s.
    ///
    /// Output:
    /// - 500ms, 1s, 2s, 3s, 3s for retries 1..=5.
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 6,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(3),
            jitter: false,
        };
        let delays: Vec<u128> = (1..=5).map(|r| policy.backoff(r).as_millis()).collect();
        assert_eq!(delays, vec![500, 1000, 2000, 3000, 3000]);
        assert_eq!(policy.backoff(40), Duration::from_secs(3));
    }

    #[tokio::test]
    /// What: Transient failures are retried until success.
    ///
    /// Inputs:
    /// - An operation failing twice with 503 and then succeeding.
    ///
    /// Output:
    /// - `Ok` after exactly three calls.
    async fn transient_errors_are_retried() {
        let calls = AtomicU32::new(0);
        let result = fast_policy(4)
            .run("op", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(StoreError::from_status(503, "busy"))
                } else {
                    Ok(7)
                }
            })
            .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    /// What: Permanent failures surface immediately.
    ///
    /// Inputs:
    /// - An operation always failing with 403.
    ///
    /// Output:
    /// - The 403 error after a single call.
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = fast_policy(4)
            .run("op", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::from_status(403, "quota"))
            })
            .await;
        assert!(matches!(result, Err(StoreError::Permanent { status: 403, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    /// What: Attempts are bounded.
    ///
    /// Inputs:
    /// - An operation always failing with 500, policy of 3 attempts.
    ///
    /// Output:
    /// - The last transient error after exactly three calls.
    async fn attempts_are_bounded() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = fast_policy(3)
            .run("op", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::from_status(500, "boom"))
            })
            .await;
        assert!(matches!(result, Err(StoreError::Transient { status: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
