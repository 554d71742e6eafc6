//! In-memory listing store.
//!
//! Keeps listings and images in a mutex-guarded map and records every
//! mutating call, so engine behaviour can be asserted without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{
    AppDetails, EditKey, ImageCategory, ListingStore, ListingText, RemoteImage, Result,
    StoreError, Track,
};
use crate::sync::images::ContentHash;

/// A mutating call observed by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A listing was replaced.
    PutListing {
        /// Locale of the listing.
        locale: String,
    },
    /// An image was uploaded.
    Upload {
        /// Locale of the image.
        locale: String,
        /// Category of the image.
        category: ImageCategory,
        /// Content identity of the uploaded bytes.
        sha256: String,
    },
    /// An image was deleted.
    Delete {
        /// Locale of the image.
        locale: String,
        /// Category of the image.
        category: ImageCategory,
        /// Remote id of the deleted image.
        image_id: String,
    },
    /// The edit was committed.
    Commit,
}

/// Mutable state behind the store mutex.
#[derive(Debug, Default)]
struct State {
    /// Application details returned for every edit.
    details: AppDetails,
    /// Listings keyed by locale.
    listings: HashMap<String, ListingText>,
    /// Images keyed by locale and category.
    images: HashMap<(String, ImageCategory), Vec<RemoteImage>>,
    /// Release tracks.
    tracks: Vec<Track>,
    /// Mutations in call order.
    mutations: Vec<Mutation>,
    /// Number of sessions opened.
    sessions: u32,
    /// Counter for generated image ids.
    next_image_id: u64,
    /// Failures to inject, keyed by operation name, consumed in order.
    failures: HashMap<String, VecDeque<StoreError>>,
}

/// In-memory [`ListingStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Store state.
    state: Mutex<State>,
}

impl MemoryStore {
    /// What: Create a store whose base locale is `default_language`.
    ///
    /// Inputs:
    /// - `default_language`: Base distribution locale (e.g. `en-US`).
    ///
    /// Output:
    /// - Empty store with a `production` track.
    #[must_use]
    pub fn new(default_language: &str) -> Self {
        let state = State {
            details: AppDetails {
                default_language: default_language.to_string(),
                contact_email: "dev@example.com".into(),
                contact_website: "https://example.com".into(),
            },
            tracks: vec![Track {
                track: "production".into(),
            }],
            ..State::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Lock the state, recovering from a poisoned mutex.
    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Insert or replace a listing without recording a mutation.
    pub fn insert_listing(&self, listing: ListingText) {
        self.lock()
            .listings
            .insert(listing.language.clone(), listing);
    }

    /// What: Seed a remote image with the identity of `bytes`.
    ///
    /// Inputs:
    /// - `locale`, `category`: Where the image lives.
    /// - `id`: Remote identifier.
    /// - `bytes`: Image content; its SHA-256 becomes the remote hash.
    pub fn insert_image(&self, locale: &str, category: ImageCategory, id: &str, bytes: &[u8]) {
        let image = RemoteImage {
            id: id.to_string(),
            url: format!("https://images.example.com/{id}"),
            sha1: String::new(),
            sha256: ContentHash::of(bytes).to_string(),
        };
        self.lock()
            .images
            .entry((locale.to_string(), category))
            .or_default()
            .push(image);
    }

    /// Queue `error` to be returned by the next call of operation `op`.
    pub fn fail_next(&self, op: &str, error: StoreError) {
        self.lock()
            .failures
            .entry(op.to_string())
            .or_default()
            .push_back(error);
    }

    /// Mutations recorded so far, in call order.
    #[must_use]
    pub fn mutations(&self) -> Vec<Mutation> {
        self.lock().mutations.clone()
    }

    /// Number of commits issued.
    #[must_use]
    pub fn commits(&self) -> usize {
        self.lock()
            .mutations
            .iter()
            .filter(|m| matches!(m, Mutation::Commit))
            .count()
    }

    /// Forget recorded mutations; the stored data is kept.
    pub fn clear_mutations(&self) {
        self.lock().mutations.clear();
    }

    /// Current listing for `locale`, if any.
    #[must_use]
    pub fn listing(&self, locale: &str) -> Option<ListingText> {
        self.lock().listings.get(locale).cloned()
    }

    /// Current images for `locale` and `category`.
    #[must_use]
    pub fn images(&self, locale: &str, category: ImageCategory) -> Vec<RemoteImage> {
        self.lock()
            .images
            .get(&(locale.to_string(), category))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of sessions opened so far.
    #[must_use]
    pub fn sessions(&self) -> u32 {
        self.lock().sessions
    }

    /// Pop an injected failure for `op`, if one is queued.
    fn injected(state: &mut State, op: &str) -> Result<()> {
        match state.failures.get_mut(op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Reject calls against an edit this store never opened.
    fn check_edit(state: &State, edit: &EditKey) -> Result<()> {
        if state.sessions == 0 || edit.id.is_empty() {
            return Err(StoreError::from_status(404, format!("unknown edit {edit}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn open_session(&self, package: &str) -> Result<EditKey> {
        let mut state = self.lock();
        Self::injected(&mut state, "open_session")?;
        state.sessions += 1;
        Ok(EditKey {
            package: package.to_string(),
            id: format!("edit-{}", state.sessions),
        })
    }

    async fn app_details(&self, edit: &EditKey) -> Result<AppDetails> {
        let mut state = self.lock();
        Self::injected(&mut state, "app_details")?;
        Self::check_edit(&state, edit)?;
        Ok(state.details.clone())
    }

    async fn list_listings(&self, edit: &EditKey) -> Result<Vec<ListingText>> {
        let mut state = self.lock();
        Self::injected(&mut state, "list_listings")?;
        Self::check_edit(&state, edit)?;
        let mut listings: Vec<ListingText> = state.listings.values().cloned().collect();
        listings.sort_by(|a, b| a.language.cmp(&b.language));
        Ok(listings)
    }

    async fn get_listing(&self, edit: &EditKey, locale: &str) -> Result<ListingText> {
        let mut state = self.lock();
        Self::injected(&mut state, "get_listing")?;
        Self::check_edit(&state, edit)?;
        state
            .listings
            .get(locale)
            .cloned()
            .ok_or_else(|| StoreError::from_status(404, format!("no listing for {locale}")))
    }

    async fn put_listing(
        &self,
        edit: &EditKey,
        locale: &str,
        listing: &ListingText,
    ) -> Result<()> {
        let mut state = self.lock();
        Self::injected(&mut state, "put_listing")?;
        Self::check_edit(&state, edit)?;
        let mut stored = listing.clone();
        stored.language = locale.to_string();
        state.listings.insert(locale.to_string(), stored);
        state.mutations.push(Mutation::PutListing {
            locale: locale.to_string(),
        });
        Ok(())
    }

    async fn list_images(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
    ) -> Result<Vec<RemoteImage>> {
        let mut state = self.lock();
        Self::injected(&mut state, "list_images")?;
        Self::check_edit(&state, edit)?;
        Ok(state
            .images
            .get(&(locale.to_string(), category))
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_image(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<()> {
        let mut state = self.lock();
        Self::injected(&mut state, "upload_image")?;
        Self::check_edit(&state, edit)?;
        let key = (locale.to_string(), category);
        let count = state.images.get(&key).map_or(0, Vec::len);
        if count >= category.max_images() {
            return Err(StoreError::from_status(
                400,
                format!("too many images in {locale}/{category}"),
            ));
        }
        state.next_image_id += 1;
        let sha256 = ContentHash::of(bytes).to_string();
        let image = RemoteImage {
            id: format!("img-{}", state.next_image_id),
            url: String::new(),
            sha1: String::new(),
            sha256: sha256.clone(),
        };
        state.images.entry(key).or_default().push(image);
        state.mutations.push(Mutation::Upload {
            locale: locale.to_string(),
            category,
            sha256,
        });
        Ok(())
    }

    async fn delete_image(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        image_id: &str,
    ) -> Result<()> {
        let mut state = self.lock();
        Self::injected(&mut state, "delete_image")?;
        Self::check_edit(&state, edit)?;
        if let Some(images) = state.images.get_mut(&(locale.to_string(), category)) {
            images.retain(|i| i.id != image_id);
        }
        state.mutations.push(Mutation::Delete {
            locale: locale.to_string(),
            category,
            image_id: image_id.to_string(),
        });
        Ok(())
    }

    async fn commit(&self, edit: &EditKey) -> Result<()> {
        let mut state = self.lock();
        Self::injected(&mut state, "commit")?;
        Self::check_edit(&state, edit)?;
        state.mutations.push(Mutation::Commit);
        Ok(())
    }

    async fn list_tracks(&self, edit: &EditKey) -> Result<Vec<Track>> {
        let mut state = self.lock();
        Self::injected(&mut state, "list_tracks")?;
        Self::check_edit(&state, edit)?;
        Ok(state.tracks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    /// What: Uploads enforce the per-category image limit.
    ///
    /// Inputs:
    /// - An icon slot already holding one image.
    ///
    /// Output:
    /// - A second upload fails with a permanent 400 and records nothing.
    async fn upload_respects_category_limit() {
        let store = MemoryStore::new("en-US");
        let edit = store.open_session("com.example").await.expect("open");
        store.insert_image("en-US", ImageCategory::Icon, "a", b"old");
        let err = store
            .upload_image(&edit, "en-US", ImageCategory::Icon, b"new", "image/png")
            .await
            .expect_err("icon slot is full");
        assert!(!err.is_transient());
        assert!(store.mutations().is_empty());
    }

    #[tokio::test]
    /// What: Injected failures are consumed once, in order.
    ///
    /// Inputs:
    /// - One queued 503 for `get_listing`.
    ///
    /// Output:
    /// - First call fails, second call succeeds.
    async fn injected_failure_is_consumed() {
        let store = MemoryStore::new("en-US");
        let edit = store.open_session("com.example").await.expect("open");
        store.insert_listing(ListingText {
            language: "en-US".into(),
            ..ListingText::default()
        });
        store.fail_next("get_listing", StoreError::from_status(503, "busy"));
        assert!(store.get_listing(&edit, "en-US").await.is_err());
        assert!(store.get_listing(&edit, "en-US").await.is_ok());
    }
}
