//! Store decorator that reads for real and only pretends to write.

use async_trait::async_trait;
use tracing::info;

use super::{
    AppDetails, EditKey, ImageCategory, ListingStore, ListingText, RemoteImage, Result, Track,
};

/// Passes reads through to the wrapped store and logs mutations instead of sending them.
#[derive(Debug, Clone)]
pub struct DryRunStore<S> {
    /// Wrapped store used for reads.
    inner: S,
}

impl<S> DryRunStore<S> {
    /// Wrap `inner`.
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: ListingStore> ListingStore for DryRunStore<S> {
    async fn open_session(&self, package: &str) -> Result<EditKey> {
        self.inner.open_session(package).await
    }

    async fn app_details(&self, edit: &EditKey) -> Result<AppDetails> {
        self.inner.app_details(edit).await
    }

    async fn list_listings(&self, edit: &EditKey) -> Result<Vec<ListingText>> {
        self.inner.list_listings(edit).await
    }

    async fn get_listing(&self, edit: &EditKey, locale: &str) -> Result<ListingText> {
        self.inner.get_listing(edit, locale).await
    }

    async fn put_listing(
        &self,
        _edit: &EditKey,
        locale: &str,
        listing: &ListingText,
    ) -> Result<()> {
        info!(locale, title = %listing.title, "dry run: would update listing");
        Ok(())
    }

    async fn list_images(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
    ) -> Result<Vec<RemoteImage>> {
        self.inner.list_images(edit, locale, category).await
    }

    async fn upload_image(
        &self,
        _edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<()> {
        info!(locale, %category, bytes = bytes.len(), "dry run: would upload image");
        Ok(())
    }

    async fn delete_image(
        &self,
        _edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        image_id: &str,
    ) -> Result<()> {
        info!(locale, %category, image_id, "dry run: would delete image");
        Ok(())
    }

    async fn commit(&self, edit: &EditKey) -> Result<()> {
        info!(edit = %edit, "dry run: would commit edit");
        Ok(())
    }

    async fn list_tracks(&self, edit: &EditKey) -> Result<Vec<Track>> {
        self.inner.list_tracks(edit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    /// What: Mutations never reach the wrapped store.
    ///
    /// Inputs:
    /// - A dry-run wrapper around a memory store; put, upload, delete and commit calls.
    ///
    /// Output:
    /// - All calls succeed and the memory store records no mutation.
    async fn mutations_are_swallowed() {
        let store = DryRunStore::new(MemoryStore::new("en-US"));
        let edit = store.open_session("com.example").await.expect("open");
        store
            .put_listing(&edit, "de-DE", &ListingText::default())
            .await
            .expect("put");
        store
            .upload_image(&edit, "de-DE", ImageCategory::Icon, b"png", "image/png")
            .await
            .expect("upload");
        store
            .delete_image(&edit, "de-DE", ImageCategory::Icon, "img-1")
            .await
            .expect("delete");
        store.commit(&edit).await.expect("commit");
        assert!(store.inner.mutations().is_empty());
    }
}
