//! Remote listing store contract.
//!
//! The Play Store models edits as a staged session: every call below is
//! scoped to an [`EditKey`] returned by [`ListingStore::open_session`], and
//! nothing becomes visible until [`ListingStore::commit`] succeeds.
//!
//! Implementations:
//! - [`google::PlayPublisherClient`]: the real Android Publisher v3 REST API.
//! - [`memory::MemoryStore`]: in-memory store recording every mutation.
//! - [`retry::RetryingStore`]: decorator applying a [`retry::RetryPolicy`] to every call.
//! - [`dry_run::DryRunStore`]: decorator that turns mutations into log lines.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod dry_run;
pub mod error;
pub mod google;
pub mod memory;
pub mod retry;

pub use error::StoreError;

/// Result type alias for remote store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Identifies one open edit session on the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditKey {
    /// Application package name (e.g. `com.example.app`).
    pub package: String,
    /// Opaque edit id returned by the store.
    pub id: String,
}

impl fmt::Display for EditKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.package, self.id)
    }
}

/// Application-wide details of an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDetails {
    /// Distribution locale treated as the source of truth.
    #[serde(default)]
    pub default_language: String,
    /// Developer contact e-mail.
    #[serde(default)]
    pub contact_email: String,
    /// Developer contact website.
    #[serde(default)]
    pub contact_website: String,
}

/// Store listing text for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingText {
    /// Distribution locale code (e.g. `pt-BR`).
    #[serde(default)]
    pub language: String,
    /// Listing title.
    #[serde(default)]
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub short_description: String,
    /// Full description.
    #[serde(default)]
    pub full_description: String,
    /// Promo video URL; not managed here but preserved on write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

impl ListingText {
    /// What: Compare the three managed text fields.
    ///
    /// Inputs:
    /// - `other`: Listing to compare against.
    ///
    /// Output:
    /// - `true` when title, short description and full description are all identical.
    ///
    /// Details:
    /// - `language` and `video` are ignored; they are not produced by translation.
    #[must_use]
    pub fn same_text(&self, other: &Self) -> bool {
        self.title == other.title
            && self.short_description == other.short_description
            && self.full_description == other.full_description
    }
}

/// Image category of a store listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImageCategory {
    /// Phone screenshot.
    PhoneScreenshots,
    /// Seven inch tablet screenshot.
    SevenInchScreenshots,
    /// Ten inch tablet screenshot.
    TenInchScreenshots,
    /// TV screenshot.
    TvScreenshots,
    /// Wear OS screenshot.
    WearScreenshots,
    /// Launcher icon.
    Icon,
    /// Feature graphic.
    FeatureGraphic,
    /// TV banner.
    TvBanner,
}

impl ImageCategory {
    /// Every category, in the order they are reconciled.
    pub const ALL: [Self; 8] = [
        Self::PhoneScreenshots,
        Self::SevenInchScreenshots,
        Self::TenInchScreenshots,
        Self::TvScreenshots,
        Self::WearScreenshots,
        Self::Icon,
        Self::FeatureGraphic,
        Self::TvBanner,
    ];

    /// API name of the category; also the local directory name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PhoneScreenshots => "phoneScreenshots",
            Self::SevenInchScreenshots => "sevenInchScreenshots",
            Self::TenInchScreenshots => "tenInchScreenshots",
            Self::TvScreenshots => "tvScreenshots",
            Self::WearScreenshots => "wearScreenshots",
            Self::Icon => "icon",
            Self::FeatureGraphic => "featureGraphic",
            Self::TvBanner => "tvBanner",
        }
    }

    /// Human description of what the store expects for this category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::PhoneScreenshots => "2-8 phone 24bit PNG (no alpha) ~1080x1920",
            Self::SevenInchScreenshots => "1-8 7in tablet shot ~1920x1200",
            Self::TenInchScreenshots => "1-8 10in tablet shot ~2560x1600",
            Self::TvScreenshots => "1-8 from TV",
            Self::WearScreenshots => "1-8 from watch",
            Self::Icon => "1 32bit PNG (no transparency) 512x512",
            Self::FeatureGraphic => "1 24bit PNG (no alpha) 1024x500",
            Self::TvBanner => "1 24bit PNG (no alpha) 1280x720",
        }
    }

    /// Maximum number of images the store accepts in this category.
    #[must_use]
    pub const fn max_images(self) -> usize {
        match self {
            Self::Icon | Self::FeatureGraphic | Self::TvBanner => 1,
            _ => 8,
        }
    }
}

impl fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image already stored remotely for one locale and category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteImage {
    /// Remote identifier, needed for deletion.
    pub id: String,
    /// Public URL of the image.
    #[serde(default)]
    pub url: String,
    /// Hex SHA-1 of the image bytes.
    #[serde(default)]
    pub sha1: String,
    /// Hex SHA-256 of the image bytes; the content identity used for diffing.
    #[serde(default)]
    pub sha256: String,
}

/// A release track of the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track name (`production`, `beta`, ...).
    pub track: String,
}

/// Operation contract of the remote listing store.
///
/// Every method is naturally idempotent or guarded by a read-before-write
/// comparison in the engine, so callers may retry any of them.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Open a draft edit for `package`.
    async fn open_session(&self, package: &str) -> Result<EditKey>;

    /// Read application details (base locale and contacts).
    async fn app_details(&self, edit: &EditKey) -> Result<AppDetails>;

    /// List every listing of the edit.
    async fn list_listings(&self, edit: &EditKey) -> Result<Vec<ListingText>>;

    /// Read the listing for one locale.
    async fn get_listing(&self, edit: &EditKey, locale: &str) -> Result<ListingText>;

    /// Replace the listing for one locale.
    async fn put_listing(&self, edit: &EditKey, locale: &str, listing: &ListingText)
    -> Result<()>;

    /// List images of one locale and category.
    async fn list_images(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
    ) -> Result<Vec<RemoteImage>>;

    /// Upload one image into a locale and category.
    async fn upload_image(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()>;

    /// Delete one remote image.
    async fn delete_image(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        image_id: &str,
    ) -> Result<()>;

    /// Commit the edit, publishing every staged change.
    async fn commit(&self, edit: &EditKey) -> Result<()>;

    /// List release tracks of the edit.
    async fn list_tracks(&self, edit: &EditKey) -> Result<Vec<Track>>;

    /// List the locale codes that have a listing.
    async fn list_locales(&self, edit: &EditKey) -> Result<Vec<String>> {
        Ok(self
            .list_listings(edit)
            .await?
            .into_iter()
            .map(|l| l.language)
            .collect())
    }
}

/// Shared stores, so a decorated store can still be inspected by its owner.
#[async_trait]
impl<S: ListingStore + ?Sized> ListingStore for Arc<S> {
    async fn open_session(&self, package: &str) -> Result<EditKey> {
        (**self).open_session(package).await
    }

    async fn app_details(&self, edit: &EditKey) -> Result<AppDetails> {
        (**self).app_details(edit).await
    }

    async fn list_listings(&self, edit: &EditKey) -> Result<Vec<ListingText>> {
        (**self).list_listings(edit).await
    }

    async fn get_listing(&self, edit: &EditKey, locale: &str) -> Result<ListingText> {
        (**self).get_listing(edit, locale).await
    }

    async fn put_listing(
        &self,
        edit: &EditKey,
        locale: &str,
        listing: &ListingText,
    ) -> Result<()> {
        (**self).put_listing(edit, locale, listing).await
    }

    async fn list_images(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
    ) -> Result<Vec<RemoteImage>> {
        (**self).list_images(edit, locale, category).await
    }

    async fn upload_image(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()> {
        (**self)
            .upload_image(edit, locale, category, bytes, content_type)
            .await
    }

    async fn delete_image(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        image_id: &str,
    ) -> Result<()> {
        (**self).delete_image(edit, locale, category, image_id).await
    }

    async fn commit(&self, edit: &EditKey) -> Result<()> {
        (**self).commit(edit).await
    }

    async fn list_tracks(&self, edit: &EditKey) -> Result<Vec<Track>> {
        (**self).list_tracks(edit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Single-image categories are capped at one.
    ///
    /// Inputs:
    /// - Every category in `ImageCategory::ALL`.
    ///
    /// Output:
    /// - Icon, feature graphic and TV banner allow 1; screenshots allow 8.
    fn image_category_limits() {
        for category in ImageCategory::ALL {
            let expected = match category {
                ImageCategory::Icon | ImageCategory::FeatureGraphic | ImageCategory::TvBanner => 1,
                _ => 8,
            };
            assert_eq!(category.max_images(), expected, "{category}");
        }
    }

    #[test]
    /// What: Listing equality only considers the translated fields.
    ///
    /// Inputs:
    /// - Two listings differing only in language and video.
    ///
    /// Output:
    /// - `same_text` is true; changing the title makes it false.
    fn same_text_ignores_language_and_video() {
        let a = ListingText {
            language: "en-US".into(),
            title: "T".into(),
            short_description: "S".into(),
            full_description: "F".into(),
            video: None,
        };
        let mut b = ListingText {
            language: "de-DE".into(),
            video: Some("https://youtu.be/x".into()),
            ..a.clone()
        };
        assert!(a.same_text(&b));
        b.title = "U".into();
        assert!(!a.same_text(&b));
    }

    #[test]
    /// What: Listing JSON uses the store's camelCase field names.
    ///
    /// Inputs:
    /// - A listing body as returned by the store, without `video`.
    ///
    /// Output:
    /// - Fields decode; re-encoding omits the absent video.
    fn listing_json_is_camel_case() {
        let json = r#"{"language":"fr-FR","title":"Jeu","shortDescription":"court","fullDescription":"long"}"#;
        let listing: ListingText = serde_json::from_str(json).expect("decode listing");
        assert_eq!(listing.short_description, "court");
        let back = serde_json::to_string(&listing).expect("encode listing");
        assert!(back.contains("\"fullDescription\":\"long\""));
        assert!(!back.contains("video"));
    }
}
