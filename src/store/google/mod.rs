//! Android Publisher v3 REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    AppDetails, EditKey, ImageCategory, ListingStore, ListingText, RemoteImage, Result,
    StoreError, Track,
};
use crate::util::percent_encode;

pub mod auth;

pub use auth::{Authenticator, ServiceAccountKey};

/// Production API host.
pub const DEFAULT_API_BASE: &str = "https://androidpublisher.googleapis.com";

/// Response of `edits.insert`.
#[derive(Debug, Deserialize)]
struct AppEdit {
    /// Edit id.
    id: String,
}

/// Response of `edits.listings.list`.
#[derive(Debug, Default, Deserialize)]
struct ListingsListResponse {
    /// Listings of the edit; omitted when empty.
    #[serde(default)]
    listings: Vec<ListingText>,
}

/// Response of `edits.images.list`.
#[derive(Debug, Default, Deserialize)]
struct ImagesListResponse {
    /// Images of the slot; omitted when empty.
    #[serde(default)]
    images: Vec<RemoteImage>,
}

/// Response of `edits.tracks.list`.
#[derive(Debug, Default, Deserialize)]
struct TracksListResponse {
    /// Tracks of the edit; omitted when empty.
    #[serde(default)]
    tracks: Vec<Track>,
}

/// [`ListingStore`] backed by the Android Publisher API.
#[derive(Debug)]
pub struct PlayPublisherClient {
    /// Pooled HTTP client.
    http: Client,
    /// API host without trailing slash.
    base_url: String,
    /// Bearer token source.
    auth: Authenticator,
}

impl PlayPublisherClient {
    /// What: Build a client for `base_url`.
    ///
    /// Inputs:
    /// - `base_url`: API host (`DEFAULT_API_BASE` in production, a mock server in tests).
    /// - `auth`: Token source.
    ///
    /// Output:
    /// - Client with connect/request timeouts and a crate user agent.
    ///
    /// # Errors
    /// - `StoreError::Transport` when the HTTP client cannot be constructed.
    pub fn new(base_url: &str, auth: Authenticator) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(120))
            .user_agent(format!("playlisting/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport(format!("building HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// `.../applications/{package}/edits`
    fn edits_root(&self, package: &str) -> String {
        format!(
            "{}/androidpublisher/v3/applications/{}/edits",
            self.base_url,
            percent_encode(package)
        )
    }

    /// `.../applications/{package}/edits/{id}`
    fn edit_url(&self, edit: &EditKey) -> String {
        format!("{}/{}", self.edits_root(&edit.package), percent_encode(&edit.id))
    }

    /// `.../edits/{id}/listings/{locale}/{category}`
    fn images_url(&self, edit: &EditKey, locale: &str, category: ImageCategory) -> String {
        format!(
            "{}/listings/{}/{}",
            self.edit_url(edit),
            percent_encode(locale),
            category.as_str()
        )
    }

    /// Attach the bearer token and send.
    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response> {
        let token = self.auth.token(&self.http).await?;
        let resp = req.bearer_auth(token).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = api_error_message(&body).unwrap_or(body);
        Err(StoreError::from_status(status.as_u16(), message))
    }

    /// Send and decode a JSON body; an empty body decodes as `T::default()`.
    async fn send_json<T>(&self, req: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let bytes = self.send(req).await?.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Send and discard the response body.
    async fn send_empty(&self, req: RequestBuilder) -> Result<()> {
        self.send(req).await.map(drop)
    }
}

/// What: Extract the message of a Google API error body.
///
/// Inputs:
/// - `body`: Response body, usually `{"error": {"code": .., "message": ..}}`.
///
/// Output:
/// - `Some(message)` when the body has that shape; `None` otherwise.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(ToString::to_string)
}

#[async_trait]
impl ListingStore for PlayPublisherClient {
    async fn open_session(&self, package: &str) -> Result<EditKey> {
        let url = self.edits_root(package);
        debug!(package, "opening edit");
        let req = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body("{}");
        let resp = self.send(req).await?;
        let edit: AppEdit = resp.json().await?;
        Ok(EditKey {
            package: package.to_string(),
            id: edit.id,
        })
    }

    async fn app_details(&self, edit: &EditKey) -> Result<AppDetails> {
        let url = format!("{}/details", self.edit_url(edit));
        self.send_json(self.http.get(url)).await
    }

    async fn list_listings(&self, edit: &EditKey) -> Result<Vec<ListingText>> {
        let url = format!("{}/listings", self.edit_url(edit));
        let list: ListingsListResponse = self.send_json(self.http.get(url)).await?;
        Ok(list.listings)
    }

    async fn get_listing(&self, edit: &EditKey, locale: &str) -> Result<ListingText> {
        let url = format!("{}/listings/{}", self.edit_url(edit), percent_encode(locale));
        self.send_json(self.http.get(url)).await
    }

    async fn put_listing(
        &self,
        edit: &EditKey,
        locale: &str,
        listing: &ListingText,
    ) -> Result<()> {
        let url = format!("{}/listings/{}", self.edit_url(edit), percent_encode(locale));
        let mut body = listing.clone();
        body.language = locale.to_string();
        self.send_empty(self.http.put(url).json(&body)).await
    }

    async fn list_images(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
    ) -> Result<Vec<RemoteImage>> {
        let url = self.images_url(edit, locale, category);
        let list: ImagesListResponse = self.send_json(self.http.get(url)).await?;
        Ok(list.images)
    }

    async fn upload_image(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/upload/androidpublisher/v3/applications/{}/edits/{}/listings/{}/{}?uploadType=media",
            self.base_url,
            percent_encode(&edit.package),
            percent_encode(&edit.id),
            percent_encode(locale),
            category.as_str()
        );
        let req = self
            .http
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes.to_vec());
        self.send_empty(req).await
    }

    async fn delete_image(
        &self,
        edit: &EditKey,
        locale: &str,
        category: ImageCategory,
        image_id: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/{}",
            self.images_url(edit, locale, category),
            percent_encode(image_id)
        );
        self.send_empty(self.http.delete(url)).await
    }

    async fn commit(&self, edit: &EditKey) -> Result<()> {
        let url = format!("{}:commit", self.edit_url(edit));
        self.send_empty(self.http.post(url).body("")).await
    }

    async fn list_tracks(&self, edit: &EditKey) -> Result<Vec<Track>> {
        let url = format!("{}/tracks", self.edit_url(edit));
        let list: TracksListResponse = self.send_json(self.http.get(url)).await?;
        Ok(list.tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Google error bodies yield their message.
    ///
    /// Inputs:
    /// - A standard error envelope, and a plain text body.
    ///
    /// Output:
    /// - The nested message; `None` for the plain body.
    fn api_error_message_is_extracted() {
        let body = r#"{"error":{"code":403,"message":"The caller does not have permission"}}"#;
        assert_eq!(
            api_error_message(body).as_deref(),
            Some("The caller does not have permission")
        );
        assert_eq!(api_error_message("Service Unavailable"), None);
    }

    #[test]
    /// What: Edit URLs are rooted at the configured host.
    ///
    /// Inputs:
    /// - Base URL with trailing slash, package and edit id.
    ///
    /// Output:
    /// - Image URL without double slashes, category in API spelling.
    fn urls_are_built_from_base() {
        let client = PlayPublisherClient::new("http://localhost:9/", Authenticator::Static("t".into()))
            .expect("client");
        let edit = EditKey {
            package: "com.example.app".into(),
            id: "123".into(),
        };
        assert_eq!(
            client.images_url(&edit, "pt-BR", ImageCategory::PhoneScreenshots),
            "http://localhost:9/androidpublisher/v3/applications/com.example.app/edits/123/listings/pt-BR/phoneScreenshots"
        );
    }
}
