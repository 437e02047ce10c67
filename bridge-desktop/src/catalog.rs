//! HTTP Catalog Client
//!
//! Talks to the remote catalog's REST API. Authentication is owned by the
//! session service; this client relies on the shared [`HttpClient`] carrying
//! the session cookie with every request.

use async_trait::async_trait;
use bridge_traits::{
    catalog::{CatalogService, CatalogTrack, PlaylistManifest, PlaylistSummary},
    error::{BridgeError, Result},
    http::{HttpClient, HttpRequest},
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Catalog client over the service's REST endpoints:
/// `/tracks`, `/playlists`, `/playlists/{id}/manifest`, `/tracks/{id}/stream`.
pub struct HttpCatalogClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl HttpCatalogClient {
    /// Create a new catalog client.
    ///
    /// `base_url` is the API root without a trailing slash, e.g.
    /// `https://tempo.example.com/api`.
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        debug!(url = %url, "Fetching catalog resource");

        let response = self.http.execute(HttpRequest::get(&url)).await?;
        if !response.is_success() {
            return Err(BridgeError::OperationFailed(format!(
                "Catalog request {} failed with HTTP {}",
                path, response.status
            )));
        }
        response.json()
    }
}

#[async_trait]
impl CatalogService for HttpCatalogClient {
    #[instrument(skip(self))]
    async fn list_tracks(&self) -> Result<Vec<CatalogTrack>> {
        self.get_json("/tracks").await
    }

    #[instrument(skip(self))]
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        self.get_json("/playlists").await
    }

    #[instrument(skip(self))]
    async fn fetch_manifest(&self, playlist_id: i64) -> Result<PlaylistManifest> {
        self.get_json(&format!("/playlists/{}/manifest", playlist_id))
            .await
    }

    fn stream_url(&self, track_id: i64) -> String {
        self.endpoint(&format!("/tracks/{}/stream", track_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::http::HttpResponse;

    struct NeverHttp;

    #[async_trait]
    impl HttpClient for NeverHttp {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse> {
            Err(BridgeError::Network("offline".to_string()))
        }
    }

    fn client() -> HttpCatalogClient {
        HttpCatalogClient::new(Arc::new(NeverHttp), "https://tempo.test/api/")
    }

    #[test]
    fn stream_url_shape() {
        assert_eq!(
            client().stream_url(42),
            "https://tempo.test/api/tracks/42/stream"
        );
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let c = HttpCatalogClient::new(Arc::new(NeverHttp), "https://tempo.test/api///");
        assert_eq!(c.endpoint("/tracks"), "https://tempo.test/api/tracks");
    }

    #[tokio::test]
    async fn network_failure_propagates() {
        let err = client().list_tracks().await.unwrap_err();
        assert!(matches!(err, BridgeError::Network(_)));
    }
}
