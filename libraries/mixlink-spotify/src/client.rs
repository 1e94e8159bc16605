//! Web API client.

use crate::error::{ApiError, Result};
use crate::types::{Paging, PlaylistSummary, PrivateUser, SearchResponse, SnapshotId, Track};
use mixlink_auth::AuthFlow;
use mixlink_core::ClientConfig;
use reqwest::{Client, Method};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the Spotify Web API endpoints mixlink uses.
///
/// Bearer tokens come from the injected [`AuthFlow`]; when the provider
/// signals expiry (401) the client refreshes once and retries exactly once.
/// Other failures surface directly without retry.
pub struct SpotifyClient {
    http: Client,
    config: ClientConfig,
    auth: Arc<AuthFlow>,
}

impl SpotifyClient {
    /// Create a client sharing the given auth flow.
    pub fn new(config: ClientConfig, auth: Arc<AuthFlow>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("mixlink/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config, auth })
    }

    /// The authenticated user's profile.
    pub async fn get_current_user(&self) -> Result<PrivateUser> {
        self.request(Method::GET, "/me", None).await
    }

    /// The user's own playlists on the provider.
    pub async fn get_user_playlists(&self) -> Result<Paging<PlaylistSummary>> {
        self.request(Method::GET, "/me/playlists", None).await
    }

    /// Search tracks by free-text query.
    pub async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>> {
        let qs: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("q", query)
            .append_pair("type", "track")
            .append_pair("limit", &limit.to_string())
            .finish();
        let response: SearchResponse = self.request(Method::GET, &format!("/search?{qs}"), None).await?;
        Ok(response.tracks.items)
    }

    /// Create a playlist owned by the authenticated user.
    pub async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<PlaylistSummary> {
        let user = self.get_current_user().await?;
        let body = serde_json::json!({
            "name": name,
            "description": description,
            "public": public,
            "collaborative": false,
        });
        self.request(
            Method::POST,
            &format!("/users/{}/playlists", user.id),
            Some(&body),
        )
        .await
    }

    /// Append track URIs to a provider playlist.
    pub async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<SnapshotId> {
        let body = serde_json::json!({ "uris": uris });
        self.request(
            Method::POST,
            &format!("/playlists/{playlist_id}/tracks"),
            Some(&body),
        )
        .await
    }

    /// Fetch a provider playlist by id.
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistSummary> {
        self.request(Method::GET, &format!("/playlists/{playlist_id}"), None)
            .await
    }

    /// Perform a request with one silent token refresh on 401.
    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        match self.attempt(method.clone(), path, body).await {
            Err(ApiError::AuthRequired) => {
                warn!(path = %path, "Token expired, attempting refresh");
                self.auth.refresh().await?;
                self.attempt(method, path, body).await
            }
            other => other,
        }
    }

    async fn attempt<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        let token = self
            .auth
            .access_token()
            .await?
            .ok_or(ApiError::AuthRequired)?;

        let url = format!("{}{}", self.config.api_url, path);
        debug!(method = %method, url = %url, "API request");

        let mut request = self.http.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::Parse(format!("Failed to parse API response: {e}")))
        } else if status.as_u16() == 401 {
            Err(ApiError::AuthRequired)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ApiError::HttpStatus {
                status: status.as_u16(),
                message,
            })
        }
    }
}
