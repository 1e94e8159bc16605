//! Client configuration
//!
//! All provider endpoints, the OAuth client id, and the redirect URI are
//! carried by an immutable [`ClientConfig`] injected at startup rather than
//! read from module-level constants.

use serde::{Deserialize, Serialize};

/// Default Spotify accounts service base URL (authorize + token endpoints)
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Default Spotify Web API base URL
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// OAuth scopes requested at login
pub const DEFAULT_SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "user-top-read",
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-public",
    "playlist-modify-private",
    "streaming",
    "user-read-playback-state",
    "user-modify-playback-state",
];

/// Immutable client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// OAuth client id registered with the provider
    pub client_id: String,

    /// Redirect URI the provider sends the authorization code back to
    pub redirect_uri: String,

    /// Scopes requested at login, space-joined on the wire
    pub scopes: Vec<String>,

    /// Accounts service base URL (hosts `/authorize` and `/api/token`)
    pub accounts_url: String,

    /// Web API base URL
    pub api_url: String,

    /// Origin used to build share links (e.g. `https://mixlink.example`)
    pub app_origin: String,
}

impl ClientConfig {
    /// Create a configuration for the given client id and app origin.
    ///
    /// The redirect URI is derived as `{app_origin}/callback`; provider
    /// endpoints and scopes default to the Spotify values.
    pub fn new(client_id: impl Into<String>, app_origin: impl Into<String>) -> Self {
        let app_origin = app_origin.into().trim_end_matches('/').to_string();
        Self {
            client_id: client_id.into(),
            redirect_uri: format!("{app_origin}/callback"),
            scopes: DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            app_origin,
        }
    }

    /// Override the provider endpoints (used by tests against a mock server).
    pub fn with_endpoints(
        mut self,
        accounts_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        self.accounts_url = accounts_url.into().trim_end_matches('/').to_string();
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The provider's authorize endpoint
    pub fn authorize_endpoint(&self) -> String {
        format!("{}/authorize", self.accounts_url)
    }

    /// The provider's token endpoint
    pub fn token_endpoint(&self) -> String {
        format!("{}/api/token", self.accounts_url)
    }

    /// Scopes as the space-joined string sent on the wire
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_redirect_uri_from_origin() {
        let config = ClientConfig::new("client123", "https://mixlink.example/");
        assert_eq!(config.app_origin, "https://mixlink.example");
        assert_eq!(config.redirect_uri, "https://mixlink.example/callback");
    }

    #[test]
    fn default_endpoints_point_at_spotify() {
        let config = ClientConfig::new("client123", "http://localhost:3000");
        assert_eq!(
            config.authorize_endpoint(),
            "https://accounts.spotify.com/authorize"
        );
        assert_eq!(
            config.token_endpoint(),
            "https://accounts.spotify.com/api/token"
        );
    }

    #[test]
    fn scope_param_is_space_joined() {
        let config = ClientConfig::new("client123", "http://localhost:3000");
        let scope = config.scope_param();
        assert!(scope.starts_with("user-read-private user-read-email"));
        assert!(!scope.contains(','));
    }
}
