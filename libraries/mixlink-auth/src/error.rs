//! Error types for the auth flow.

use thiserror::Error;

/// Errors that can occur during login, token exchange, and refresh.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Callback carried no authorization code
    #[error("Authorization code not found in callback")]
    MissingCode,

    /// Provider denied the authorization request
    #[error("Provider denied authorization: {0}")]
    ProviderDenied(String),

    /// PKCE flow in progress but no stored verifier
    #[error("No PKCE verifier stored for this login attempt")]
    MissingVerifier,

    /// Refresh token missing or refresh exchange rejected; session is over
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// Token endpoint returned an error response
    #[error("Token endpoint error ({status}): {message}")]
    TokenEndpoint { status: u16, message: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Persistence failure
    #[error("Storage error: {0}")]
    Storage(#[from] mixlink_core::CoreError),

    /// Failed to parse a URL or response
    #[error("Failed to parse: {0}")]
    Parse(String),
}

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
