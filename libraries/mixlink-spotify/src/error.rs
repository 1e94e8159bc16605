//! Error types for the Spotify client and mirroring.

use thiserror::Error;

/// Errors from Web API calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// API returned a non-success status
    #[error("Spotify API error ({status}): {message}")]
    HttpStatus { status: u16, message: String },

    /// No access token held, or the provider rejected the bearer token
    #[error("Authentication required")]
    AuthRequired,

    /// Token refresh during a retried call failed
    #[error("Auth error: {0}")]
    Auth(#[from] mixlink_auth::AuthError),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse an API response
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors from mirroring a collaborative playlist to Spotify.
///
/// On `TrackAddFailed` the remote playlist exists and its id is already
/// recorded locally; the mirror is present but possibly empty, and the
/// caller may retry the track push.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Creating the remote playlist failed; nothing was recorded
    #[error("Failed to create remote playlist: {0}")]
    RemoteCreateFailed(#[source] ApiError),

    /// The remote playlist was created but pushing tracks failed
    #[error("Failed to add tracks to remote playlist: {0}")]
    TrackAddFailed(#[source] ApiError),

    /// Local store failure
    #[error(transparent)]
    Store(#[from] mixlink_store::StoreError),
}
