/// Store-specific errors
use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from collaborative playlist operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No playlist (or song) matches the identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Playlist name empty after trimming
    #[error("Playlist name must not be empty")]
    InvalidName,

    /// Persistence failure
    #[error(transparent)]
    Core(#[from] mixlink_core::CoreError),
}
