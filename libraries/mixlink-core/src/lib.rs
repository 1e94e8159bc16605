//! mixlink Core
//!
//! Platform-agnostic core types, the key-value persistence port, and client
//! configuration for mixlink.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `CollabPlaylist`, `Song`, `Vote`, etc.
//! - **Persistence Port**: the `KeyValueStore` trait with in-memory and
//!   file-backed implementations
//! - **Configuration**: the immutable `ClientConfig` injected at startup
//! - **Error Handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use mixlink_core::types::{CollabPlaylist, SongDraft};
//!
//! let playlist = CollabPlaylist::new(
//!     "Road Trip",
//!     "Summer songs",
//!     "Alice",
//!     "https://mixlink.example",
//! );
//! assert!(playlist.share_link.contains(playlist.id.as_str()));
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod keys;
pub mod kv;
pub mod types;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{CoreError, Result};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use types::{
    CollabPlaylist, PlaylistId, Song, SongDraft, SongOrder, Theme, Vote, VoteLedger,
};
