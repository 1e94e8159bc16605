//! mixlink Spotify
//!
//! Thin client for the Spotify Web API endpoints mixlink depends on, plus
//! one-way mirroring of collaborative playlists into real Spotify
//! playlists.
//!
//! Every call carries the bearer token held by the injected
//! [`AuthFlow`](mixlink_auth::AuthFlow); a 401 triggers one silent token
//! refresh and one retry.
//!
//! # Example
//!
//! ```ignore
//! use mixlink_spotify::SpotifyClient;
//!
//! let client = SpotifyClient::new(config, auth)?;
//! let user = client.get_current_user().await?;
//! let tracks = client.search_tracks("daft punk", 20).await?;
//! for track in &tracks {
//!     println!("{} - {}", track.name, track.to_draft().duration);
//! }
//! ```

mod client;
mod error;
mod mirror;
mod types;

// Re-export main types
pub use client::SpotifyClient;
pub use error::{ApiError, Result, SyncError};
pub use mirror::{mirror_playlist, push_song};
pub use types::{
    format_duration, ArtistRef, ExternalUrls, Paging, PlaylistSummary, PrivateUser,
    SearchResponse, SnapshotId, Track, TrackCount,
};
