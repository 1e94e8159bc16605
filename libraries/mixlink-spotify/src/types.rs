//! Wire types for the Web API endpoints mixlink uses.

use mixlink_core::types::SongDraft;
use serde::Deserialize;

/// The authenticated user's profile
#[derive(Debug, Clone, Deserialize)]
pub struct PrivateUser {
    /// Spotify user id
    pub id: String,
    /// Display name, when set
    #[serde(default)]
    pub display_name: Option<String>,
    /// Email, when the scope grants it
    #[serde(default)]
    pub email: Option<String>,
}

impl PrivateUser {
    /// Display name falling back to the user id
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Spotify's paging envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total items across all pages
    #[serde(default)]
    pub total: Option<u32>,
}

/// Track count inside a playlist summary
#[derive(Debug, Clone, Deserialize)]
pub struct TrackCount {
    /// Number of tracks in the playlist
    pub total: u32,
}

/// A playlist as listed by `/me/playlists` or returned on creation
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSummary {
    /// Spotify playlist id
    pub id: String,
    /// Playlist name
    pub name: String,
    /// Playlist description
    #[serde(default)]
    pub description: Option<String>,
    /// Track count envelope
    #[serde(default)]
    pub tracks: Option<TrackCount>,
}

/// Artist reference on a track
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    /// Artist name
    pub name: String,
}

/// External URLs attached to a track
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    /// Public open.spotify.com URL
    #[serde(default)]
    pub spotify: Option<String>,
}

/// A track from search results
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    /// Spotify track id
    pub id: String,
    /// Track title
    pub name: String,
    /// Artists on the track
    pub artists: Vec<ArtistRef>,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Spotify URI (`spotify:track:...`)
    pub uri: String,
    /// External URLs
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl Track {
    /// Convert to the draft shape appended to collaborative playlists.
    pub fn to_draft(&self) -> SongDraft {
        SongDraft {
            id: self.id.clone(),
            title: self.name.clone(),
            artist: self
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            duration: format_duration(self.duration_ms),
            uri: self.uri.clone(),
            external_url: self.external_urls.spotify.clone(),
        }
    }
}

/// `/search` response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Matching tracks
    pub tracks: Paging<Track>,
}

/// Response from adding tracks to a playlist
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotId {
    /// Playlist snapshot after the mutation
    pub snapshot_id: String,
}

/// Render a millisecond duration as the `m:ss` label shown next to songs.
pub fn format_duration(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{minutes}:{seconds:02}")
}
