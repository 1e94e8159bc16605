/// Collaborative playlist domain types
use crate::types::PlaylistId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A playlist anyone holding the share link may add songs to.
///
/// The share link embeds the playlist id and is the sole access-control
/// mechanism: possession of the link grants contribution rights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollabPlaylist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Playlist description
    pub description: String,

    /// Display name of the creator
    pub created_by: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Link that resolves back to this playlist
    pub share_link: String,

    /// Remote playlist id once mirrored to the provider
    #[serde(default)]
    pub spotify_id: Option<String>,

    /// Songs in insertion order
    pub songs: Vec<Song>,
}

impl CollabPlaylist {
    /// Create a new empty playlist with a generated id and share link
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        created_by: impl Into<String>,
        origin: &str,
    ) -> Self {
        let id = PlaylistId::generate();
        Self::with_id(id, name, description, created_by, origin)
    }

    /// Create a playlist with a specific id (the share link is derived from it)
    pub fn with_id(
        id: PlaylistId,
        name: impl Into<String>,
        description: impl Into<String>,
        created_by: impl Into<String>,
        origin: &str,
    ) -> Self {
        let share_link = format!("{}/playlist/{}", origin.trim_end_matches('/'), id);
        Self {
            id,
            name: name.into(),
            description: description.into(),
            created_by: created_by.into(),
            created_at: Utc::now(),
            share_link,
            spotify_id: None,
            songs: Vec::new(),
        }
    }

    /// Whether `identifier` names this playlist: either the exact id or any
    /// substring of the share link.
    pub fn matches(&self, identifier: &str) -> bool {
        self.id.as_str() == identifier || self.share_link.contains(identifier)
    }

    /// Find a song by its provider track id
    pub fn song(&self, song_id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == song_id)
    }
}

/// A song in a collaborative playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Provider track id
    pub id: String,

    /// Track title
    pub title: String,

    /// Comma-joined artist names
    pub artist: String,

    /// Human-readable duration label (`m:ss`)
    pub duration: String,

    /// Provider track URI (used when mirroring)
    pub uri: String,

    /// Public web URL for the track, when available
    #[serde(default)]
    pub external_url: Option<String>,

    /// Display name of the contributor
    pub added_by: String,

    /// When the song was appended
    pub added_at: DateTime<Utc>,

    /// Upvote tally, never below zero
    #[serde(default)]
    pub upvotes: u32,

    /// Downvote tally, never below zero
    #[serde(default)]
    pub downvotes: u32,
}

impl Song {
    /// Net score: upvotes minus downvotes
    pub fn score(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }
}

/// A search result ready to be appended to a playlist.
///
/// Contributor attribution and vote counts are stamped at append time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDraft {
    /// Provider track id
    pub id: String,
    /// Track title
    pub title: String,
    /// Comma-joined artist names
    pub artist: String,
    /// Human-readable duration label
    pub duration: String,
    /// Provider track URI
    pub uri: String,
    /// Public web URL for the track, when available
    pub external_url: Option<String>,
}

impl SongDraft {
    /// Stamp the draft into a [`Song`] attributed to `added_by`
    pub fn into_song(self, added_by: impl Into<String>) -> Song {
        Song {
            id: self.id,
            title: self.title,
            artist: self.artist,
            duration: self.duration,
            uri: self.uri,
            external_url: self.external_url,
            added_by: added_by.into(),
            added_at: Utc::now(),
            upvotes: 0,
            downvotes: 0,
        }
    }
}

/// Sort orders for a playlist's songs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SongOrder {
    /// Most recently added first
    Newest,
    /// Oldest first
    Oldest,
    /// Highest net score first
    Votes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_link_embeds_id() {
        let playlist = CollabPlaylist::new("Road Trip", "", "Alice", "https://mixlink.example");
        assert!(playlist.share_link.contains(playlist.id.as_str()));
        assert!(playlist.share_link.starts_with("https://mixlink.example/playlist/"));
    }

    #[test]
    fn matches_by_id_and_link_substring() {
        let playlist = CollabPlaylist::with_id(
            PlaylistId::new("1712345"),
            "Road Trip",
            "",
            "Alice",
            "https://mixlink.example",
        );
        assert!(playlist.matches("1712345"));
        assert!(playlist.matches("playlist/1712345"));
        assert!(playlist.matches(&playlist.share_link));
        assert!(!playlist.matches("9999999"));
    }

    #[test]
    fn draft_stamp_initializes_votes() {
        let draft = SongDraft {
            id: "track1".into(),
            title: "Song".into(),
            artist: "Artist".into(),
            duration: "3:05".into(),
            uri: "spotify:track:track1".into(),
            external_url: None,
        };
        let song = draft.into_song("Bob");
        assert_eq!(song.added_by, "Bob");
        assert_eq!(song.upvotes, 0);
        assert_eq!(song.downvotes, 0);
        assert_eq!(song.score(), 0);
    }
}
