//! Collaborative playlist operations.

use crate::error::{Result, StoreError};
use chrono::Utc;
use mixlink_core::keys::{vote_ledger_key, KEY_PLAYLISTS};
use mixlink_core::types::{CollabPlaylist, PlaylistId, Song, SongDraft, SongOrder, Vote, VoteLedger};
use mixlink_core::{CoreError, KeyValueStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Store for collaborative playlists and this client's votes.
///
/// `origin` is the base used for share links (`{origin}/playlist/{id}`).
pub struct CollabStore {
    storage: Arc<dyn KeyValueStore>,
    origin: String,
}

impl CollabStore {
    /// Create a store over the given persistence port.
    pub fn new(storage: Arc<dyn KeyValueStore>, origin: impl Into<String>) -> Self {
        Self {
            storage,
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a new collaborative playlist.
    ///
    /// Fails with [`StoreError::InvalidName`] if the name is empty after
    /// trimming.
    pub async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        created_by: &str,
    ) -> Result<CollabPlaylist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidName);
        }

        let mut playlists = self.load_all().await?;
        let id = unique_id(&playlists);
        let playlist =
            CollabPlaylist::with_id(id, name, description.trim(), created_by, &self.origin);

        playlists.push(playlist.clone());
        self.save_all(&playlists).await?;

        info!(id = %playlist.id, name = %playlist.name, "Created collaborative playlist");
        Ok(playlist)
    }

    /// All playlists in creation order.
    pub async fn list_playlists(&self) -> Result<Vec<CollabPlaylist>> {
        self.load_all().await
    }

    /// Resolve a playlist from its id or any substring of its share link.
    ///
    /// The loose matching is deliberate: visitors arrive with a pasted
    /// share link, a path fragment, or the bare id.
    pub async fn find_playlist(&self, identifier: &str) -> Result<CollabPlaylist> {
        let playlists = self.load_all().await?;
        playlists
            .into_iter()
            .find(|p| p.matches(identifier))
            .ok_or_else(|| StoreError::NotFound(identifier.to_string()))
    }

    /// Append a song to a playlist on behalf of `added_by`.
    ///
    /// Stamps attribution and zeroed vote counts, then rewrites the whole
    /// collection.
    pub async fn append_song(
        &self,
        identifier: &str,
        draft: SongDraft,
        added_by: &str,
    ) -> Result<CollabPlaylist> {
        let mut playlists = self.load_all().await?;
        let playlist = playlists
            .iter_mut()
            .find(|p| p.matches(identifier))
            .ok_or_else(|| StoreError::NotFound(identifier.to_string()))?;

        let song = draft.into_song(added_by);
        debug!(playlist = %playlist.id, song = %song.id, "Appending song");
        playlist.songs.push(song);
        let updated = playlist.clone();

        self.save_all(&playlists).await?;
        Ok(updated)
    }

    /// Cast this client's vote on a song.
    ///
    /// Repeating the previous vote toggles it off. The prior tally bucket
    /// is decremented (floored at zero) and the new one incremented; the
    /// playlist collection and the per-playlist vote ledger are persisted
    /// together.
    pub async fn vote(&self, identifier: &str, song_id: &str, vote: Vote) -> Result<CollabPlaylist> {
        let mut playlists = self.load_all().await?;
        let playlist = playlists
            .iter_mut()
            .find(|p| p.matches(identifier))
            .ok_or_else(|| StoreError::NotFound(identifier.to_string()))?;

        let ledger_key = vote_ledger_key(playlist.id.as_str());
        let mut ledger = self.load_ledger(&ledger_key).await?;
        let previous = ledger.get(song_id);

        let song = playlist
            .songs
            .iter_mut()
            .find(|s| s.id == song_id)
            .ok_or_else(|| StoreError::NotFound(song_id.to_string()))?;

        match previous {
            Some(Vote::Up) => song.upvotes = song.upvotes.saturating_sub(1),
            Some(Vote::Down) => song.downvotes = song.downvotes.saturating_sub(1),
            None => {}
        }

        // Same vote twice toggles off; otherwise the new direction wins.
        let next = if previous == Some(vote) { None } else { Some(vote) };
        match next {
            Some(Vote::Up) => {
                song.upvotes += 1;
                ledger.set(song_id, Vote::Up);
            }
            Some(Vote::Down) => {
                song.downvotes += 1;
                ledger.set(song_id, Vote::Down);
            }
            None => ledger.clear(song_id),
        }

        debug!(
            playlist = %playlist.id,
            song = %song_id,
            previous = ?previous,
            next = ?next,
            "Vote applied"
        );

        let updated = playlist.clone();
        self.save_all(&playlists).await?;
        self.save_ledger(&ledger_key, &ledger).await?;
        Ok(updated)
    }

    /// This client's recorded vote for a song, if any.
    pub async fn song_vote(&self, identifier: &str, song_id: &str) -> Result<Option<Vote>> {
        let playlist = self.find_playlist(identifier).await?;
        let ledger = self
            .load_ledger(&vote_ledger_key(playlist.id.as_str()))
            .await?;
        Ok(ledger.get(song_id))
    }

    /// Record the remote playlist id after mirroring.
    pub async fn set_spotify_id(
        &self,
        identifier: &str,
        spotify_id: &str,
    ) -> Result<CollabPlaylist> {
        let mut playlists = self.load_all().await?;
        let playlist = playlists
            .iter_mut()
            .find(|p| p.matches(identifier))
            .ok_or_else(|| StoreError::NotFound(identifier.to_string()))?;

        playlist.spotify_id = Some(spotify_id.to_string());
        let updated = playlist.clone();
        self.save_all(&playlists).await?;
        Ok(updated)
    }

    async fn load_all(&self) -> Result<Vec<CollabPlaylist>> {
        match self.storage.get(KEY_PLAYLISTS).await? {
            Some(raw) => Ok(serde_json::from_str(&raw).map_err(CoreError::Serialization)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save_all(&self, playlists: &[CollabPlaylist]) -> Result<()> {
        let raw = serde_json::to_string(playlists).map_err(CoreError::Serialization)?;
        self.storage.put(KEY_PLAYLISTS, &raw).await?;
        Ok(())
    }

    async fn load_ledger(&self, key: &str) -> Result<VoteLedger> {
        match self.storage.get(key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw).map_err(CoreError::Serialization)?),
            None => Ok(VoteLedger::new()),
        }
    }

    async fn save_ledger(&self, key: &str, ledger: &VoteLedger) -> Result<()> {
        let raw = serde_json::to_string(ledger).map_err(CoreError::Serialization)?;
        self.storage.put(key, &raw).await?;
        Ok(())
    }
}

/// Sort songs without mutating the playlist.
///
/// `Newest`/`Oldest` order by the time the song was added; `Votes` orders
/// by net score descending. All orders are stable, so ties keep insertion
/// order.
pub fn sort_songs(songs: &[Song], order: SongOrder) -> Vec<Song> {
    let mut sorted = songs.to_vec();
    match order {
        SongOrder::Newest => sorted.sort_by(|a, b| b.added_at.cmp(&a.added_at)),
        SongOrder::Oldest => sorted.sort_by(|a, b| a.added_at.cmp(&b.added_at)),
        SongOrder::Votes => sorted.sort_by(|a, b| b.score().cmp(&a.score())),
    }
    sorted
}

// Time-derived ids collide when two playlists are created within the same
// millisecond; bump until free.
fn unique_id(existing: &[CollabPlaylist]) -> PlaylistId {
    let mut candidate = PlaylistId::generate();
    while existing.iter().any(|p| p.id == candidate) {
        let next = candidate
            .as_str()
            .parse::<i64>()
            .map(|n| n + 1)
            .unwrap_or_else(|_| Utc::now().timestamp_millis());
        candidate = PlaylistId::new(next.to_string());
    }
    candidate
}
