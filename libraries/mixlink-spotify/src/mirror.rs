//! One-way mirroring of collaborative playlists into real Spotify playlists.

use crate::client::SpotifyClient;
use crate::error::SyncError;
use mixlink_core::types::{CollabPlaylist, Song};
use mixlink_store::CollabStore;
use tracing::{info, warn};

/// Mirror a collaborative playlist to the provider.
///
/// Creates the remote playlist, records its id locally, then pushes the
/// current song URIs. The remote id is recorded before the track push, so
/// on [`SyncError::TrackAddFailed`] the mirrored playlist exists but may be
/// empty; the caller can retry the push.
pub async fn mirror_playlist(
    store: &CollabStore,
    client: &SpotifyClient,
    identifier: &str,
) -> Result<CollabPlaylist, SyncError> {
    let playlist = store.find_playlist(identifier).await?;

    let remote = client
        .create_playlist(&playlist.name, &playlist.description, true)
        .await
        .map_err(SyncError::RemoteCreateFailed)?;
    info!(playlist = %playlist.id, remote = %remote.id, "Created remote playlist");

    let updated = store.set_spotify_id(identifier, &remote.id).await?;

    let uris: Vec<String> = playlist.songs.iter().map(|s| s.uri.clone()).collect();
    if !uris.is_empty() {
        client
            .add_tracks_to_playlist(&remote.id, &uris)
            .await
            .map_err(SyncError::TrackAddFailed)?;
        info!(remote = %remote.id, tracks = uris.len(), "Pushed tracks to remote playlist");
    }

    Ok(updated)
}

/// Push one newly appended song to an already-mirrored playlist.
///
/// No-op when the playlist has no remote mirror. Local state is already
/// persisted by the time this runs, so a failure here leaves the local
/// append intact.
pub async fn push_song(
    client: &SpotifyClient,
    playlist: &CollabPlaylist,
    song: &Song,
) -> Result<(), SyncError> {
    let Some(remote_id) = playlist.spotify_id.as_deref() else {
        return Ok(());
    };

    match client
        .add_tracks_to_playlist(remote_id, &[song.uri.clone()])
        .await
    {
        Ok(_) => Ok(()),
        Err(e) => {
            warn!(remote = %remote_id, song = %song.id, error = %e, "Failed to sync song to remote playlist");
            Err(SyncError::TrackAddFailed(e))
        }
    }
}
