//! Well-known keys for the persisted state layout
//!
//! Every piece of client state lives under one of these keys in the
//! injected [`KeyValueStore`](crate::kv::KeyValueStore). Values are
//! JSON-encoded except the token and verifier strings, which are stored raw.

/// OAuth access token (raw string)
pub const KEY_ACCESS_TOKEN: &str = "auth.access_token";

/// OAuth refresh token (raw string)
pub const KEY_REFRESH_TOKEN: &str = "auth.refresh_token";

/// Marker that a login callback completed (raw string)
pub const KEY_AUTH_CODE: &str = "auth.code";

/// PKCE code verifier, transient between login start and callback (raw string)
pub const KEY_CODE_VERIFIER: &str = "auth.code_verifier";

/// Collaborative playlist collection (JSON array of `CollabPlaylist`)
pub const KEY_PLAYLISTS: &str = "collab.playlists";

/// UI theme preference (JSON string, "dark" or "light")
pub const KEY_THEME: &str = "ui.theme";

/// Per-playlist vote ledger key (JSON object mapping song id to vote)
pub fn vote_ledger_key(playlist_id: &str) -> String {
    format!("collab.votes.{playlist_id}")
}
