//! Domain types for mixlink

mod ids;
mod playlist;
mod theme;
mod vote;

pub use ids::PlaylistId;
pub use playlist::{CollabPlaylist, Song, SongDraft, SongOrder};
pub use theme::Theme;
pub use vote::{Vote, VoteLedger};
