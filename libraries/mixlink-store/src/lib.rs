//! mixlink Store
//!
//! The collaborative playlist store: create playlists, resolve them from
//! share links, append songs, and tally votes, all over the injected
//! key-value persistence port.
//!
//! The whole playlist collection is read, mutated, and rewritten on every
//! mutation, matching the storage medium it models. Two writers working
//! from the same snapshot therefore race and the later write wins; see the
//! `lost_update` test for the documented behavior.
//!
//! # Example
//!
//! ```rust
//! use mixlink_core::MemoryStore;
//! use mixlink_store::CollabStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), mixlink_store::StoreError> {
//! let store = CollabStore::new(Arc::new(MemoryStore::new()), "https://mixlink.example");
//! let playlist = store.create_playlist("Road Trip", "Summer songs", "Alice").await?;
//! let found = store.find_playlist(playlist.id.as_str()).await?;
//! assert_eq!(found.name, "Road Trip");
//! # Ok(())
//! # }
//! ```

mod error;
pub mod settings;
mod store;

pub use error::{Result, StoreError};
pub use store::{sort_songs, CollabStore};
