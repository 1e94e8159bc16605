/// Voting domain types
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single vote direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    /// Upvote
    Up,
    /// Downvote
    Down,
}

impl Vote {
    /// Convert vote to string for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Up => "up",
            Vote::Down => "down",
        }
    }

    /// Parse vote from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Vote::Up),
            "down" => Some(Vote::Down),
            _ => None,
        }
    }
}

/// This client's vote history for one playlist.
///
/// At most one entry per song: the client's net contribution to a song is
/// one of up, down, or none. Persisted separately per playlist under a
/// derived key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteLedger {
    entries: HashMap<String, Vote>,
}

impl VoteLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// The vote currently recorded for a song, if any
    pub fn get(&self, song_id: &str) -> Option<Vote> {
        self.entries.get(song_id).copied()
    }

    /// Record a vote for a song, replacing any prior entry
    pub fn set(&mut self, song_id: impl Into<String>, vote: Vote) {
        self.entries.insert(song_id.into(), vote);
    }

    /// Remove the recorded vote for a song
    pub fn clear(&mut self, song_id: &str) {
        self.entries.remove(song_id);
    }

    /// Number of songs this client has voted on
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
