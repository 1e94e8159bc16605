//! Key-value persistence port
//!
//! The browser original kept all client state in origin-scoped local
//! storage. This module abstracts that medium behind the [`KeyValueStore`]
//! trait so business logic stays independent of where the bytes live:
//! [`MemoryStore`] backs tests, [`FileStore`] is the durable production
//! implementation, and a server-backed store could satisfy the same
//! interface later.
//!
//! Note that the port is deliberately a flat string map with no transaction
//! boundary. Collections stored under a single key are read, mutated, and
//! rewritten as a whole; concurrent writers race and the later write wins.

use crate::error::{CoreError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Abstract key-value persistence
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`, if any
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store used by tests and short-lived sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Durable store persisting the whole map as one JSON file.
///
/// Mirrors the granularity of the browser storage it replaces: one flat
/// string map per origin, rewritten in full on every mutation. A mutex
/// serializes writers within this process; writers in other processes
/// still race at the file level.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by the JSON file at `path`.
    ///
    /// The file is created on first write; a missing file reads as empty.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<HashMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(CoreError::Io(e)),
        }
    }

    async fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let contents = serde_json::to_string_pretty(entries)?;
        // Write-then-rename: readers only ever see a complete file.
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, contents).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        debug!(path = %self.path.display(), entries = entries.len(), "Persisted store");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load().await?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}
