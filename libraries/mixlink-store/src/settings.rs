//! User settings
//!
//! Persistent preferences stored as JSON values in the key-value port.
//! Currently just the theme.

use crate::error::Result;
use mixlink_core::keys::KEY_THEME;
use mixlink_core::types::Theme;
use mixlink_core::{CoreError, KeyValueStore};

/// Get the persisted theme preference, defaulting to dark.
pub async fn get_theme(storage: &dyn KeyValueStore) -> Result<Theme> {
    match storage.get(KEY_THEME).await? {
        Some(raw) => Ok(serde_json::from_str(&raw).map_err(CoreError::Serialization)?),
        None => Ok(Theme::default()),
    }
}

/// Persist the theme preference.
pub async fn set_theme(storage: &dyn KeyValueStore, theme: Theme) -> Result<()> {
    let raw = serde_json::to_string(&theme).map_err(CoreError::Serialization)?;
    storage.put(KEY_THEME, &raw).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixlink_core::MemoryStore;

    #[tokio::test]
    async fn theme_defaults_to_dark() {
        let storage = MemoryStore::new();
        assert_eq!(get_theme(&storage).await.unwrap(), Theme::Dark);
    }

    #[tokio::test]
    async fn theme_round_trips() {
        let storage = MemoryStore::new();
        set_theme(&storage, Theme::Light).await.unwrap();
        assert_eq!(get_theme(&storage).await.unwrap(), Theme::Light);
    }
}
