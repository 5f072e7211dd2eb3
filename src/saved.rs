//! Saved (bookmarked) items persisted as one JSON array under a single key.
//!
//! Every mutation rereads and rewrites the whole array. Malformed data reads
//! as an empty list. A failed store read lists as empty and makes mutations
//! return false without writing; nothing here returns an error.

use anyhow::{Context, Result};

use crate::storage::KeyValueStore;
use crate::types::{MediaItem, SavedItem};

pub const DEFAULT_SAVED_KEY: &str = "savedVideos";

pub struct SavedItems<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SavedItems<S> {
    pub fn new(store: S) -> Self { Self::with_key(store, DEFAULT_SAVED_KEY) }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    /// All saved items in insertion order.
    pub async fn list(&self) -> Vec<SavedItem> {
        match self.read().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %format!("{e:#}"), "saved items unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    pub async fn is_saved(&self, id: &str) -> bool {
        self.list().await.iter().any(|s| s.id == id)
    }

    /// Appends a snapshot of `item`. Returns false when the id is already saved.
    pub async fn save(&self, item: &MediaItem) -> bool {
        let Some(mut items) = self.read_for_update().await else { return false };
        if items.iter().any(|s| s.id == item.id) {
            tracing::debug!(id = %item.id, "already saved");
            return false;
        }
        items.push(item.clone());
        match self.write(&items).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(id = %item.id, error = %format!("{e:#}"), "failed to persist saved item");
                false
            }
        }
    }

    /// Removes every entry with `id`. Succeeds whether or not one existed.
    pub async fn unsave(&self, id: &str) -> bool {
        let Some(mut items) = self.read_for_update().await else { return false };
        items.retain(|s| s.id != id);
        match self.write(&items).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(%id, error = %format!("{e:#}"), "failed to persist saved items after removal");
                false
            }
        }
    }

    pub async fn clear(&self) -> bool {
        match self.store.delete(&self.key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = %self.key, error = %format!("{e:#}"), "failed to clear saved items");
                false
            }
        }
    }

    // Err only when the store itself fails; undecodable payloads read as empty.
    async fn read(&self) -> Result<Vec<SavedItem>> {
        let Some(payload) = self.store.get(&self.key).await.context("reading saved items")? else {
            return Ok(Vec::new());
        };
        if payload.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&payload) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "saved items malformed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    // A failed read must not be written back as an empty list.
    async fn read_for_update(&self) -> Option<Vec<SavedItem>> {
        match self.read().await {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::error!(key = %self.key, error = %format!("{e:#}"), "saved items unreadable, leaving them untouched");
                None
            }
        }
    }

    async fn write(&self, items: &[SavedItem]) -> Result<()> {
        let payload = serde_json::to_string(items)?;
        self.store.put(&self.key, &payload).await.context("writing saved items")
    }
}
