pub mod config;
pub mod db;
pub mod download;
pub mod firestore;
pub mod listing;
pub mod mapping;
pub mod media;
pub mod remote;
pub mod saved;
pub mod storage;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::download::{DownloadProgress, DownloadResult};
    pub use crate::listing::{filter, shuffle};
    pub use crate::media::Gateway;
    pub use crate::remote::{FeedQuery, FeedSource};
    pub use crate::storage::KeyValueStore;
    pub use crate::types::{MediaItem, SavedItem};
    pub use crate::Feed;
}

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::db::Database;
use crate::download::{download_to, DownloadProgress, DownloadResult};
use crate::firestore::FirestoreClient;
use crate::media::Gateway;
use crate::remote::{FeedSource, RemoteFeed};
use crate::saved::SavedItems;
use crate::storage::KeyValueStore;
use crate::types::MediaItem;

/// Library entry point. Owns the remote feed, the saved-items store and the gateway.
/// Build one at startup and hand references to whatever needs it.
pub struct Feed<S = FirestoreClient, K = Database> {
    config: Config,
    remote: RemoteFeed<S>,
    saved: SavedItems<K>,
    gateway: Gateway,
    http: reqwest::Client,
}

impl Feed {
    /// Connect to the local database (running migrations) and the configured Firestore project.
    pub async fn connect(config: Config) -> Result<Self> {
        let db = Database::connect(config.database_url.as_deref()).await?;
        db.run_migrations().await?;
        let source = FirestoreClient::new(&config)?;
        Self::from_parts(config, source, db)
    }
}

impl<S: FeedSource, K: KeyValueStore> Feed<S, K> {
    pub fn from_parts(config: Config, source: S, store: K) -> Result<Self> {
        // no overall timeout: videos can take a while
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .context("building http client")?;
        Ok(Self {
            gateway: Gateway::from_config(&config),
            remote: RemoteFeed::new(source),
            saved: SavedItems::with_key(store, config.saved_key.clone()),
            config,
            http,
        })
    }

    pub fn config(&self) -> &Config { &self.config }
    pub fn gateway(&self) -> &Gateway { &self.gateway }
    pub fn saved(&self) -> &SavedItems<K> { &self.saved }
    pub fn remote(&self) -> &RemoteFeed<S> { &self.remote }

    /// Newest items, optionally restricted to a category. `None` limit uses the configured default.
    pub async fn latest(&self, limit: Option<usize>, category: Option<&str>) -> Vec<MediaItem> {
        self.remote.fetch_items(limit.unwrap_or(self.config.default_limit), category).await
    }

    /// Latest items in random order.
    pub async fn trending(&self, limit: Option<usize>) -> Vec<MediaItem> {
        listing::shuffle(&self.latest(limit, None).await)
    }

    /// Trending items narrowed by a search query.
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Vec<MediaItem> {
        listing::filter(&self.trending(limit).await, Some(query))
    }

    /// Look an item up among the newest `window` items, then among saved items.
    pub async fn find_item(&self, id: &str, window: usize) -> Option<MediaItem> {
        if let Some(found) = self.remote.fetch_items(window, None).await.into_iter().find(|m| m.id == id) {
            return Some(found);
        }
        self.saved.list().await.into_iter().find(|m| m.id == id)
    }

    /// Bookmark the item with `id`, fetched from the newest `window` items.
    pub async fn save_by_id(&self, id: &str, window: usize) -> Result<bool> {
        let item = self
            .remote
            .fetch_items(window, None)
            .await
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| anyhow!("no item {id} among the {window} newest"))?;
        Ok(self.saved.save(&item).await)
    }

    pub fn media_url(&self, item: &MediaItem) -> Option<String> {
        self.gateway.resolve_media_url(item.video_hash.as_deref())
    }

    pub fn thumbnail_url(&self, item: &MediaItem) -> String {
        self.gateway.resolve_thumbnail_url(item.video_hash.as_deref(), item)
    }

    /// Download an item's video into `dir` as `fna-video-<id>.mp4`.
    pub async fn download<F>(&self, item: &MediaItem, dir: &Path, on_progress: F) -> Result<DownloadResult>
    where
        F: FnMut(&DownloadProgress),
    {
        let url = self
            .media_url(item)
            .ok_or_else(|| anyhow!("item {} has no video hash", item.id))?;
        let dest = dir.join(item.download_file_name());
        download_to(&self.http, &url, &dest, on_progress).await
    }
}
