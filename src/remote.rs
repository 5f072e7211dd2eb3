use anyhow::Result;
use async_trait::async_trait;

use crate::types::MediaItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub limit: usize,
    pub category: Option<String>,
}

/// A remote collection of media items, newest first.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn query(&self, q: &FeedQuery) -> Result<Vec<MediaItem>>;
}

/// Boundary over a [`FeedSource`]: failures are logged and become empty results.
pub struct RemoteFeed<S> {
    source: S,
}

impl<S: FeedSource> RemoteFeed<S> {
    pub fn new(source: S) -> Self { Self { source } }

    pub fn source(&self) -> &S { &self.source }

    pub async fn fetch_items(&self, limit: usize, category: Option<&str>) -> Vec<MediaItem> {
        if limit == 0 {
            return Vec::new();
        }
        let q = FeedQuery { limit, category: category.filter(|c| !c.is_empty()).map(str::to_string) };
        match self.source.query(&q).await {
            Ok(mut items) => {
                items.truncate(limit);
                tracing::debug!(count = items.len(), limit, category = ?q.category, "fetched items");
                items
            }
            Err(e) => {
                tracing::error!(limit, category = ?q.category, error = %format!("{e:#}"), "error fetching videos");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::Mutex;

    struct Recording {
        seen: Mutex<Vec<FeedQuery>>,
        fail: bool,
        count: usize,
    }

    #[async_trait]
    impl FeedSource for Recording {
        async fn query(&self, q: &FeedQuery) -> Result<Vec<MediaItem>> {
            self.seen.lock().unwrap().push(q.clone());
            if self.fail {
                return Err(anyhow!("connection reset"));
            }
            Ok((0..self.count).map(|i| MediaItem::new(format!("v{i}"))).collect())
        }
    }

    fn source(fail: bool, count: usize) -> Recording {
        Recording { seen: Mutex::new(Vec::new()), fail, count }
    }

    #[tokio::test]
    async fn failure_becomes_empty() {
        let feed = RemoteFeed::new(source(true, 3));
        assert!(feed.fetch_items(6, None).await.is_empty());
    }

    #[tokio::test]
    async fn passes_limit_and_category() {
        let feed = RemoteFeed::new(source(false, 2));
        let items = feed.fetch_items(6, Some("climate")).await;
        assert_eq!(items.len(), 2);
        let seen = feed.source().seen.lock().unwrap();
        assert_eq!(seen[0], FeedQuery { limit: 6, category: Some("climate".into()) });
    }

    #[tokio::test]
    async fn empty_category_means_unfiltered() {
        let feed = RemoteFeed::new(source(false, 1));
        feed.fetch_items(6, Some("")).await;
        assert_eq!(feed.source().seen.lock().unwrap()[0].category, None);
    }

    #[tokio::test]
    async fn never_returns_more_than_limit() {
        let feed = RemoteFeed::new(source(false, 10));
        assert_eq!(feed.fetch_items(4, None).await.len(), 4);
    }

    #[tokio::test]
    async fn zero_limit_skips_the_call() {
        let feed = RemoteFeed::new(source(false, 10));
        assert!(feed.fetch_items(0, None).await.is_empty());
        assert!(feed.source().seen.lock().unwrap().is_empty());
    }
}
