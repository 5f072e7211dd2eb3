use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::mapping::{items_from_rows, structured_query, RunQueryRow};
use crate::remote::{FeedQuery, FeedSource};
use crate::types::MediaItem;

/// Read-only client for the Firestore REST `runQuery` endpoint.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    http: reqwest::Client,
    endpoint: Url,
    collection: String,
    category_field: String,
}

impl FirestoreClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .context("building http client")?;
        Self::with_client(http, config)
    }

    pub fn with_client(http: reqwest::Client, config: &Config) -> Result<Self> {
        let endpoint = run_query_url(&config.firestore_base_url, &config.project_id, config.api_key.as_deref())?;
        Ok(Self {
            http,
            endpoint,
            collection: config.collection.clone(),
            category_field: config.category_field.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url { &self.endpoint }
}

fn run_query_url(base: &str, project_id: &str, api_key: Option<&str>) -> Result<Url> {
    let raw = format!(
        "{}/v1/projects/{}/databases/(default)/documents:runQuery",
        base.trim_end_matches('/'),
        project_id
    );
    let mut url = Url::parse(&raw).with_context(|| format!("invalid firestore url: {raw}"))?;
    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        url.query_pairs_mut().append_pair("key", key);
    }
    Ok(url)
}

#[async_trait]
impl FeedSource for FirestoreClient {
    async fn query(&self, q: &FeedQuery) -> Result<Vec<MediaItem>> {
        let body = structured_query(&self.collection, &self.category_field, q.limit, q.category.as_deref());
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .context("sending runQuery request")?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("runQuery failed with {status}: {}", text.trim()));
        }
        let rows: Vec<RunQueryRow> = resp.json().await.context("decoding runQuery response")?;
        Ok(items_from_rows(rows))
    }
}
