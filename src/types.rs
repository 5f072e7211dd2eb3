use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One piece of user-submitted video content as returned by the remote store.
///
/// Only `id` is guaranteed; every other field is routinely absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Space-delimited `#label` tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_hash: Option<String>,
}

/// A locally bookmarked snapshot of a [`MediaItem`].
pub type SavedItem = MediaItem;

impl MediaItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), caption: None, overview: None, tag: None, timestamp: None, uploader: None, video_hash: None }
    }

    /// Whitespace-split tag tokens, empty when the item has no tag.
    pub fn tags(&self) -> Vec<&str> {
        self.tag.as_deref().map(|t| t.split_whitespace().collect()).unwrap_or_default()
    }

    pub fn uploader_or_default(&self) -> &str {
        match self.uploader.as_deref() {
            Some(u) if !u.trim().is_empty() => u,
            _ => "Anonymous",
        }
    }

    /// Long en-US date such as `March 5, 2024`; empty without a timestamp.
    pub fn formatted_date(&self) -> String {
        self.timestamp.map(|ts| ts.format("%B %-d, %Y").to_string()).unwrap_or_default()
    }

    pub fn download_file_name(&self) -> String {
        format!("fna-video-{}.mp4", self.id)
    }
}

// Saved lists written by older clients hold timestamps as RFC 3339 strings,
// `{seconds, nanoseconds}` objects or epoch milliseconds. Anything else is dropped.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(timestamp_from_json))
}

pub(crate) fn timestamp_from_json(v: &serde_json::Value) -> Option<DateTime<Utc>> {
    use serde_json::Value;
    match v {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::Object(map) => {
            let secs = map.get("seconds").or_else(|| map.get("_seconds"))?.as_i64()?;
            let nanos = match map.get("nanoseconds").or_else(|| map.get("_nanoseconds")) {
                Some(n) => u32::try_from(n.as_u64()?).ok()?,
                None => 0,
            };
            Utc.timestamp_opt(secs, nanos).single()
        }
        _ => None,
    }
}

pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim()).ok().map(|dt| dt.with_timezone(&Utc))
}
