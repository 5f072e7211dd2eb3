//! Firestore REST wire shapes and their mapping onto [`MediaItem`].

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::{parse_timestamp, MediaItem};

/// One row of a `documents:runQuery` response. Rows without `document`
/// only carry progress info (`readTime`, `skippedResults`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunQueryRow {
    #[serde(default)]
    pub document: Option<Document>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Document {
    /// `projects/{p}/databases/{d}/documents/{collection}/{id}`
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

pub(crate) fn items_from_rows(rows: Vec<RunQueryRow>) -> Vec<MediaItem> {
    rows.into_iter().filter_map(|r| r.document).map(|d| item_from_document(&d)).collect()
}

pub(crate) fn item_from_document(doc: &Document) -> MediaItem {
    let f = &doc.fields;
    MediaItem {
        id: document_id(&doc.name).to_string(),
        caption: string_field(f, "caption"),
        overview: string_field(f, "overview"),
        tag: string_field(f, "tag"),
        timestamp: f.get("timestamp").and_then(timestamp_value),
        uploader: string_field(f, "uploader"),
        video_hash: string_field(f, "videoHash"),
    }
}

fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    scalar_text(fields.get(name)?)
}

fn scalar_text(v: &Value) -> Option<String> {
    if let Some(s) = v.get("stringValue").and_then(Value::as_str) {
        return Some(s.to_string());
    }
    // integers arrive as decimal strings
    if let Some(s) = v.get("integerValue").and_then(Value::as_str) {
        return Some(s.to_string());
    }
    if let Some(d) = v.get("doubleValue").and_then(Value::as_f64) {
        return Some(d.to_string());
    }
    if let Some(b) = v.get("booleanValue").and_then(Value::as_bool) {
        return Some(b.to_string());
    }
    // arrays (e.g. tags stored as a list) flatten to space-separated text
    let values = v.get("arrayValue")?.get("values").and_then(Value::as_array)?;
    let parts: Vec<String> = values.iter().filter_map(scalar_text).collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn timestamp_value(v: &Value) -> Option<chrono::DateTime<chrono::Utc>> {
    if let Some(s) = v.get("timestampValue").and_then(Value::as_str) {
        return parse_timestamp(s);
    }
    v.get("stringValue").and_then(Value::as_str).and_then(parse_timestamp)
}

/// Build the `structuredQuery` body for a newest-first listing.
pub(crate) fn structured_query(collection: &str, category_field: &str, limit: usize, category: Option<&str>) -> Value {
    let mut q = serde_json::json!({
        "from": [{ "collectionId": collection }],
        "orderBy": [{ "field": { "fieldPath": "timestamp" }, "direction": "DESCENDING" }],
        "limit": limit,
    });
    if let Some(cat) = category {
        q["where"] = serde_json::json!({
            "fieldFilter": {
                "field": { "fieldPath": category_field },
                "op": "ARRAY_CONTAINS",
                "value": { "stringValue": cat },
            }
        });
    }
    serde_json::json!({ "structuredQuery": q })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(v: Value) -> Vec<RunQueryRow> { serde_json::from_value(v).unwrap() }

    #[test]
    fn decodes_documents_and_skips_progress_rows() {
        let r = rows(json!([
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/videos/abc123",
                    "fields": {
                        "caption": { "stringValue": "Climate News" },
                        "overview": { "stringValue": "Weather" },
                        "tag": { "stringValue": "#news #climate" },
                        "timestamp": { "timestampValue": "2024-03-05T10:15:00.123456Z" },
                        "uploader": { "stringValue": "FNA Team" },
                        "videoHash": { "stringValue": "ipfs/QmHash" },
                        "categories": { "arrayValue": { "values": [{ "stringValue": "climate" }] } }
                    },
                    "createTime": "2024-03-05T10:15:00Z",
                    "updateTime": "2024-03-05T10:15:00Z"
                },
                "readTime": "2024-03-06T00:00:00Z"
            },
            { "readTime": "2024-03-06T00:00:00Z", "skippedResults": 0 }
        ]));
        let items = items_from_rows(r);
        assert_eq!(items.len(), 1);
        let it = &items[0];
        assert_eq!(it.id, "abc123");
        assert_eq!(it.caption.as_deref(), Some("Climate News"));
        assert_eq!(it.tag.as_deref(), Some("#news #climate"));
        assert_eq!(it.video_hash.as_deref(), Some("ipfs/QmHash"));
        assert_eq!(it.formatted_date(), "March 5, 2024");
    }

    #[test]
    fn sparse_documents_keep_only_the_id() {
        let r = rows(json!([{ "document": { "name": "projects/p/databases/(default)/documents/videos/x" } }]));
        assert_eq!(items_from_rows(r), vec![MediaItem::new("x")]);
    }

    #[test]
    fn odd_value_types() {
        let r = rows(json!([{ "document": {
            "name": "a/b/videos/y",
            "fields": {
                "caption": { "integerValue": "42" },
                "uploader": { "nullValue": null },
                "timestamp": { "stringValue": "not a date" }
            }
        }}]));
        let it = &items_from_rows(r)[0];
        assert_eq!(it.caption.as_deref(), Some("42"));
        assert_eq!(it.uploader, None);
        assert_eq!(it.timestamp, None);
    }

    #[test]
    fn boolean_and_array_values_become_text() {
        let r = rows(json!([{ "document": {
            "name": "a/b/videos/z",
            "fields": {
                "caption": { "booleanValue": true },
                "tag": { "arrayValue": { "values": [
                    { "stringValue": "#news" },
                    { "stringValue": "#climate" }
                ] } },
                "overview": { "arrayValue": {} }
            }
        }}]));
        let it = &items_from_rows(r)[0];
        assert_eq!(it.caption.as_deref(), Some("true"));
        assert_eq!(it.tag.as_deref(), Some("#news #climate"));
        assert_eq!(it.tags(), vec!["#news", "#climate"]);
        assert_eq!(it.overview, None);
    }

    #[test]
    fn query_without_category_has_no_filter() {
        let body = structured_query("videos", "categories", 6, None);
        let q = &body["structuredQuery"];
        assert_eq!(q["from"][0]["collectionId"], "videos");
        assert_eq!(q["orderBy"][0]["direction"], "DESCENDING");
        assert_eq!(q["limit"], 6);
        assert!(q.get("where").is_none());
    }

    #[test]
    fn query_with_category_uses_array_contains() {
        let body = structured_query("videos", "categories", 3, Some("climate"));
        let filter = &body["structuredQuery"]["where"]["fieldFilter"];
        assert_eq!(filter["op"], "ARRAY_CONTAINS");
        assert_eq!(filter["field"]["fieldPath"], "categories");
        assert_eq!(filter["value"]["stringValue"], "climate");
    }
}
