use crate::config::Config;
use crate::types::MediaItem;

pub const DEFAULT_GATEWAY_ORIGIN: &str = "https://brown-passive-cattle-71.mypinata.cloud/ipfs/";

// Static fallbacks for items without a content hash, keyed by tag keyword.
pub const THUMB_CLIMATE: &str = "/images/thumbnails/climate.jpg";
pub const THUMB_CONFLICT: &str = "/images/thumbnails/conflict.jpg";
pub const THUMB_TECH: &str = "/images/thumbnails/technology.jpg";
pub const THUMB_WORLD: &str = "/images/thumbnails/world.jpg";
pub const THUMB_BREAKING: &str = "/images/thumbnails/breaking.jpg";
pub const THUMB_DEFAULT: &str = "/images/thumbnails/default.jpg";

const THUMB_RULES: &[(&[&str], &str)] = &[
    (&["climate", "weather"], THUMB_CLIMATE),
    (&["israel", "attack"], THUMB_CONFLICT),
    (&["tech"], THUMB_TECH),
    (&["world"], THUMB_WORLD),
    (&["breaking"], THUMB_BREAKING),
];

/// Maps content hashes onto a content-addressed gateway.
#[derive(Debug, Clone)]
pub struct Gateway {
    origin: String,
}

impl Default for Gateway {
    fn default() -> Self { Self::new(DEFAULT_GATEWAY_ORIGIN) }
}

impl Gateway {
    /// `origin` is used as a plain prefix, so it normally ends with `/`.
    pub fn new(origin: impl Into<String>) -> Self { Self { origin: origin.into() } }

    pub fn from_config(config: &Config) -> Self { Self::new(config.gateway_origin.clone()) }

    pub fn origin(&self) -> &str { &self.origin }

    /// Origin followed by the last `/` segment of `hash`; `None` for a missing or empty hash.
    pub fn resolve_media_url(&self, hash: Option<&str>) -> Option<String> {
        let hash = hash.filter(|h| !h.is_empty())?;
        let last = hash.rsplit('/').next().unwrap_or(hash);
        Some(format!("{}{}", self.origin, last))
    }

    /// Media URL when a hash exists, otherwise a static image picked from the item's tags.
    pub fn resolve_thumbnail_url(&self, hash: Option<&str>, item: &MediaItem) -> String {
        if let Some(url) = self.resolve_media_url(hash) {
            return url;
        }
        fallback_thumbnail(item.tag.as_deref()).to_string()
    }
}

fn fallback_thumbnail(tag: Option<&str>) -> &'static str {
    let tag = tag.unwrap_or("").to_lowercase();
    THUMB_RULES
        .iter()
        .find(|(words, _)| words.iter().any(|w| tag.contains(w)))
        .map(|(_, img)| *img)
        .unwrap_or(THUMB_DEFAULT)
}
