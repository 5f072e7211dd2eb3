use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::media::DEFAULT_GATEWAY_ORIGIN;
use crate::saved::DEFAULT_SAVED_KEY;

pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";

/// Endpoints and knobs. Values come from (lowest to highest) built-in
/// defaults, a TOML file, and `FNAFEED_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub project_id: String,
    pub api_key: Option<String>,
    pub firestore_base_url: String,
    pub collection: String,
    /// Array field matched against a requested category.
    pub category_field: String,
    pub gateway_origin: String,
    pub timeout_secs: u64,
    pub default_limit: usize,
    pub saved_key: String,
    pub database_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: "fnaai-1c002".to_string(),
            api_key: None,
            firestore_base_url: DEFAULT_FIRESTORE_URL.to_string(),
            collection: "videos".to_string(),
            category_field: "categories".to_string(),
            gateway_origin: DEFAULT_GATEWAY_ORIGIN.to_string(),
            timeout_secs: 30,
            default_limit: 6,
            saved_key: DEFAULT_SAVED_KEY.to_string(),
            database_url: None,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default config file when it exists, then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };
        let mut cfg = match file {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config: {}", path.display()))
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        if let Some(v) = get("FNAFEED_PROJECT_ID") { self.project_id = v; }
        if let Some(v) = get("FNAFEED_API_KEY") { self.api_key = Some(v); }
        if let Some(v) = get("FNAFEED_FIRESTORE_URL") { self.firestore_base_url = v; }
        if let Some(v) = get("FNAFEED_GATEWAY") { self.gateway_origin = v; }
        if let Some(v) = get("FNAFEED_DATABASE_URL") { self.database_url = Some(v); }
        if let Some(v) = get("FNAFEED_TIMEOUT_SECS").and_then(|s| s.parse().ok()) { self.timeout_secs = v; }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("ai", "fna", "fnafeed").map(|p| p.config_dir().join("config.toml"))
}
