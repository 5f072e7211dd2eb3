use anyhow::{Context, Result};
use directories::ProjectDirs;
use sqlx::{any::AnyConnectOptions, AnyPool, ConnectOptions, migrate::Migrator};
use sqlx::any::AnyPoolOptions;
use std::{path::PathBuf, str::FromStr};
use std::sync::Once;

use crate::storage::KeyValueStore;

// Ensure drivers are installed exactly once for sqlx::any
static INSTALL_DRIVERS: Once = Once::new();

// Embed SQL migrations from the migrations/ directory
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite-backed local state.
#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    // Create a connection pool. If database_url is None, use a SQLite file in
    // the user's data directory.
    pub async fn connect(database_url: Option<&str>) -> Result<Self> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        let url = match database_url {
            Some(u) if !u.trim().is_empty() => u.to_string(),
            _ => default_sqlite_url()?,
        };

        let opts = AnyConnectOptions::from_str(&url)
            .with_context(|| format!("invalid database URL: {url}"))?;
        // Quiet by default; callers can enable SQLX_LOG if they want
        let opts = opts.disable_statement_logging();

        let pool = AnyPoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await
            .with_context(|| format!("failed to connect to database: {url}"))?;

        tracing::debug!(%url, "database connected");
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.context("running migrations")
    }

    pub fn pool(&self) -> &AnyPool { &self.pool }
}

#[async_trait::async_trait]
impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO kv_store(key, value) VALUES (?, ?)\n             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=unixepoch()",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub(crate) fn sqlite_url_for(path: &std::path::Path) -> String {
    // Encode spaces in the path for a valid sqlite URL
    let path_str = path.to_string_lossy().replace(' ', "%20");
    format!("sqlite://{path_str}?mode=rwc")
}

fn default_sqlite_url() -> Result<String> {
    let proj = ProjectDirs::from("ai", "fna", "fnafeed")
        .context("unable to determine data directory for default sqlite path")?;
    let mut path: PathBuf = proj.data_dir().to_path_buf();
    std::fs::create_dir_all(&path).with_context(|| format!("creating data dir: {}", path.display()))?;
    path.push("fnafeed.db");
    Ok(sqlite_url_for(&path))
}
