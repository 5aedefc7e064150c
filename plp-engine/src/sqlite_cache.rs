//! SQLite-backed playlist cache
//!
//! Persists resolved tracks in a single `playlist_cache` table keyed by
//! normalized title, so cached lookups survive restarts and can be shared
//! between the web service and the CLI. The pool handles concurrent
//! access from multiple sentence workers.

use crate::cache::{PlaylistCache, PlaylistItem};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plp_common::Result;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::debug;

pub struct SqliteCache {
    pool: SqlitePool,
}

impl SqliteCache {
    /// Open (creating if missing) the cache database at `db_path`
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // SQLite URI with mode=rwc (read, write, create)
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        debug!("Connecting to cache database: {}", db_url);

        let pool = SqlitePool::connect(&db_url).await?;
        Self::from_pool(pool).await
    }

    /// Build the cache on an existing pool, creating the table if needed
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS playlist_cache (
                title TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                uri TEXT NOT NULL,
                last_modified TEXT NOT NULL,
                expires TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl PlaylistCache for SqliteCache {
    async fn get(&self, key: &str) -> Result<Option<PlaylistItem>> {
        let row = sqlx::query_as::<_, (String, String, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT name, uri, last_modified, expires FROM playlist_cache WHERE title = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(name, uri, last_modified, expires)| PlaylistItem {
            name,
            uri,
            last_modified,
            expires,
        }))
    }

    async fn put(&self, key: &str, item: PlaylistItem) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO playlist_cache (title, name, uri, last_modified, expires) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(key)
        .bind(&item.name)
        .bind(&item.uri)
        .bind(item.last_modified)
        .bind(item.expires)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM playlist_cache WHERE title = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
