//! Cache contract for resolved tracks
//!
//! Entries are keyed by the normalized lookup title (lowercased, trimmed,
//! space-joined word group). A stored entry may already be past its
//! `expires` timestamp; staleness is settled at read time by the
//! generator's revalidation step, never at write time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plp_common::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A resolved track with its freshness metadata. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Track name as reported by the search API
    pub name: String,
    /// Opaque track URI (e.g. `spotify:track:...`)
    pub uri: String,
    /// `Date` of the response that produced this item; sent back as
    /// `If-Modified-Since` when revalidating
    pub last_modified: DateTime<Utc>,
    /// Moment the item stops being reusable without revalidation
    pub expires: DateTime<Utc>,
}

impl PlaylistItem {
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        last_modified: DateTime<Utc>,
        expires: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            last_modified,
            expires,
        }
    }

    /// Whether the item needs revalidation at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires
    }
}

/// Storage contract for resolved tracks.
///
/// Implementations must be safe under concurrent `get`/`put`/`remove`
/// from multiple sentence workers; the orchestrator shares one cache
/// across all of them without external locking.
#[async_trait]
pub trait PlaylistCache: Send + Sync {
    /// Look up a stored item (possibly expired) by normalized title
    async fn get(&self, key: &str) -> Result<Option<PlaylistItem>>;

    /// Store an item, overwriting any existing entry for the key
    async fn put(&self, key: &str, item: PlaylistItem) -> Result<()>;

    /// Drop the entry for the key, if present
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory cache backed by a HashMap
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, PlaylistItem>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaylistCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<PlaylistItem>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, item: PlaylistItem) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), item);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
