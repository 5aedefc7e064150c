//! Scripted resolver for driving the engine without a network
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use plp_common::{Error, Result};
use plp_engine::{PlaylistItem, Resolver, SearchOutcome};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Resolver whose answers are scripted per normalized title.
///
/// Counts plain and conditional searches separately so tests can assert
/// exactly when the cache avoided (or forced) a round trip.
#[derive(Default)]
pub struct ScriptedResolver {
    tracks: HashMap<String, PlaylistItem>,
    delays: HashMap<String, Duration>,
    error_status: Option<u16>,
    /// When true, conditional searches answer NotModified
    revalidate_ok: bool,
    pub plain_searches: AtomicUsize,
    pub conditional_searches: AtomicUsize,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an exact match for `title`, named identically
    pub fn with_track(self, title: &str) -> Self {
        let uri = format!("spotify:track:{:x<22}", title.len());
        self.with_named_track(title, title, &uri)
    }

    pub fn with_named_track(mut self, title: &str, name: &str, uri: &str) -> Self {
        let now = Utc::now();
        self.tracks.insert(
            title.to_string(),
            PlaylistItem::new(name, uri, now, now + ChronoDuration::hours(1)),
        );
        self
    }

    /// Fail every search with the given API status
    pub fn with_error(mut self, status: u16) -> Self {
        self.error_status = Some(status);
        self
    }

    /// Answer NotModified to conditional searches
    pub fn answering_not_modified(mut self) -> Self {
        self.revalidate_ok = true;
        self
    }

    /// Delay every search for `title` (for completion-order tests)
    pub fn with_delay(mut self, title: &str, delay: Duration) -> Self {
        self.delays.insert(title.to_string(), delay);
        self
    }
}

#[async_trait]
impl Resolver for ScriptedResolver {
    async fn search(
        &self,
        title: &str,
        modified_since: Option<DateTime<Utc>>,
    ) -> Result<SearchOutcome> {
        if let Some(delay) = self.delays.get(title) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(status) = self.error_status {
            return Err(Error::Resolver { status });
        }
        if modified_since.is_some() {
            self.conditional_searches.fetch_add(1, Ordering::SeqCst);
            if self.revalidate_ok {
                return Ok(SearchOutcome::NotModified);
            }
        } else {
            self.plain_searches.fetch_add(1, Ordering::SeqCst);
        }
        match self.tracks.get(title) {
            Some(item) => Ok(SearchOutcome::Found(item.clone())),
            None => Ok(SearchOutcome::NoMatch),
        }
    }
}
