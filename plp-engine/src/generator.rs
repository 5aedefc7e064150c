//! Playlist generation engine
//!
//! Drives a [`MessageChunker`] over the sanitized words of one sentence,
//! resolving each candidate group cache-first and falling back to the
//! search API. Accepted tracks accumulate into the playlist; when the
//! segmentation search cannot cover the whole sentence, the best discarded
//! attempt is returned instead, flagged incomplete.

use crate::cache::{PlaylistCache, PlaylistItem};
use crate::chunker::{ChunkState, MessageChunker};
use crate::resolver::{Resolver, SearchOutcome};
use chrono::Utc;
use plp_common::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of generating a playlist for one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    /// Resolved tracks in message order
    pub items: Vec<PlaylistItem>,
    /// Whether the items cover the whole input. `false` marks the
    /// best-effort fallback (or an empty result).
    pub complete: bool,
}

impl Playlist {
    pub(crate) fn empty() -> Self {
        Self {
            items: Vec::new(),
            complete: false,
        }
    }
}

/// Generates playlists by resolving word groups against a track search,
/// optionally through a cache shared with other generator instances.
pub struct PlaylistGenerator {
    resolver: Arc<dyn Resolver>,
    cache: Option<Arc<dyn PlaylistCache>>,
}

impl PlaylistGenerator {
    pub fn new(resolver: Arc<dyn Resolver>, cache: Option<Arc<dyn PlaylistCache>>) -> Self {
        Self { resolver, cache }
    }

    /// Generate a playlist for one sentence.
    ///
    /// With `allow_full_span = false` the first group is capped at one
    /// word less than the sentence, so a standalone sentence yields at
    /// least two tracks unless it is a single word. Concurrent
    /// multi-sentence runs pass `true`: the surrounding sentences already
    /// guarantee multiple tracks, and full coverage matters more than
    /// group granularity.
    ///
    /// A search API error status aborts the whole generation; no partial
    /// playlist is returned in that case.
    pub async fn generate(&self, message: &str, allow_full_span: bool) -> Result<Playlist> {
        let words = sanitize_message(message);
        if words.is_empty() {
            return Ok(Playlist::empty());
        }
        debug!(words = words.len(), allow_full_span, "Generating playlist");

        let max_chunk_len = if allow_full_span {
            None
        } else {
            // The chunker treats a zero cap (single-word message) as full
            // length, so the one-group case still resolves.
            Some(words.len() - 1)
        };
        let mut chunker = MessageChunker::new(words, max_chunk_len);

        let mut items: Vec<PlaylistItem> = Vec::new();
        let mut discarded: Vec<Vec<PlaylistItem>> = Vec::new();

        loop {
            let candidate_title = match chunker.peek() {
                ChunkState::Complete | ChunkState::Exhausted => break,
                ChunkState::Stalled => None,
                ChunkState::Candidate(group) => Some(normalize_title(group)),
            };
            match candidate_title {
                None => {
                    // Remainder depleted: keep the attempt for best-effort
                    // fallback, then withdraw its last track
                    discarded.push(items.clone());
                    items.pop();
                    chunker.backtrack();
                }
                Some(title) => {
                    if let Some(item) = self.resolve_title(&title).await? {
                        items.push(item);
                        chunker.accept();
                    } else {
                        chunker.reject();
                    }
                }
            }
        }

        if matches!(chunker.peek(), ChunkState::Complete) && !items.is_empty() {
            debug!(tracks = items.len(), "Playlist complete");
            return Ok(Playlist {
                items,
                complete: true,
            });
        }

        // No full-coverage playlist; take the attempt with the most
        // tracks, ties going to the most recently produced (the final
        // accepted sequence is scanned last)
        let mut best: Vec<PlaylistItem> = Vec::new();
        let final_attempt = (!items.is_empty()).then_some(items);
        for attempt in discarded.into_iter().chain(final_attempt) {
            if attempt.len() >= best.len() {
                best = attempt;
            }
        }
        debug!(tracks = best.len(), "Playlist incomplete (best effort)");
        Ok(Playlist {
            items: best,
            complete: false,
        })
    }

    /// Resolve one normalized title: cache (with revalidation) first,
    /// then the search API. `Ok(None)` rejects the candidate group.
    async fn resolve_title(&self, title: &str) -> Result<Option<PlaylistItem>> {
        if let Some(cache) = &self.cache {
            if let Some(item) = self.lookup_cached(cache.as_ref(), title).await? {
                return Ok(Some(item));
            }
        }

        match self.resolver.search(title, None).await? {
            SearchOutcome::Found(item) => {
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.put(title, item.clone()).await {
                        warn!(title = %title, error = %e, "Cache write failed; continuing uncached");
                    }
                }
                Ok(Some(item))
            }
            // NotModified is only meaningful for conditional searches;
            // on a plain search it counts as no match
            SearchOutcome::NoMatch | SearchOutcome::NotModified => Ok(None),
        }
    }

    /// Look up a title in the cache under the freshness protocol.
    ///
    /// A fresh entry is returned as-is. An overdue entry triggers a
    /// conditional search with the entry's `last_modified`; "not modified"
    /// keeps the entry (its stale `expires` is deliberately left alone, so
    /// the next read revalidates again), anything else drops it and
    /// reports a miss. Cache backend failures degrade to a miss.
    async fn lookup_cached(
        &self,
        cache: &dyn PlaylistCache,
        title: &str,
    ) -> Result<Option<PlaylistItem>> {
        let cached = match cache.get(title).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(title = %title, error = %e, "Cache read failed; searching directly");
                return Ok(None);
            }
        };
        let Some(item) = cached else {
            return Ok(None);
        };

        if !item.is_expired(Utc::now()) {
            debug!(title = %title, "Cache hit");
            return Ok(Some(item));
        }

        debug!(title = %title, "Cache expired");
        match self
            .resolver
            .search(title, Some(item.last_modified))
            .await?
        {
            SearchOutcome::NotModified => {
                debug!(title = %title, "Cache still valid");
                Ok(Some(item))
            }
            SearchOutcome::Found(_) | SearchOutcome::NoMatch => {
                debug!(title = %title, "Cache invalidated");
                if let Err(e) = cache.remove(title).await {
                    warn!(title = %title, error = %e, "Cache remove failed");
                }
                Ok(None)
            }
        }
    }
}

/// Strip a message down to its words: everything that is not
/// alphanumeric, whitespace, or an apostrophe is dropped before
/// whitespace-splitting.
pub(crate) fn sanitize_message(message: &str) -> Vec<String> {
    message
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '\'')
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Normalized lookup key for a word group
fn normalize_title(group: &[String]) -> String {
    group.join(" ").trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_punctuation_but_keeps_apostrophes() {
        assert_eq!(
            sanitize_message("Don't stop, believin'!"),
            vec!["Don't", "stop", "believin'"]
        );
    }

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize_message("  hello \t world  "), vec!["hello", "world"]);
        assert!(sanitize_message("  \t ").is_empty());
        assert!(sanitize_message("...!?").is_empty());
    }

    #[test]
    fn normalize_lowercases_and_joins() {
        let group = vec!["Blue".to_string(), "Suede".to_string(), "SHOES".to_string()];
        assert_eq!(normalize_title(&group), "blue suede shoes");
    }
}
