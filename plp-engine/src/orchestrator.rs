//! Concurrent multi-sentence orchestration
//!
//! A message is split into sentences; each sentence gets its own
//! generator run. A single sentence is processed inline, multiple
//! sentences fan out to position-tagged tokio tasks sharing the cache and
//! resolver. The fan-in is bounded in two ways a bare join is not: worker
//! concurrency is capped by a semaphore, and the whole gather runs under
//! a deadline, with remaining tasks aborted on the first fatal error or
//! timeout.

use crate::cache::PlaylistCache;
use crate::generator::{Playlist, PlaylistGenerator};
use crate::resolver::Resolver;
use plp_common::config::{DEFAULT_GATHER_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_SENTENCES};
use plp_common::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

/// Characters that end a sentence
const SENTENCE_TERMINATORS: [char; 5] = ['.', '?', '!', '/', '\n'];

/// Split a message on sentence terminators, dropping fragments with no
/// words in them, preserving order.
pub fn split_sentences(message: &str) -> Vec<String> {
    message
        .split(SENTENCE_TERMINATORS)
        .filter(|fragment| !fragment.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Runs one generator per sentence and recombines the playlists in
/// original sentence order.
pub struct PlaylistOrchestrator {
    resolver: Arc<dyn Resolver>,
    cache: Option<Arc<dyn PlaylistCache>>,
    max_concurrent: usize,
    gather_timeout: Duration,
}

impl PlaylistOrchestrator {
    pub fn new(resolver: Arc<dyn Resolver>, cache: Option<Arc<dyn PlaylistCache>>) -> Self {
        Self {
            resolver,
            cache,
            max_concurrent: DEFAULT_MAX_CONCURRENT_SENTENCES,
            gather_timeout: Duration::from_secs(DEFAULT_GATHER_TIMEOUT_SECS),
        }
    }

    /// Override the worker cap and gather deadline
    pub fn with_limits(mut self, max_concurrent: usize, gather_timeout: Duration) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self.gather_timeout = gather_timeout;
        self
    }

    /// Generate one combined playlist for a whole message.
    ///
    /// `complete` is true only if every sentence resolved completely. A
    /// fatal search error in any sentence aborts the remaining workers
    /// and propagates.
    pub async fn generate(&self, message: &str) -> Result<Playlist> {
        let sentences = split_sentences(message);
        match sentences.len() {
            0 => Ok(Playlist::empty()),
            1 => {
                let generator = PlaylistGenerator::new(self.resolver.clone(), self.cache.clone());
                generator.generate(&sentences[0], false).await
            }
            _ => self.generate_concurrent(sentences).await,
        }
    }

    async fn generate_concurrent(&self, sentences: Vec<String>) -> Result<Playlist> {
        let sentence_count = sentences.len();
        debug!(sentences = sentence_count, "Fanning out sentence workers");

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut workers = JoinSet::new();
        for (position, sentence) in sentences.into_iter().enumerate() {
            let resolver = self.resolver.clone();
            let cache = self.cache.clone();
            let semaphore = semaphore.clone();
            workers.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| Error::Internal("worker semaphore closed".to_string()))?;
                debug!(position, "Sentence worker started");
                let generator = PlaylistGenerator::new(resolver, cache);
                // Surrounding sentences already guarantee multiple
                // tracks, so each worker may span its whole sentence
                let playlist = generator.generate(&sentence, true).await?;
                Ok::<_, Error>((position, playlist))
            });
        }

        // Workers finish in arbitrary order; slot them back by position
        let mut slots: Vec<Option<Playlist>> = vec![None; sentence_count];
        let gather = async {
            while let Some(joined) = workers.join_next().await {
                let outcome =
                    joined.map_err(|e| Error::Internal(format!("sentence worker died: {e}")))?;
                let (position, playlist) = outcome?;
                debug!(position, complete = playlist.complete, "Sentence worker finished");
                slots[position] = Some(playlist);
            }
            Ok::<_, Error>(())
        };
        let outcome = tokio::time::timeout(self.gather_timeout, gather).await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                workers.abort_all();
                return Err(e);
            }
            Err(_elapsed) => {
                workers.abort_all();
                return Err(Error::Timeout(self.gather_timeout));
            }
        }

        let mut items = Vec::new();
        let mut complete = true;
        for slot in slots {
            let playlist =
                slot.ok_or_else(|| Error::Internal("sentence result missing".to_string()))?;
            complete &= playlist.complete;
            items.extend(playlist.items);
        }
        Ok(Playlist { items, complete })
    }
}
