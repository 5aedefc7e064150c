//! # Playlist Poetry Engine
//!
//! Turns free-form text into an ordered playlist of matched tracks by
//! greedily segmenting the text into word groups and resolving each group
//! against a track search API, with cached results revalidated through
//! HTTP freshness semantics.
//!
//! Components:
//! - [`chunker::MessageChunker`]: backtracking word-group enumeration
//! - [`generator::PlaylistGenerator`]: drives the chunker, consults the
//!   cache and resolver, assembles the playlist (best-effort fallback when
//!   full coverage fails)
//! - [`cache`]: cache contract plus in-memory and SQLite backends
//! - [`resolver`] / [`spotify`]: search contract and the Spotify client
//! - [`orchestrator`]: concurrent multi-sentence fan-out/fan-in

pub mod cache;
pub mod chunker;
pub mod generator;
pub mod orchestrator;
pub mod resolver;
pub mod spotify;
pub mod sqlite_cache;

pub use cache::{MemoryCache, PlaylistCache, PlaylistItem};
pub use chunker::{ChunkState, MessageChunker};
pub use generator::{Playlist, PlaylistGenerator};
pub use orchestrator::{split_sentences, PlaylistOrchestrator};
pub use resolver::{Resolver, SearchOutcome};
pub use spotify::{spotify_uri_to_url, SpotifyResolver};
pub use sqlite_cache::SqliteCache;
