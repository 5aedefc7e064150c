//! Common error types for Playlist Poetry

use std::time::Duration;
use thiserror::Error;

/// Common result type for playlist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Playlist Poetry crates
#[derive(Error, Debug)]
pub enum Error {
    /// The search API returned a status outside the accepted set.
    /// Fatal: aborts the in-flight generation, no retry.
    #[error("Search API returned an error ({status})")]
    Resolver { status: u16 },

    /// Transport-level failure reaching the search API (DNS, connect,
    /// request timeout)
    #[error("Search request failed: {0}")]
    Network(String),

    /// Cache backend failure (non-fatal for generation; the engine
    /// degrades to direct search)
    #[error("Cache backend error: {0}")]
    Cache(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Concurrent sentence workers did not all finish in time
    #[error("Playlist generation timed out after {0:?}")]
    Timeout(Duration),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Status code of a fatal resolver error, if this is one
    pub fn resolver_status(&self) -> Option<u16> {
        match self {
            Error::Resolver { status } => Some(*status),
            _ => None,
        }
    }
}
