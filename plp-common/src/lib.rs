//! # Playlist Poetry Common Library
//!
//! Shared code for the Playlist Poetry workspace:
//! - Error taxonomy (`Error` enum, `Result` alias)
//! - Configuration loading and resolution
//! - HTTP date and cache-header helpers

pub mod config;
pub mod error;
pub mod http_date;

pub use error::{Error, Result};
