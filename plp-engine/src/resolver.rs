//! Search contract
//!
//! The generator only ever talks to the track search through this trait,
//! which keeps the enumeration/caching logic independent of the transport
//! and lets tests script outcomes per title.

use crate::cache::PlaylistItem;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plp_common::Result;

/// Outcome of a title search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A track whose normalized name equals the normalized query
    Found(PlaylistItem),
    /// The search produced no exactly-matching track
    NoMatch,
    /// The result has not changed since `modified_since`. Only meaningful
    /// for conditional searches.
    NotModified,
}

/// A track search backend.
///
/// `modified_since` turns the search into a conditional request: the
/// backend may answer [`SearchOutcome::NotModified`] instead of
/// re-delivering an unchanged result. An unexpected API status is an
/// [`plp_common::Error::Resolver`], which callers treat as fatal.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn search(
        &self,
        title: &str,
        modified_since: Option<DateTime<Utc>>,
    ) -> Result<SearchOutcome>;
}
