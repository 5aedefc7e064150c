//! Spotify search client
//!
//! Resolves a normalized title to the best exactly-matching track via the
//! Spotify Web API search endpoint. Freshness metadata is taken from the
//! response's standard HTTP caching headers (`Date`, `Cache-Control`),
//! and conditional revalidation is expressed with `If-Modified-Since`.
//!
//! # API Reference
//! - Endpoint: `GET {base}/search?q=<title>&type=track`
//! - Accepted statuses: 200, 304 (conditional hit), 404 (no result);
//!   anything else is fatal for the in-flight generation.

use crate::cache::PlaylistItem;
use crate::resolver::{Resolver, SearchOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use plp_common::http_date::{format_http_date, parse_http_date, parse_max_age};
use plp_common::{Error, Result};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Base URL for track links shown to users
const SPOTIFY_TRACK_URL: &str = "http://open.spotify.com/track/";

/// User-Agent header for search requests
const USER_AGENT: &str = concat!("playlistpoetry/", env!("CARGO_PKG_VERSION"));

/// Convert a `spotify:track:<id>` URI into a web URL, if it is one
pub fn spotify_uri_to_url(uri: &str) -> Option<String> {
    let id = uri.strip_prefix("spotify:track:")?;
    if id.len() == 22 && id.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(format!("{SPOTIFY_TRACK_URL}{id}"))
    } else {
        None
    }
}

/// Track search against the Spotify Web API
pub struct SpotifyResolver {
    http_client: Client,
    base_url: String,
}

impl SpotifyResolver {
    /// Create a resolver for `base_url` with an explicit per-request
    /// timeout. Timeouts surface as [`Error::Network`], never as a hang.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        Self {
            http_client: Client::builder()
                .timeout(request_timeout)
                .default_headers(headers)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Resolver for SpotifyResolver {
    async fn search(
        &self,
        title: &str,
        modified_since: Option<DateTime<Utc>>,
    ) -> Result<SearchOutcome> {
        debug!(title = %title, conditional = modified_since.is_some(), "Querying track search");

        let mut request = self
            .http_client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", title), ("type", "track")]);
        if let Some(since) = modified_since {
            request = request.header(header::IF_MODIFIED_SINCE, format_http_date(since));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(format!("search request failed: {e}")))?;

        match response.status() {
            StatusCode::NOT_MODIFIED => return Ok(SearchOutcome::NotModified),
            StatusCode::NOT_FOUND => return Ok(SearchOutcome::NoMatch),
            StatusCode::OK => {}
            status => return Err(Error::Resolver {
                status: status.as_u16(),
            }),
        }

        // Freshness metadata from the response headers. A missing Date
        // falls back to now; a missing max-age means the item expires
        // immediately and every reuse goes through revalidation.
        let now = Utc::now();
        let last_modified = header_str(&response, header::DATE)
            .and_then(|value| parse_http_date(&value))
            .unwrap_or(now);
        let max_age = header_str(&response, header::CACHE_CONTROL)
            .and_then(|value| parse_max_age(&value))
            .unwrap_or(0);
        let expires = now + ChronoDuration::seconds(max_age as i64);

        let decoded: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Network(format!("cannot decode search response: {e}")))?;

        match first_exact_match(&decoded.tracks.items, title) {
            Some(track) => {
                debug!(title = %title, uri = %track.uri, "Track search matched");
                Ok(SearchOutcome::Found(PlaylistItem::new(
                    track.name.clone(),
                    track.uri.clone(),
                    last_modified,
                    expires,
                )))
            }
            None => Ok(SearchOutcome::NoMatch),
        }
    }
}

fn header_str(response: &reqwest::Response, name: header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// First track whose normalized name equals the normalized query.
///
/// This is a hard filter, not a ranking heuristic: the search endpoint
/// also returns tracks whose ALBUM name resembles the query, and those
/// must never be accepted.
fn first_exact_match<'a>(tracks: &'a [Track], title: &str) -> Option<&'a Track> {
    tracks
        .iter()
        .find(|track| track.name.trim().to_lowercase() == title)
}

// ============================================================================
// Search API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    items: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    name: String,
    uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_to_url_valid_track() {
        let url = spotify_uri_to_url("spotify:track:6rqhFgbbKwnb9MLmUQDhG6");
        assert_eq!(
            url.as_deref(),
            Some("http://open.spotify.com/track/6rqhFgbbKwnb9MLmUQDhG6")
        );
    }

    #[test]
    fn uri_to_url_rejects_non_track_uris() {
        assert_eq!(spotify_uri_to_url("spotify:album:6rqhFgbbKwnb9MLmUQDhG6"), None);
        assert_eq!(spotify_uri_to_url("spotify:track:short"), None);
        assert_eq!(spotify_uri_to_url("spotify:track:not-base62-id-chars!!!"), None);
        assert_eq!(spotify_uri_to_url("http://open.spotify.com/track/x"), None);
    }

    #[test]
    fn exact_match_ignores_album_name_hits() {
        let tracks = vec![
            Track {
                // The search returns this because the album matches
                name: "Some Other Song".to_string(),
                uri: "spotify:track:aaaaaaaaaaaaaaaaaaaaaa".to_string(),
            },
            Track {
                name: " Blue Suede Shoes ".to_string(),
                uri: "spotify:track:bbbbbbbbbbbbbbbbbbbbbb".to_string(),
            },
        ];
        let found = first_exact_match(&tracks, "blue suede shoes").unwrap();
        assert_eq!(found.uri, "spotify:track:bbbbbbbbbbbbbbbbbbbbbb");
    }

    #[test]
    fn exact_match_none_when_nothing_equals_the_query() {
        let tracks = vec![Track {
            name: "Blue Suede Shoes (Live)".to_string(),
            uri: "spotify:track:cccccccccccccccccccccc".to_string(),
        }];
        assert!(first_exact_match(&tracks, "blue suede shoes").is_none());
    }

    #[test]
    fn search_response_decodes() {
        let body = r#"{
            "tracks": {
                "items": [
                    {"name": "Hello", "uri": "spotify:track:dddddddddddddddddddddd", "popularity": 64}
                ]
            }
        }"#;
        let decoded: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.tracks.items.len(), 1);
        assert_eq!(decoded.tracks.items[0].name, "Hello");
    }
}
