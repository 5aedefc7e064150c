//! HTTP date and cache-header helpers
//!
//! The search API reports freshness through standard HTTP headers
//! (`Date`, `Cache-Control: max-age=N`, `If-Modified-Since`). These helpers
//! convert between chrono timestamps and the wire formats.

use chrono::{DateTime, Utc};

/// Parse an HTTP date header (RFC 2822 / RFC 7231 format) into a UTC
/// timestamp. Returns `None` for anything unparseable.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a UTC timestamp for an HTTP date header.
///
/// HTTP dates are always rendered in GMT.
pub fn format_http_date(dt: DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Extract the `max-age` value (seconds) from a `Cache-Control` header.
pub fn parse_max_age(cache_control: &str) -> Option<u64> {
    cache_control.split(',').find_map(|directive| {
        directive
            .trim()
            .strip_prefix("max-age=")
            .and_then(|age| age.trim().parse().ok())
    })
}
