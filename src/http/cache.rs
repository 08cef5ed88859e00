//! HTTP cache validation module
//!
//! Derives `ETag`/`Last-Modified` validators from file metadata and decides
//! whether a conditional request is still fresh.

use httpdate::HttpDate;
use std::time::{SystemTime, UNIX_EPOCH};

/// Cache validators for one version of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validators {
    /// Weak `ETag`, e.g. `W/"3e8-65f1a2b0"`
    pub etag: String,
    /// `Last-Modified` value in IMF-fixdate form
    pub last_modified: String,
    modified: HttpDate,
}

impl Validators {
    /// Build validators from a file size and modification time
    pub fn new(size: u64, modified: SystemTime) -> Self {
        let secs = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let modified = HttpDate::from(modified);
        Self {
            etag: format!("W/\"{size:x}-{secs:x}\""),
            last_modified: modified.to_string(),
            modified,
        }
    }
}

/// Conditional request headers relevant to freshness
#[derive(Debug, Clone, Copy, Default)]
pub struct Conditional<'a> {
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub cache_control: Option<&'a str>,
}

/// Check whether the client's cached copy is still fresh (answer 304)
///
/// - Without any validator header the request is never fresh.
/// - `Cache-Control: no-cache` forces a full response.
/// - `If-None-Match` must match the current `ETag` (weak comparison, `*` matches).
/// - `If-Modified-Since` must be at or after `Last-Modified`.
///
/// When both validators are present, both must hold.
pub fn is_fresh(request: &Conditional<'_>, validators: &Validators) -> bool {
    if request.if_none_match.is_none() && request.if_modified_since.is_none() {
        return false;
    }

    if request
        .cache_control
        .is_some_and(|cc| cc.split(',').any(|d| d.trim().eq_ignore_ascii_case("no-cache")))
    {
        return false;
    }

    if let Some(if_none_match) = request.if_none_match {
        if !check_etag_match(Some(if_none_match), &validators.etag) {
            return false;
        }
    }

    if let Some(if_modified_since) = request.if_modified_since {
        let Ok(since) = if_modified_since.trim().parse::<HttpDate>() else {
            return false;
        };
        if validators.modified > since {
            return false;
        }
    }

    true
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", W/"def456"`
/// - Wildcard: `*`
///
/// Comparison is weak: a `W/` prefix on either side is ignored.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    let etag = strip_weak(etag);
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .map(str::trim)
            .any(|e| e == "*" || strip_weak(e) == etag)
    })
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}
