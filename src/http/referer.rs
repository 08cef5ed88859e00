//! Referer gating module
//!
//! Decides whether a request may be served based on the host of its `Referer`.
//!
//! Host extraction rules:
//! - The referer is parsed as an absolute URL. When that fails, the text between
//!   `//` and the next `/`, `:`, `?`, `#` (or the end) is used instead.
//! - The request's own host comes from `Host`: `[v6]:port` keeps the bracketed
//!   literal, otherwise a trailing numeric `:port` is stripped. A value with
//!   several colons and no brackets is taken as a bare IPv6 literal.
//! - IPv6 brackets are removed and hosts compare case-insensitively.

use url::Url;

use super::pattern::GlobPattern;

/// Outcome of the referer check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied,
}

/// Check a request's `Referer` against the allow pattern
///
/// Requests without a referer host and same-origin requests are always allowed.
/// A missing pattern disables gating.
pub fn check(
    referer: Option<&str>,
    host: Option<&str>,
    allow_pattern: Option<&GlobPattern>,
) -> AccessDecision {
    let Some(pattern) = allow_pattern else {
        return AccessDecision::Allowed;
    };

    let Some(remote) = referer.and_then(referer_host) else {
        return AccessDecision::Allowed;
    };

    if host.and_then(local_host).is_some_and(|local| local == remote) {
        return AccessDecision::Allowed;
    }

    if pattern.matches_host(&remote) {
        AccessDecision::Allowed
    } else {
        AccessDecision::Denied
    }
}

/// Extract the lowercase host of a `Referer` value
pub fn referer_host(referer: &str) -> Option<String> {
    let referer = referer.trim();
    if referer.is_empty() {
        return None;
    }

    match Url::parse(referer) {
        Ok(url) => url.host_str().and_then(normalize_host),
        Err(_) => fallback_host(referer),
    }
}

/// Extract the lowercase host of a `Host` header value, without port
pub fn local_host(host: &str) -> Option<String> {
    let host = host.trim();

    if let Some(rest) = host.strip_prefix('[') {
        let (literal, _) = rest.split_once(']')?;
        return normalize_host(literal);
    }

    if host.matches(':').count() > 1 {
        return normalize_host(host);
    }

    let name = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    normalize_host(name)
}

/// Slice the authority out of a referer that is not an absolute URL
fn fallback_host(referer: &str) -> Option<String> {
    let (_, rest) = referer.split_once("//")?;

    if let Some(rest) = rest.strip_prefix('[') {
        let (literal, _) = rest.split_once(']')?;
        return normalize_host(literal);
    }

    let end = rest.find(['/', ':', '?', '#']).unwrap_or(rest.len());
    normalize_host(&rest[..end])
}

fn normalize_host(host: &str) -> Option<String> {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return None;
    }
    Some(host.to_ascii_lowercase())
}
