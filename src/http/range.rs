//! HTTP Range request resolution module
//!
//! Resolves a single `bytes` range against the size of a resource, following the
//! subset of RFC 7233 the file server supports. Multi-range requests are rejected.

/// Reason reported when the client asks for more than one range
pub const MULTI_RANGE_REASON: &str = "multi-range not supported";

/// Reason reported for any other malformed range specifier
pub const BAD_RANGE_REASON: &str = "bad range";

/// Value of the `Accept-Ranges` header sent with every range-aware response
pub const ACCEPT_RANGES: &str = "bytes";

/// Result of resolving a `Range` header against a resource size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No range requested, serve the whole body
    Full,
    /// Satisfiable range, both bounds inclusive
    Partial { start: u64, end: u64 },
    /// Range cannot be served for this resource (416)
    Unsatisfiable,
    /// Malformed range header (400)
    Rejected(&'static str),
}

/// Status and entity headers derived from a [`RangeOutcome`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeHeaders {
    pub status: u16,
    pub content_range: Option<String>,
    pub content_length: Option<u64>,
}

impl RangeOutcome {
    /// Number of body bytes the outcome commits to, if known
    pub const fn content_length(&self, total_size: Option<u64>) -> Option<u64> {
        match *self {
            Self::Full => total_size,
            Self::Partial { start, end } => Some(end - start + 1),
            Self::Unsatisfiable | Self::Rejected(_) => None,
        }
    }

    /// Build the status line and range headers for this outcome
    ///
    /// An unknown total size is rendered as `*` in `Content-Range`.
    pub fn headers(&self, total_size: Option<u64>) -> RangeHeaders {
        let total = total_size.map_or_else(|| "*".to_string(), |size| size.to_string());
        let content_length = self.content_length(total_size);

        match *self {
            Self::Full => RangeHeaders {
                status: 200,
                content_range: None,
                content_length,
            },
            Self::Partial { start, end } => RangeHeaders {
                status: 206,
                content_range: Some(format!("bytes {start}-{end}/{total}")),
                content_length,
            },
            Self::Unsatisfiable => RangeHeaders {
                status: 416,
                content_range: Some(format!("bytes */{total}")),
                content_length,
            },
            Self::Rejected(_) => RangeHeaders {
                status: 400,
                content_range: None,
                content_length,
            },
        }
    }
}

/// One side of a `start-end` specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Omitted,
    Value(u64),
}

/// Resolve a `Range` header against the total size of the resource
///
/// Supported formats:
/// - `bytes=start-end` - Specific range
/// - `bytes=start-` - From start to end
/// - `bytes=-suffix` - Last suffix bytes, clamped at the first byte
///
/// A specifier without `-` is read as `start-`, and anything after a second
/// `-` is ignored.
///
/// `total_size` is `None` when the size of the resource is unknown; suffix
/// ranges and open-ended ranges cannot be satisfied in that case.
///
/// # Examples
/// ```
/// use static_range_server::http::range::{resolve, RangeOutcome};
///
/// assert_eq!(
///     resolve(Some("bytes=0-499"), Some(1000)),
///     RangeOutcome::Partial { start: 0, end: 499 }
/// );
/// assert_eq!(resolve(None, Some(1000)), RangeOutcome::Full);
/// ```
pub fn resolve(range_header: Option<&str>, total_size: Option<u64>) -> RangeOutcome {
    let Some(header) = range_header else {
        return RangeOutcome::Full;
    };

    let Some((_, ranges)) = header.split_once('=') else {
        return RangeOutcome::Rejected(BAD_RANGE_REASON);
    };

    if ranges.contains(',') {
        return RangeOutcome::Rejected(MULTI_RANGE_REASON);
    }

    // Only the first two parts count; a missing `-` leaves the end omitted
    let mut parts = ranges.split('-');
    let first = parts.next().unwrap_or_default();
    let second = parts.next().unwrap_or_default();
    let (Some(first), Some(second)) = (parse_bound(first), parse_bound(second)) else {
        return RangeOutcome::Rejected(BAD_RANGE_REASON);
    };

    // Index of the last byte; `None` when the size is unknown
    let max = total_size.and_then(|size| size.checked_sub(1));

    let (start, end) = match (first, second) {
        (Bound::Omitted, Bound::Omitted) => return RangeOutcome::Rejected(BAD_RANGE_REASON),
        (Bound::Value(start), Bound::Value(end)) => (Some(start), Some(end)),
        (Bound::Value(start), Bound::Omitted) => (Some(start), max),
        (Bound::Omitted, Bound::Value(suffix)) => {
            (total_size.map(|size| size.saturating_sub(suffix)), max)
        }
    };

    // An empty resource has no last byte, every range starts past it
    if total_size == Some(0) {
        return RangeOutcome::Unsatisfiable;
    }

    // Comparisons against an unknown max never exceed it
    let exceeds_max = |value: Option<u64>| matches!((value, max), (Some(v), Some(m)) if v > m);
    if (end.is_none() && max.is_none()) || exceeds_max(end) || exceeds_max(start) {
        return RangeOutcome::Unsatisfiable;
    }

    let (Some(start), Some(end)) = (start, end) else {
        return RangeOutcome::Unsatisfiable;
    };
    if start > end {
        return RangeOutcome::Unsatisfiable;
    }

    RangeOutcome::Partial { start, end }
}

/// Parse one bound; `None` means the text is not an unsigned integer
fn parse_bound(part: &str) -> Option<Bound> {
    let part = part.trim();
    if part.is_empty() {
        return Some(Bound::Omitted);
    }
    part.parse::<u64>().ok().map(Bound::Value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_range() {
        assert_eq!(resolve(None, Some(100)), RangeOutcome::Full);
        let headers = RangeOutcome::Full.headers(Some(100));
        assert_eq!(headers.status, 200);
        assert_eq!(headers.content_length, Some(100));
        assert_eq!(headers.content_range, None);
    }

    #[test]
    fn test_standard_range() {
        let outcome = resolve(Some("bytes=0-499"), Some(1000));
        assert_eq!(outcome, RangeOutcome::Partial { start: 0, end: 499 });

        let headers = outcome.headers(Some(1000));
        assert_eq!(headers.status, 206);
        assert_eq!(headers.content_range.as_deref(), Some("bytes 0-499/1000"));
        assert_eq!(headers.content_length, Some(500));
    }

    #[test]
    fn test_open_range() {
        let outcome = resolve(Some("bytes=500-"), Some(1000));
        assert_eq!(outcome, RangeOutcome::Partial { start: 500, end: 999 });
        assert_eq!(
            outcome.headers(Some(1000)).content_range.as_deref(),
            Some("bytes 500-999/1000")
        );
    }

    #[test]
    fn test_suffix_range() {
        let outcome = resolve(Some("bytes=-500"), Some(1000));
        assert_eq!(outcome, RangeOutcome::Partial { start: 500, end: 999 });
        assert_eq!(
            outcome.headers(Some(1000)).content_range.as_deref(),
            Some("bytes 500-999/1000")
        );
    }

    #[test]
    fn test_suffix_larger_than_file_clamps_to_start() {
        assert_eq!(
            resolve(Some("bytes=-5000"), Some(1000)),
            RangeOutcome::Partial { start: 0, end: 999 }
        );
    }

    #[test]
    fn test_not_satisfiable() {
        let outcome = resolve(Some("bytes=1000-1001"), Some(1000));
        assert_eq!(outcome, RangeOutcome::Unsatisfiable);

        let headers = outcome.headers(Some(1000));
        assert_eq!(headers.status, 416);
        assert_eq!(headers.content_range.as_deref(), Some("bytes */1000"));
        assert_eq!(headers.content_length, None);

        assert_eq!(resolve(Some("bytes=200-"), Some(100)), RangeOutcome::Unsatisfiable);
        assert_eq!(resolve(Some("bytes=0-100"), Some(100)), RangeOutcome::Unsatisfiable);
        assert_eq!(resolve(Some("bytes=-0"), Some(100)), RangeOutcome::Unsatisfiable);
    }

    #[test]
    fn test_inverted_range_is_unsatisfiable() {
        assert_eq!(resolve(Some("bytes=50-10"), Some(100)), RangeOutcome::Unsatisfiable);
    }

    #[test]
    fn test_empty_resource() {
        assert_eq!(resolve(Some("bytes=0-"), Some(0)), RangeOutcome::Unsatisfiable);
        assert_eq!(resolve(Some("bytes=-10"), Some(0)), RangeOutcome::Unsatisfiable);
        assert_eq!(resolve(None, Some(0)), RangeOutcome::Full);
    }

    #[test]
    fn test_multi_range_rejected() {
        assert_eq!(
            resolve(Some("bytes=0-9,20-29"), Some(100)),
            RangeOutcome::Rejected(MULTI_RANGE_REASON)
        );
        // Valid-looking bounds do not rescue a multi-range request
        assert_eq!(
            resolve(Some("bytes=0-1,"), Some(100)),
            RangeOutcome::Rejected(MULTI_RANGE_REASON)
        );
        assert_eq!(
            RangeOutcome::Rejected(MULTI_RANGE_REASON).headers(Some(100)).status,
            400
        );
    }

    #[test]
    fn test_invalid_format() {
        for header in ["bytes=a-b", "bytes=-", "bytes=", "bytes", "bytes=x-", "bytes=1-x-3"] {
            assert_eq!(
                resolve(Some(header), Some(100)),
                RangeOutcome::Rejected(BAD_RANGE_REASON),
                "header {header:?}"
            );
        }
    }

    #[test]
    fn test_loose_specifier_forms() {
        // No `-`: the end defaults to the last byte
        assert_eq!(
            resolve(Some("bytes=10"), Some(1000)),
            RangeOutcome::Partial { start: 10, end: 999 }
        );
        // Parts after the second `-` are ignored
        assert_eq!(
            resolve(Some("bytes=1-2-3"), Some(1000)),
            RangeOutcome::Partial { start: 1, end: 2 }
        );
        assert_eq!(resolve(Some("bytes=1000"), Some(1000)), RangeOutcome::Unsatisfiable);
    }

    #[test]
    fn test_unknown_size() {
        let outcome = resolve(Some("bytes=0-99"), None);
        assert_eq!(outcome, RangeOutcome::Partial { start: 0, end: 99 });
        assert_eq!(
            outcome.headers(None).content_range.as_deref(),
            Some("bytes 0-99/*")
        );

        // Neither the end nor the last byte index is known
        assert_eq!(resolve(Some("bytes=10-"), None), RangeOutcome::Unsatisfiable);
        assert_eq!(resolve(Some("bytes=-10"), None), RangeOutcome::Unsatisfiable);
        assert_eq!(
            RangeOutcome::Unsatisfiable.headers(None).content_range.as_deref(),
            Some("bytes */*")
        );
    }

    #[test]
    fn test_whitespace_around_bounds() {
        assert_eq!(
            resolve(Some("bytes= 10 - 19 "), Some(100)),
            RangeOutcome::Partial { start: 10, end: 19 }
        );
    }

    #[test]
    fn test_partial_invariants_hold() {
        let size = 37;
        let headers = [
            "bytes=0-0", "bytes=0-", "bytes=36-", "bytes=-1", "bytes=-37", "bytes=-100",
            "bytes=5-36", "bytes=12-20", "bytes=36-36",
        ];
        for header in headers {
            match resolve(Some(header), Some(size)) {
                RangeOutcome::Partial { start, end } => {
                    assert!(start <= end && end < size, "header {header:?}");
                    assert_eq!(
                        RangeOutcome::Partial { start, end }.content_length(Some(size)),
                        Some(end - start + 1)
                    );
                }
                other => panic!("Expected Partial for {header:?}, got {other:?}"),
            }
        }
    }
}
