//! MIME type resolution module
//!
//! Resolves the Content-Type of a file from, in order: an explicit type given by
//! the mount, the ordered override table, and the file extension.

use super::pattern::GlobPattern;
use crate::error::Result;

/// Override value that defers to extension-based detection
pub const AUTO: &str = "auto";

/// One entry of the ordered glob → MIME override table
#[derive(Debug, Clone)]
pub struct MimeOverride {
    pattern: GlobPattern,
    mime: String,
}

impl MimeOverride {
    pub fn new(pattern: &str, mime: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: GlobPattern::new(pattern)?,
            mime: mime.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// `None` when the entry defers to extension-based detection
    fn mime(&self) -> Option<&str> {
        (!self.mime.eq_ignore_ascii_case(AUTO)).then_some(self.mime.as_str())
    }
}

/// Resolve the MIME type for `filename`
///
/// Returns `None` when nothing is known about the file, in which case no
/// `Content-Type` header is sent.
///
/// # Examples
/// ```
/// use static_range_server::http::mime::{resolve, MimeOverride};
///
/// let table = vec![MimeOverride::new("*.log", "text/plain").unwrap()];
/// assert_eq!(resolve("app.log", None, &table).as_deref(), Some("text/plain"));
/// assert_eq!(resolve("movie.mp4", None, &table).as_deref(), Some("video/mp4"));
/// assert_eq!(resolve("movie.mp4", Some("video/webm"), &table).as_deref(), Some("video/webm"));
/// ```
pub fn resolve(filename: &str, explicit: Option<&str>, overrides: &[MimeOverride]) -> Option<String> {
    if let Some(mime) = explicit.filter(|m| !m.trim().is_empty()) {
        return Some(mime.to_string());
    }

    let matched = overrides
        .iter()
        .find(|entry| entry.pattern.matches_path(filename));
    if let Some(mime) = matched.and_then(MimeOverride::mime) {
        return Some(mime.to_string());
    }

    guess_from_extension(filename)
}

/// Extension-based lookup
fn guess_from_extension(filename: &str) -> Option<String> {
    mime_guess::from_path(filename).first_raw().map(str::to_string)
}
