//! Glob pattern matching shared by referer gating and MIME overrides
//!
//! Patterns use `glob` semantics: `*` and `?` stay within one path segment,
//! `**` spans segments, `[...]` is a character class.

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};

const PATH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

const HOST_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled glob pattern that remembers its source text
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    pattern: Pattern,
}

impl GlobPattern {
    /// Compile a glob pattern
    pub fn new(source: &str) -> Result<Self> {
        let pattern = Pattern::new(source).map_err(|e| Error::Pattern {
            pattern: source.to_string(),
            source: e,
        })?;
        Ok(Self {
            source: source.to_string(),
            pattern,
        })
    }

    /// Compile a pattern, treating blank text as "no pattern"
    pub fn optional(source: &str) -> Result<Option<Self>> {
        let source = source.trim();
        if source.is_empty() {
            return Ok(None);
        }
        Self::new(source).map(Some)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a slash-separated logical path
    ///
    /// Patterns without a `/` are matched against the last path segment only,
    /// so `*.mp4` matches `videos/intro.mp4`.
    pub fn matches_path(&self, path: &str) -> bool {
        let path = path.trim_start_matches('/');
        if self.source.contains('/') {
            return self.pattern.matches_with(path, PATH_OPTIONS);
        }
        let name = path.rsplit('/').next().unwrap_or(path);
        self.pattern.matches_with(name, PATH_OPTIONS)
    }

    /// Match a host name, ignoring ASCII case
    pub fn matches_host(&self, host: &str) -> bool {
        self.pattern.matches_with(host, HOST_OPTIONS)
    }
}
