//! Mount table module
//!
//! Maps request paths to physical sources. Mounts are matched by longest
//! prefix on a segment boundary; `dir` mounts never escape their root.

use bytes::Bytes;
use percent_encoding::percent_decode_str;
use std::path::PathBuf;

use crate::config::{MountConfig, MountKind};

/// What the file responder should serve for a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeTarget {
    /// Physical file to stat and stream; empty means nothing to serve
    pub source: PathBuf,
    /// Slash-separated name used for MIME resolution
    pub logical_name: String,
    /// Explicit MIME type configured on the mount
    pub mime: Option<String>,
    /// In-memory body served instead of the file contents
    pub inline: Option<Bytes>,
}

/// A compiled mount point
#[derive(Debug, Clone)]
struct Mount {
    prefix: String,
    kind: MountKind,
    path: PathBuf,
    body: Option<Bytes>,
    mime: Option<String>,
}

/// Ordered set of mounts
#[derive(Debug, Clone, Default)]
pub struct MountTable {
    mounts: Vec<Mount>,
}

impl MountTable {
    pub fn new(configs: &[MountConfig]) -> Self {
        let mut mounts: Vec<Mount> = configs
            .iter()
            .map(|cfg| Mount {
                prefix: normalize_prefix(&cfg.prefix),
                kind: cfg.kind,
                path: PathBuf::from(&cfg.path),
                body: cfg.body.clone().map(Bytes::from),
                mime: cfg.mime.clone().filter(|m| !m.trim().is_empty()),
            })
            .collect();
        // Longest prefix first; stable sort keeps configuration order for ties
        mounts.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { mounts }
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Resolve a raw request path (still percent-encoded)
    pub fn resolve(&self, request_path: &str) -> Option<ServeTarget> {
        let path = percent_decode_str(request_path).decode_utf8().ok()?;
        if path.contains('\0') {
            return None;
        }

        let (mount, rest) = self
            .mounts
            .iter()
            .find_map(|m| strip_mount_prefix(&m.prefix, &path).map(|rest| (m, rest)))?;

        match mount.kind {
            MountKind::Dir => {
                let relative = sanitize_relative(rest)?;
                Some(ServeTarget {
                    source: mount.path.join(&relative),
                    logical_name: relative,
                    mime: mount.mime.clone(),
                    inline: None,
                })
            }
            MountKind::File => Some(ServeTarget {
                source: mount.path.clone(),
                logical_name: file_name(&mount.path),
                mime: mount.mime.clone(),
                inline: None,
            }),
            MountKind::Content => Some(ServeTarget {
                source: mount.path.clone(),
                logical_name: path.trim_start_matches('/').to_string(),
                mime: mount.mime.clone(),
                inline: Some(mount.body.clone().unwrap_or_default()),
            }),
        }
    }
}

/// "/media/" and "media" both become "/media"; "/" stays "/"
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    format!("/{trimmed}")
}

/// Strip `prefix` from `path` when it ends on a segment boundary
fn strip_mount_prefix<'a>(prefix: &str, path: &'a str) -> Option<&'a str> {
    if prefix == "/" {
        return Some(path);
    }
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

/// Turn the remainder of a dir mount into a safe relative path
///
/// Rejects `..` segments, backslashes and empty results (directory roots are
/// not served).
fn sanitize_relative(rest: &str) -> Option<String> {
    let mut segments = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') => return None,
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
