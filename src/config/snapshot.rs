// Configuration snapshot module
// Compiled, read-only view of the configuration used by request handling

use super::types::Config;
use crate::error::Result;
use crate::http::mime::MimeOverride;
use crate::http::pattern::GlobPattern;
use crate::routing::MountTable;

/// Per-request configuration, swapped as a whole on reload
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Allowed referer hosts; `None` disables gating
    pub allow_referer: Option<GlobPattern>,
    /// Ordered MIME override table
    pub mime_overrides: Vec<MimeOverride>,
    pub mounts: MountTable,
    pub server_name: String,
    pub access_log: bool,
    pub access_log_format: String,
    pub access_log_file: Option<String>,
    pub error_log_file: Option<String>,
}

impl ServeConfig {
    /// Compile glob patterns and the mount table
    pub fn compile(config: &Config) -> Result<Self> {
        let allow_referer = GlobPattern::optional(&config.access.allow_referer)?;
        let mime_overrides = config
            .mime
            .overrides
            .iter()
            .map(|entry| MimeOverride::new(&entry.pattern, entry.mime.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            allow_referer,
            mime_overrides,
            mounts: MountTable::new(&config.routes),
            server_name: config.http.server_name.clone(),
            access_log: config.logging.access_log,
            access_log_format: config.logging.access_log_format.clone(),
            access_log_file: config.logging.access_log_file.clone(),
            error_log_file: config.logging.error_log_file.clone(),
        })
    }
}
