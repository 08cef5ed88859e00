// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub mime: MimeConfig,
    #[serde(default)]
    pub routes: Vec<MountConfig>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Keep-alive is disabled when 0
    pub keep_alive_timeout: u64,
    /// Seconds allowed for reading request headers
    pub read_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
}

/// Referer gating configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AccessConfig {
    /// Glob pattern for allowed referer hosts; empty disables gating
    #[serde(default)]
    pub allow_referer: String,
}

/// MIME override configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MimeConfig {
    /// Ordered glob → MIME table, first match wins
    #[serde(default)]
    pub overrides: Vec<MimeOverrideConfig>,
}

/// One MIME override entry; a type of `auto` defers to extension detection
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MimeOverrideConfig {
    pub pattern: String,
    #[serde(rename = "type")]
    pub mime: String,
}

/// A mount point of the virtual filesystem
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MountConfig {
    /// URL path prefix, e.g. "/media"
    pub prefix: String,
    #[serde(rename = "type")]
    pub kind: MountKind,
    /// Directory, file, or (for `content`) the file providing freshness metadata
    pub path: String,
    /// Inline body served by `content` mounts
    #[serde(default)]
    pub body: Option<String>,
    /// Explicit MIME type for everything under this mount
    #[serde(default)]
    pub mime: Option<String>,
}

/// Mount types
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MountKind {
    Dir,
    File,
    Content,
}
