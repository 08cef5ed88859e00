// Configuration module entry point
// Loads layered configuration and exposes the runtime state

mod snapshot;
mod state;
mod types;

use std::net::SocketAddr;

use crate::error::{Error, Result};

// Re-export public types
pub use snapshot::ServeConfig;
pub use state::AppState;
pub use types::{
    AccessConfig, Config, HttpConfig, LoggingConfig, MimeConfig, MimeOverrideConfig, MountConfig,
    MountKind, PerformanceConfig, ServerConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load configuration from TOML text layered over the defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| Error::Address(format!("{}:{} ({e})", self.server.host, self.server.port)))
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("http.server_name", "static-range-server")?
        .set_default("access.allow_referer", "")?)
}
