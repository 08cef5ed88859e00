//! Static file server with single byte-range support, conditional requests,
//! referer gating and configurable MIME resolution.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use error::{Error, Result};
