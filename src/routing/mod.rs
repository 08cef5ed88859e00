//! Routing module
//!
//! Virtual filesystem: resolves request paths to serve targets.

pub mod mounts;

pub use mounts::{MountTable, ServeTarget};
