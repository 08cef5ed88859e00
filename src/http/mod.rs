//! HTTP protocol layer module
//!
//! Range resolution, cache validation, MIME resolution, referer gating and
//! response builders, decoupled from routing and file access.

pub mod cache;
pub mod mime;
pub mod pattern;
pub mod range;
pub mod referer;
pub mod response;

// Re-export commonly used types
pub use range::RangeOutcome;
pub use referer::AccessDecision;
pub use response::{
    build_403_response, build_404_response, build_405_response, build_options_response,
    ResponseBody,
};
