//! Receive-path interface logic
//!
//! This module holds the parts of the stack that decide what happens to a
//! received frame:
//! - Filter configuration
//! - Endpoint lookups
//! - Admission checks and the option normalizer
//! - Rate-limited diagnostics

pub mod config;
pub mod diagnostics;
pub mod endpoint;
pub mod filter;
pub mod options;

// Re-export commonly used items
pub use config::FilterConfig;
pub use diagnostics::{RateLimitedLog, DEFAULT_DIAGNOSTIC_LIMIT};
pub use endpoint::{Endpoint, EndpointLookup, EndpointTable};
pub use filter::{IngressFilter, Verdict};
pub use options::normalize_options;
