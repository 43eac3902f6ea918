//! Limits applied by the router's middleware stack.
//!
//! Request tracing and response compression take no parameters; the request
//! timeout and the body size limit come from configuration.

use std::time::Duration;

use crate::config::Config;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum request body size, in bytes.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// Transport-level limits for the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Requests still running after this long receive `408 Request Timeout`.
    pub request_timeout: Duration,
    /// Bodies larger than this are rejected with `413 Payload Too Large`.
    pub max_body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            request_timeout: REQUEST_TIMEOUT,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

impl From<&Config> for Limits {
    fn from(cfg: &Config) -> Self {
        Self {
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
            max_body_bytes: cfg.max_body_bytes,
        }
    }
}
