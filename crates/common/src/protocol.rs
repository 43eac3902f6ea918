//! Request and response types exchanged between the client and the document store.
//!
//! These types are serialised as JSON over the HTTP transfer protocol. The
//! `content` carried by every type is an opaque envelope string; nothing in
//! this module knows how to decrypt it.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Save endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /save`.
///
/// Missing fields deserialise as empty strings so that the store's validation
/// rejects them with a single, uniform error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Caller-chosen unique document name.
    #[serde(default)]
    pub name: String,
    /// Serialised envelope (`{"iv":…,"data":…}`) to store.
    #[serde(default)]
    pub content: String,
}

/// Successful response body for `POST /save`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Whether `name` is a path segment that URL normalisation removes.
///
/// `GET /load/.` and `GET /load/..` never reach the load route, so documents
/// under these names could be saved but never loaded.
pub fn is_reserved_name(name: &str) -> bool {
    matches!(name, "." | "..")
}

// ---------------------------------------------------------------------------
// Load endpoint
// ---------------------------------------------------------------------------

/// Successful response body for `GET /load/{name}`.
///
/// Delivering this body removes the document from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResponse {
    /// The stored envelope string, exactly as it was saved.
    pub content: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"conflict"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.message())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status; always `"ok"` while the process is serving.
    pub status: String,
    /// Number of documents currently waiting to be retrieved.
    pub documents_stored: usize,
}
