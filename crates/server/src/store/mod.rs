//! Create-once / read-once storage for sealed documents.
//!
//! # Lifecycle
//!
//! 1. [`DocumentStore::save`] inserts an envelope under a name that is not in use.
//! 2. The envelope waits in memory, untouched and never decoded.
//! 3. The first [`DocumentStore::load`] for that name returns the envelope and
//!    removes it in the same step. Every later load sees
//!    [`StoreError::NotFound`].
//!
//! # Invariants
//!
//! - At most one live document per name. A save for a name in use fails with
//!   [`StoreError::Conflict`] and leaves the existing entry intact.
//! - Check-then-act is indivisible: of two racing saves exactly one succeeds,
//!   of two racing loads exactly one receives the content.
//! - Nothing survives a process restart.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use common::protocol::is_reserved_name;
use common::ServiceError;
use thiserror::Error;

/// Outcomes that reject a store operation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The name or the content was empty.
    #[error("Missing name or content")]
    Validation,

    /// The name is `.` or `..`, which cannot be addressed by a load.
    #[error("Invalid document name")]
    InvalidName,

    /// A document with this name is already stored.
    #[error("Document already exists")]
    Conflict,

    /// No document with this name is stored.
    #[error("Document not found")]
    NotFound,
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::Validation | StoreError::InvalidName => ServiceError::Validation(message),
            StoreError::Conflict => ServiceError::Conflict(message),
            StoreError::NotFound => ServiceError::NotFound(message),
        }
    }
}

/// Keyed collection of opaque envelope strings.
///
/// Implementations own their synchronisation; callers hold an
/// `Arc<dyn DocumentStore>` and never lock anything themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `content` under `name` if the name is free.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if either argument is empty.
    /// - [`StoreError::InvalidName`] if `name` is `.` or `..`.
    /// - [`StoreError::Conflict`] if `name` is already stored.
    async fn save(&self, name: &str, content: String) -> Result<(), StoreError>;

    /// Remove and return the content stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `name` is not stored.
    async fn load(&self, name: &str) -> Result<String, StoreError>;

    /// Number of documents waiting to be loaded.
    async fn len(&self) -> usize;
}

/// Reject empty or unaddressable names and empty content before any state is
/// touched.
pub(crate) fn validate(name: &str, content: &str) -> Result<(), StoreError> {
    if name.is_empty() || content.is_empty() {
        return Err(StoreError::Validation);
    }
    if is_reserved_name(name) {
        return Err(StoreError::InvalidName);
    }
    Ok(())
}
