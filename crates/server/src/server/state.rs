//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::store::{DocumentStore, MemoryStore};

/// Application state shared across all request handlers.
///
/// Cheap to clone: the store sits behind an `Arc`, so every request sees the
/// same documents.
#[derive(Clone)]
pub struct AppState {
    /// The document store backing `/save` and `/load`.
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Create a new [`AppState`] around the provided store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

impl Default for AppState {
    /// Creates an [`AppState`] over an empty [`MemoryStore`].
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}
