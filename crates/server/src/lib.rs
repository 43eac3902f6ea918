//! `docvault-server`: the ciphertext-only document store.
//!
//! The store accepts opaque envelope strings under caller-chosen names and
//! hands each one out at most once. It never sees a passkey, a key, or
//! plaintext; see the `envelope` crate for the client-side cryptography.
//!
//! - [`store`]: the [`store::DocumentStore`] abstraction and its in-memory implementation.
//! - [`server`]: Axum router, handlers, and shared state (the HTTP transfer protocol).
//! - [`config`]: environment-driven configuration.
//! - [`telemetry`]: tracing subscriber and optional OTLP export.

pub mod config;
pub mod server;
pub mod store;
pub mod telemetry;
