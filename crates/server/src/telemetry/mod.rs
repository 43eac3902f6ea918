//! Tracing subscriber setup with optional OpenTelemetry span export.
//!
//! # Telemetry invariants
//!
//! - **No document content, passkey, or key material** may appear in any span
//!   attribute or log field. The store only ever holds ciphertext, but
//!   envelopes are still never logged.
//! - Log level is configurable via `DOCVAULT_LOG_LEVEL` (default: `info`);
//!   `RUST_LOG` takes precedence when set.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
