//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with the transfer-protocol routes and shared middleware.
//! - Inject shared application state (`AppState`) into handlers.
//! - Map store outcomes one-to-one onto HTTP status codes.
//!
//! TLS is terminated by the hosting environment, not here.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
