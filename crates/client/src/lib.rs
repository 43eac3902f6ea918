//! Client side of docvault.
//!
//! Documents are sealed on this side of the wire and only the resulting
//! envelope is ever sent to the store.
//!
//! - [`transfer`]: the [`transfer::Transfer`] contract and its HTTP implementation.
//! - [`workflow`]: the Editable/Locked [`workflow::Editor`] state machine.
//! - [`cli`]: the `docvault` command-line front end.

pub mod cli;
pub mod telemetry;
pub mod transfer;
pub mod workflow;
