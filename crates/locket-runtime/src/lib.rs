//! LOCKET Runtime - event routing and operator surface
//!
//! This crate wires the core components together:
//! 1. Classify inbound events (commands, raw content, button presses)
//! 2. Gate content access through membership checks
//! 3. Drive the submission state machine for operators
//! 4. Hand deep-link requests to the delivery pipeline
//! 5. Serve the operator surface (stats, listings, diagnostics)
//!
//! Process bootstrap and the concrete bot transport live outside this
//! workspace; they feed events in and implement the transport/oracle
//! seams.

pub mod config;
pub mod event;
pub mod prompts;
pub mod router;
pub mod telemetry;

pub use config::*;
pub use event::*;
pub use router::*;
