//! LOCKET Session - submission dialogue state
//!
//! This crate provides:
//! - The per-actor session store with per-actor-id mutual exclusion
//! - The submission state machine
//!   (awaiting_title -> awaiting_poster -> collecting_files -> finish/cancel)

pub mod session;
pub mod machine;

pub use session::*;
pub use machine::*;
