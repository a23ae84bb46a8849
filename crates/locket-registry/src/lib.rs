//! LOCKET Registry - content catalog and persistence
//!
//! This crate provides:
//! - The content registry (lookup, insert, recent listing, stats)
//! - The persistence backend seam and the JSON snapshot backend

pub mod registry;
pub mod store;

pub use registry::*;
pub use store::*;
