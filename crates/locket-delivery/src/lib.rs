//! LOCKET Delivery - gated, paced asset fan-out
//!
//! This crate provides:
//! - The outbound transport seam (typed send primitives)
//! - The delivery pipeline: membership re-check, record resolution,
//!   best-effort preview, and the per-asset fault-tolerant send loop

pub mod transport;
pub mod pipeline;

pub use transport::*;
pub use pipeline::*;
