//! LOCKET Access Gate - membership-gated admission
//!
//! This crate provides:
//! - The membership oracle seam (external channel-membership query)
//! - The access gate policy: privileged bypass, status mapping, and the
//!   configurable fallback for indeterminate checks

pub mod oracle;
pub mod gate;

pub use oracle::*;
pub use gate::*;
