//! LOCKET Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout LOCKET:
//! - Identifiers (ActorId, ChannelId, ContentId)
//! - The content model (AssetKind, AssetRef, ContentRecord)
//! - Content id generation
//! - Error taxonomy

pub mod id;
pub mod record;
pub mod error;

pub use id::*;
pub use record::*;
pub use error::*;
