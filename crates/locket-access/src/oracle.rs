//! Membership oracle seam
//!
//! The oracle is the external transport's channel-membership query. The
//! gate treats it as a single fallible round-trip; it never retries and
//! never caches.

use async_trait::async_trait;
use thiserror::Error;

use locket_core::{ActorId, ChannelId};

/// Concrete membership status reported by the oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MembershipStatus {
    Member,
    Administrator,
    Creator,
    Restricted,
    Left,
    Banned,
}

impl MembershipStatus {
    /// Statuses that grant content access.
    pub fn grants_access(self) -> bool {
        matches!(
            self,
            MembershipStatus::Member | MembershipStatus::Administrator | MembershipStatus::Creator
        )
    }
}

/// Oracle failure classes, mapped from the transport's error surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The actor has no membership entry in the channel at all.
    #[error("actor not found in channel")]
    ActorNotFound,

    /// The gate itself is not a recognized member/admin of the channel and
    /// cannot see its member list.
    #[error("no visibility into channel membership")]
    NoChannelVisibility,

    /// The configured channel does not exist.
    #[error("channel does not exist")]
    ChannelMissing,

    #[error("oracle failure: {0}")]
    Other(String),
}

/// Channel-membership query, implemented by the external transport.
#[async_trait]
pub trait MembershipOracle: Send + Sync {
    async fn member_status(
        &self,
        channel: &ChannelId,
        actor: ActorId,
    ) -> Result<MembershipStatus, OracleError>;
}
