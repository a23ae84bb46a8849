//! Access gate policy

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info, warn};

use locket_core::{ActorId, ChannelId};

use crate::{MembershipOracle, OracleError};

/// Outcome of a single membership check. Ephemeral; never cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied,
    /// The oracle could not be evaluated; the configured fallback decides.
    Indeterminate,
}

/// How an indeterminate check resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Treat indeterminate as allowed. Availability over strictness; the
    /// gate logs loudly when this path is taken.
    FailOpen,
    /// Treat indeterminate as denied.
    FailClosed,
}

/// Membership-gated admission check.
///
/// Privileged identities bypass the oracle entirely. Everyone else costs
/// one oracle round-trip per check; check volume is bounded by
/// human-driven request rate, so there is no cache.
pub struct AccessGate {
    channel: ChannelId,
    privileged: HashSet<ActorId>,
    oracle: Arc<dyn MembershipOracle>,
    fallback: FallbackPolicy,
}

impl AccessGate {
    pub fn new(
        channel: ChannelId,
        privileged: HashSet<ActorId>,
        oracle: Arc<dyn MembershipOracle>,
        fallback: FallbackPolicy,
    ) -> Self {
        AccessGate {
            channel,
            privileged,
            oracle,
            fallback,
        }
    }

    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    pub fn is_privileged(&self, actor: ActorId) -> bool {
        self.privileged.contains(&actor)
    }

    pub fn privileged_count(&self) -> usize {
        self.privileged.len()
    }

    /// Run one membership check. A single oracle round-trip, no retries.
    pub async fn check(&self, actor: ActorId) -> AccessDecision {
        if self.privileged.contains(&actor) {
            return AccessDecision::Allowed;
        }

        match self.oracle.member_status(&self.channel, actor).await {
            Ok(status) if status.grants_access() => {
                info!(%actor, ?status, "membership check passed");
                AccessDecision::Allowed
            }
            Ok(status) => {
                info!(%actor, ?status, "membership check failed");
                AccessDecision::Denied
            }
            Err(OracleError::ActorNotFound) => {
                info!(%actor, channel = %self.channel, "actor not found in channel");
                AccessDecision::Denied
            }
            Err(OracleError::NoChannelVisibility) => {
                warn!(
                    channel = %self.channel,
                    "gate has no visibility into channel membership; falling back to {:?}",
                    self.fallback
                );
                AccessDecision::Indeterminate
            }
            Err(OracleError::ChannelMissing) => {
                error!(channel = %self.channel, "configured channel does not exist");
                AccessDecision::Denied
            }
            Err(OracleError::Other(reason)) => {
                warn!(%actor, %reason, "membership oracle failure");
                AccessDecision::Denied
            }
        }
    }

    /// Check and resolve indeterminate outcomes through the fallback
    /// policy.
    pub async fn permits(&self, actor: ActorId) -> bool {
        match self.check(actor).await {
            AccessDecision::Allowed => true,
            AccessDecision::Denied => false,
            AccessDecision::Indeterminate => match self.fallback {
                FallbackPolicy::FailOpen => true,
                FallbackPolicy::FailClosed => false,
            },
        }
    }
}
