//! Inbound event model
//!
//! The external dispatcher classifies transport updates into these shapes
//! before they reach the router. Handles are opaque capability strings.

use locket_core::ActorId;
use locket_delivery::MessageRef;

/// One classified inbound event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundEvent {
    pub actor: ActorId,
    pub payload: EventPayload,
}

impl InboundEvent {
    pub fn new(actor: ActorId, payload: EventPayload) -> Self {
        InboundEvent { actor, payload }
    }

    pub fn command(actor: ActorId, name: &str, args: &[&str]) -> Self {
        InboundEvent::new(
            actor,
            EventPayload::Command {
                name: name.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
            },
        )
    }
}

/// Payload variants produced by the external dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventPayload {
    /// Slash command with pre-split arguments.
    Command { name: String, args: Vec<String> },
    /// Free-text message.
    Text(String),
    /// Image message.
    Photo { handle: String },
    /// Video message.
    Video { handle: String },
    /// Document message.
    Document { handle: String },
    /// Audio message.
    Audio { handle: String },
    /// Button press with an opaque payload string. The originating message
    /// is carried so the router can edit it in place.
    Callback {
        id: String,
        message: Option<MessageRef>,
        data: String,
    },
}
