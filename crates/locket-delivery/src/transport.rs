//! Outbound transport seam
//!
//! The external bot transport supplies these primitives. Asset handles are
//! opaque capability strings passed straight through.

use async_trait::async_trait;
use thiserror::Error;

use locket_core::{ActorId, AssetKind, AssetRef};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        TransportError(reason.into())
    }
}

/// Handle of an already-sent message, for later edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef(pub i64);

/// Typed outbound send primitives.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(&self, to: ActorId, text: &str) -> Result<MessageRef, TransportError>;

    async fn send_image(
        &self,
        to: ActorId,
        handle: &str,
        caption: Option<&str>,
    ) -> Result<(), TransportError>;

    async fn send_video(&self, to: ActorId, handle: &str) -> Result<(), TransportError>;

    async fn send_document(&self, to: ActorId, handle: &str) -> Result<(), TransportError>;

    async fn send_audio(&self, to: ActorId, handle: &str) -> Result<(), TransportError>;

    async fn edit_message(
        &self,
        to: ActorId,
        message: MessageRef,
        text: &str,
    ) -> Result<(), TransportError>;

    /// Acknowledge a button press, optionally as a modal alert.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: &str,
        alert: bool,
    ) -> Result<(), TransportError>;

    /// Dispatch one asset through its kind-matched primitive.
    async fn send_asset(&self, to: ActorId, asset: &AssetRef) -> Result<(), TransportError> {
        match asset.kind {
            AssetKind::Video => self.send_video(to, &asset.handle).await,
            AssetKind::Document => self.send_document(to, &asset.handle).await,
            AssetKind::Audio => self.send_audio(to, &asset.handle).await,
            AssetKind::Image => self.send_image(to, &asset.handle, None).await,
        }
    }
}
