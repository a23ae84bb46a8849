//! Delivery pipeline
//!
//! Re-checks the access gate (a prior allow is not trusted to persist),
//! resolves the content record, then fans out every stored asset through
//! the transport with a fixed inter-send delay. Delivery is best-effort
//! per asset, never all-or-nothing: one transport hiccup must not forfeit
//! the rest of a multi-file bundle.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use locket_access::AccessGate;
use locket_core::{ActorId, ContentId};
use locket_registry::ContentRegistry;

use crate::Transport;

/// Default minimum delay between consecutive asset sends.
pub const DEFAULT_SEND_PACE: Duration = Duration::from_secs(1);

/// Tally of one delivery run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub requested: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Outcome of a delivery request. The caller composes the user-facing
/// summary; this component only reports what happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Membership re-check came back as a hard deny; no work performed.
    NotSubscribed,
    /// Unknown content id.
    NotFound,
    /// Record had zero assets; unreachable given the commit invariant,
    /// but checked.
    NoAssets,
    Delivered(DeliveryReport),
}

/// Gated, paced asset fan-out.
pub struct DeliveryPipeline {
    gate: Arc<AccessGate>,
    registry: Arc<ContentRegistry>,
    transport: Arc<dyn Transport>,
    pace: Duration,
}

impl DeliveryPipeline {
    pub fn new(
        gate: Arc<AccessGate>,
        registry: Arc<ContentRegistry>,
        transport: Arc<dyn Transport>,
        pace: Duration,
    ) -> Self {
        DeliveryPipeline {
            gate,
            registry,
            transport,
            pace,
        }
    }

    /// Deliver every asset of a content record to an actor.
    ///
    /// Runs to completion once started; there is no mid-delivery cancel.
    /// The inter-send delay suspends only this delivery, not deliveries
    /// for other actors.
    pub async fn deliver(&self, actor: ActorId, id: &ContentId) -> DeliveryOutcome {
        if !self.gate.permits(actor).await {
            info!(%actor, %id, "delivery refused: not subscribed");
            return DeliveryOutcome::NotSubscribed;
        }

        let Some(record) = self.registry.get(id) else {
            info!(%actor, %id, "delivery refused: unknown content id");
            return DeliveryOutcome::NotFound;
        };

        if record.assets.is_empty() {
            warn!(%id, "record has no assets");
            return DeliveryOutcome::NoAssets;
        }

        // Cosmetic preview; a failure here must not abort the delivery.
        if let Some(poster) = &record.poster {
            let caption = format!(
                "{}\nPreparing {} file(s) for you...",
                record.title,
                record.assets.len()
            );
            if let Err(e) = self
                .transport
                .send_image(actor, poster, Some(&caption))
                .await
            {
                warn!(%actor, %id, error = %e, "preview send failed");
            }
        }

        let mut report = DeliveryReport {
            requested: record.assets.len(),
            ..DeliveryReport::default()
        };

        for (index, asset) in record.assets.iter().enumerate() {
            match self.transport.send_asset(actor, asset).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        %actor, %id, index, kind = asset.kind.as_str(), error = %e,
                        "asset send failed"
                    );
                }
            }
            if index + 1 < record.assets.len() {
                sleep(self.pace).await;
            }
        }

        info!(
            %actor, %id,
            requested = report.requested, sent = report.sent, failed = report.failed,
            "delivery complete"
        );
        DeliveryOutcome::Delivered(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashSet;

    use locket_access::{FallbackPolicy, MembershipOracle, MembershipStatus, OracleError};
    use locket_core::{AssetKind, AssetRef, ChannelId, ContentRecord};
    use locket_registry::NullStore;

    use crate::{MessageRef, TransportError};

    struct StaticOracle(Result<MembershipStatus, OracleError>);

    #[async_trait]
    impl MembershipOracle for StaticOracle {
        async fn member_status(
            &self,
            _channel: &ChannelId,
            _actor: ActorId,
        ) -> Result<MembershipStatus, OracleError> {
            self.0.clone()
        }
    }

    /// Transport double that records calls and fails selected handles.
    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<String>>,
        failing: Mutex<HashSet<String>>,
    }

    impl RecordingTransport {
        fn fail_on(&self, handle: &str) {
            self.failing.lock().insert(handle.to_string());
        }

        fn log(&self) -> Vec<String> {
            self.sent.lock().clone()
        }

        fn attempt(&self, label: String, handle: &str) -> Result<(), TransportError> {
            if self.failing.lock().contains(handle) {
                return Err(TransportError::new("injected failure"));
            }
            self.sent.lock().push(label);
            Ok(())
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send_text(&self, _to: ActorId, text: &str) -> Result<MessageRef, TransportError> {
            self.attempt(format!("text:{text}"), text)?;
            Ok(MessageRef(1))
        }

        async fn send_image(
            &self,
            _to: ActorId,
            handle: &str,
            _caption: Option<&str>,
        ) -> Result<(), TransportError> {
            self.attempt(format!("image:{handle}"), handle)
        }

        async fn send_video(&self, _to: ActorId, handle: &str) -> Result<(), TransportError> {
            self.attempt(format!("video:{handle}"), handle)
        }

        async fn send_document(&self, _to: ActorId, handle: &str) -> Result<(), TransportError> {
            self.attempt(format!("document:{handle}"), handle)
        }

        async fn send_audio(&self, _to: ActorId, handle: &str) -> Result<(), TransportError> {
            self.attempt(format!("audio:{handle}"), handle)
        }

        async fn edit_message(
            &self,
            _to: ActorId,
            _message: MessageRef,
            text: &str,
        ) -> Result<(), TransportError> {
            self.attempt(format!("edit:{text}"), text)
        }

        async fn answer_callback(
            &self,
            _callback_id: &str,
            text: &str,
            _alert: bool,
        ) -> Result<(), TransportError> {
            self.attempt(format!("answer:{text}"), text)
        }
    }

    const MEMBER: ActorId = ActorId(5);

    fn record(id: &str, poster: Option<&str>, handles: &[&str]) -> ContentRecord {
        ContentRecord {
            id: ContentId::from(id),
            title: "Movie X".into(),
            poster: poster.map(str::to_string),
            assets: handles
                .iter()
                .map(|h| AssetRef::new(AssetKind::Video, *h))
                .collect(),
            created_at: 1,
            created_by: ActorId::new(7),
        }
    }

    fn pipeline_with(
        oracle: Result<MembershipStatus, OracleError>,
        records: Vec<ContentRecord>,
    ) -> (DeliveryPipeline, Arc<RecordingTransport>) {
        let registry = Arc::new(ContentRegistry::open(Arc::new(NullStore)));
        for r in records {
            registry.put(r).unwrap();
        }
        let gate = Arc::new(AccessGate::new(
            ChannelId::new("@channel"),
            HashSet::new(),
            Arc::new(StaticOracle(oracle)),
            FallbackPolicy::FailOpen,
        ));
        let transport = Arc::new(RecordingTransport::default());
        let pipeline = DeliveryPipeline::new(
            gate,
            registry,
            transport.clone(),
            Duration::from_millis(0),
        );
        (pipeline, transport)
    }

    #[tokio::test]
    async fn test_denied_actor_performs_no_work() {
        let (pipeline, transport) = pipeline_with(
            Ok(MembershipStatus::Left),
            vec![record("42", Some("p"), &["v1"])],
        );

        let outcome = pipeline.deliver(ActorId::new(999), &ContentId::from("42")).await;
        assert_eq!(outcome, DeliveryOutcome::NotSubscribed);
        assert!(transport.log().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_sends_nothing() {
        let (pipeline, transport) = pipeline_with(Ok(MembershipStatus::Member), vec![]);

        let outcome = pipeline.deliver(MEMBER, &ContentId::from("nope")).await;
        assert_eq!(outcome, DeliveryOutcome::NotFound);
        assert!(transport.log().is_empty());
    }

    #[tokio::test]
    async fn test_poster_then_assets_in_order() {
        let (pipeline, transport) = pipeline_with(
            Ok(MembershipStatus::Member),
            vec![record("42", Some("poster"), &["v1", "v2"])],
        );

        let outcome = pipeline.deliver(MEMBER, &ContentId::from("42")).await;
        assert_eq!(
            outcome,
            DeliveryOutcome::Delivered(DeliveryReport {
                requested: 2,
                sent: 2,
                failed: 0
            })
        );
        assert_eq!(
            transport.log(),
            vec!["image:poster", "video:v1", "video:v2"]
        );
    }

    #[tokio::test]
    async fn test_partial_failures_counted_no_early_abort() {
        let (pipeline, transport) = pipeline_with(
            Ok(MembershipStatus::Member),
            vec![record("42", None, &["v1", "v2", "v3", "v4", "v5"])],
        );
        for h in ["v1", "v3", "v5"] {
            transport.fail_on(h);
        }

        let outcome = pipeline.deliver(MEMBER, &ContentId::from("42")).await;
        assert_eq!(
            outcome,
            DeliveryOutcome::Delivered(DeliveryReport {
                requested: 5,
                sent: 2,
                failed: 3
            })
        );
        // All five were attempted; the survivors arrived in stored order.
        assert_eq!(transport.log(), vec!["video:v2", "video:v4"]);
    }

    #[tokio::test]
    async fn test_preview_failure_does_not_abort() {
        let (pipeline, transport) = pipeline_with(
            Ok(MembershipStatus::Member),
            vec![record("42", Some("bad-poster"), &["v1"])],
        );
        transport.fail_on("bad-poster");

        let outcome = pipeline.deliver(MEMBER, &ContentId::from("42")).await;
        assert_eq!(
            outcome,
            DeliveryOutcome::Delivered(DeliveryReport {
                requested: 1,
                sent: 1,
                failed: 0
            })
        );
        assert_eq!(transport.log(), vec!["video:v1"]);
    }

    #[tokio::test]
    async fn test_indeterminate_fail_open_still_delivers() {
        let (pipeline, transport) = pipeline_with(
            Err(OracleError::NoChannelVisibility),
            vec![record("42", None, &["v1"])],
        );

        let outcome = pipeline.deliver(MEMBER, &ContentId::from("42")).await;
        assert!(matches!(outcome, DeliveryOutcome::Delivered(_)));
        assert_eq!(transport.log(), vec!["video:v1"]);
    }

    #[tokio::test]
    async fn test_mixed_kinds_use_matching_primitives() {
        let registry = Arc::new(ContentRegistry::open(Arc::new(NullStore)));
        registry
            .put(ContentRecord {
                id: ContentId::from("mix"),
                title: "Mixed".into(),
                poster: None,
                assets: vec![
                    AssetRef::new(AssetKind::Video, "v"),
                    AssetRef::new(AssetKind::Document, "d"),
                    AssetRef::new(AssetKind::Audio, "a"),
                    AssetRef::new(AssetKind::Image, "i"),
                ],
                created_at: 1,
                created_by: ActorId::new(7),
            })
            .unwrap();
        let gate = Arc::new(AccessGate::new(
            ChannelId::new("@channel"),
            HashSet::new(),
            Arc::new(StaticOracle(Ok(MembershipStatus::Member))),
            FallbackPolicy::FailOpen,
        ));
        let transport = Arc::new(RecordingTransport::default());
        let pipeline = DeliveryPipeline::new(
            gate,
            registry,
            transport.clone(),
            Duration::from_millis(0),
        );

        pipeline.deliver(MEMBER, &ContentId::from("mix")).await;
        assert_eq!(
            transport.log(),
            vec!["video:v", "document:d", "audio:a", "image:i"]
        );
    }
}
