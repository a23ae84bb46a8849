//! Event router
//!
//! Routes classified inbound events to the access gate, the submission
//! state machine, and the delivery pipeline, and composes the user-facing
//! replies. Every handler catches its own faults; nothing here is allowed
//! to propagate an error up to the hosting process.

use std::sync::Arc;

use tracing::{debug, warn};

use locket_access::{AccessGate, MembershipOracle};
use locket_core::{ActorId, AssetKind, AssetRef, ContentId};
use locket_delivery::{DeliveryOutcome, DeliveryPipeline, MessageRef, Transport};
use locket_registry::{ContentRegistry, PersistenceBackend};
use locket_session::{FinishError, StartOutcome, SubmissionMachine, SubmitOutcome};

use crate::prompts;
use crate::{Config, EventPayload, InboundEvent};

/// Callback payload strings understood by the router.
mod callback {
    pub const VERIFY: &str = "verify";
    pub const FINISH: &str = "finish";
    pub const MORE: &str = "more";
    pub const CANCEL: &str = "cancel";
    pub const COPY_PREFIX: &str = "copy:";
    pub const FEEDBACK_PREFIX: &str = "feedback:";
}

/// The event router. One instance serves all actors; handlers for
/// different actors may run concurrently.
pub struct Router {
    config: Config,
    gate: Arc<AccessGate>,
    registry: Arc<ContentRegistry>,
    machine: SubmissionMachine,
    pipeline: DeliveryPipeline,
    transport: Arc<dyn Transport>,
}

impl Router {
    pub fn new(
        config: Config,
        oracle: Arc<dyn MembershipOracle>,
        transport: Arc<dyn Transport>,
        backend: Arc<dyn PersistenceBackend>,
    ) -> Self {
        let registry = Arc::new(ContentRegistry::open(backend));
        let gate = Arc::new(AccessGate::new(
            config.channel.clone(),
            config.privileged.clone(),
            oracle,
            config.fallback,
        ));
        let machine = SubmissionMachine::new(registry.clone(), config.privileged.clone());
        let pipeline = DeliveryPipeline::new(
            gate.clone(),
            registry.clone(),
            transport.clone(),
            config.pace,
        );

        Router {
            config,
            gate,
            registry,
            machine,
            pipeline,
            transport,
        }
    }

    pub fn registry(&self) -> &Arc<ContentRegistry> {
        &self.registry
    }

    /// Handle one classified inbound event.
    pub async fn handle(&self, event: InboundEvent) {
        let actor = event.actor;
        match event.payload {
            EventPayload::Command { name, args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                match name.trim_start_matches('/') {
                    "start" => self.on_start(actor, args.first().copied()).await,
                    "additem" => self.on_additem(actor).await,
                    "stats" => self.on_stats(actor).await,
                    "listitems" => self.on_listitems(actor).await,
                    "checkaccess" => self.on_checkaccess(actor).await,
                    "broadcast" => self.on_broadcast(actor, &args).await,
                    other => debug!(%actor, command = other, "unknown command ignored"),
                }
            }
            EventPayload::Text(text) => self.on_text(actor, &text).await,
            EventPayload::Photo { handle } => self.on_photo(actor, &handle).await,
            EventPayload::Video { handle } => {
                self.on_asset(actor, AssetKind::Video, &handle).await
            }
            EventPayload::Document { handle } => {
                self.on_asset(actor, AssetKind::Document, &handle).await
            }
            EventPayload::Audio { handle } => {
                self.on_asset(actor, AssetKind::Audio, &handle).await
            }
            EventPayload::Callback { id, message, data } => {
                self.on_callback(actor, &id, message, &data).await
            }
        }
    }

    // ---- start & delivery ----

    async fn on_start(&self, actor: ActorId, deep_arg: Option<&str>) {
        match deep_arg {
            Some(arg) => self.deliver_item(actor, &ContentId::from(arg)).await,
            None => {
                if self.gate.is_privileged(actor) {
                    self.reply(actor, &prompts::welcome_operator()).await;
                } else if self.gate.permits(actor).await {
                    self.reply(actor, &prompts::welcome_member()).await;
                } else {
                    self.send_join_prompt(actor, None).await;
                }
            }
        }
    }

    async fn deliver_item(&self, actor: ActorId, id: &ContentId) {
        // Title resolved up front so the completion summary can name it.
        let title = self.registry.get(id).map(|r| r.title);

        match self.pipeline.deliver(actor, id).await {
            DeliveryOutcome::NotSubscribed => self.send_join_prompt(actor, Some(id)).await,
            DeliveryOutcome::NotFound => {
                self.reply(actor, "Item not found or the link has expired.")
                    .await;
            }
            DeliveryOutcome::NoAssets => {
                self.reply(actor, "No files are available for this item.")
                    .await;
            }
            DeliveryOutcome::Delivered(report) => {
                let title = title.unwrap_or_else(|| "this item".to_string());
                self.reply(actor, &prompts::delivery_summary(&title, &report))
                    .await;
            }
        }
    }

    async fn send_join_prompt(&self, actor: ActorId, deep_arg: Option<&ContentId>) {
        let text = prompts::join_prompt(&self.config.channel, &self.config.bot_username, deep_arg);
        self.reply(actor, &text).await;
    }

    // ---- submission dialogue ----

    async fn on_additem(&self, actor: ActorId) {
        match self.machine.start(actor) {
            StartOutcome::Started => self.reply(actor, &prompts::submission_started()).await,
            StartOutcome::NotPrivileged => self.reply(actor, "Operator only.").await,
        }
    }

    async fn on_text(&self, actor: ActorId, text: &str) {
        match self.machine.submit_text(actor, text) {
            SubmitOutcome::TitleSaved => self.reply(actor, &prompts::title_saved()).await,
            _ => debug!(%actor, "text outside title step dropped"),
        }
    }

    async fn on_photo(&self, actor: ActorId, handle: &str) {
        match self.machine.submit_image(actor, handle) {
            SubmitOutcome::PosterSaved => self.reply(actor, &prompts::poster_saved()).await,
            // While collecting files, an image counts as a regular asset.
            SubmitOutcome::Ignored => self.on_asset(actor, AssetKind::Image, handle).await,
            _ => {}
        }
    }

    async fn on_asset(&self, actor: ActorId, kind: AssetKind, handle: &str) {
        match self.machine.submit_asset(actor, AssetRef::new(kind, handle)) {
            SubmitOutcome::Collected { count } => {
                self.reply(actor, &prompts::asset_collected(count, kind.as_str()))
                    .await;
            }
            _ => debug!(%actor, kind = kind.as_str(), "asset outside collection step dropped"),
        }
    }

    // ---- button presses ----

    async fn on_callback(
        &self,
        actor: ActorId,
        callback_id: &str,
        message: Option<MessageRef>,
        data: &str,
    ) {
        if data == callback::VERIFY {
            if self.gate.permits(actor).await {
                self.answer(callback_id, "Verified!", false).await;
                self.edit_or_reply(actor, message, &prompts::welcome_member())
                    .await;
            } else {
                self.answer(
                    callback_id,
                    "You haven't joined the channel yet. Join first, then press again.",
                    true,
                )
                .await;
            }
            return;
        }

        if let Some(raw) = data.strip_prefix(callback::COPY_PREFIX) {
            let link = prompts::share_link(&self.config.bot_username, &ContentId::from(raw));
            self.answer(callback_id, &format!("Link: {link}"), true).await;
            return;
        }

        // Post-delivery feedback buttons; the reaction kind is only logged.
        if let Some(kind) = data.strip_prefix(callback::FEEDBACK_PREFIX) {
            debug!(%actor, kind, "feedback received");
            self.answer(callback_id, "Thanks for your feedback!", true).await;
            return;
        }

        // Everything below mutates a submission; operators only.
        if !self.gate.is_privileged(actor) {
            self.answer(callback_id, "Operator only.", true).await;
            return;
        }
        self.answer(callback_id, "", false).await;

        match data {
            callback::FINISH => self.on_finish(actor, message).await,
            callback::MORE => {
                let text = match self.machine.resume_collecting(actor) {
                    Ok(()) => "Continue sending files. Press finish when done.".to_string(),
                    Err(_) => "No active submission.".to_string(),
                };
                self.edit_or_reply(actor, message, &text).await;
            }
            callback::CANCEL => {
                self.machine.cancel(actor);
                self.edit_or_reply(actor, message, "Submission cancelled.")
                    .await;
            }
            other => debug!(%actor, data = other, "unknown callback ignored"),
        }
    }

    async fn on_finish(&self, actor: ActorId, message: Option<MessageRef>) {
        match self.machine.finish(actor) {
            Ok(id) => {
                let record = self.registry.get(&id);
                let (title, files) = record
                    .map(|r| (r.title, r.assets.len()))
                    .unwrap_or_else(|| ("item".to_string(), 0));
                let link = prompts::share_link(&self.config.bot_username, &id);
                self.edit_or_reply(
                    actor,
                    message,
                    &prompts::submission_committed(&title, files, &link),
                )
                .await;
            }
            Err(FinishError::EmptySubmission) => {
                self.edit_or_reply(actor, message, &prompts::empty_submission())
                    .await;
            }
            Err(FinishError::NoSession) => {
                self.edit_or_reply(actor, message, "No active submission.")
                    .await;
            }
            Err(FinishError::Commit(e)) => {
                warn!(%actor, error = %e, "commit failed");
                self.edit_or_reply(actor, message, "Could not register the item. Try again.")
                    .await;
            }
        }
    }

    // ---- operator surface ----

    async fn on_stats(&self, actor: ActorId) {
        if !self.gate.is_privileged(actor) {
            self.reply(actor, "Operator only.").await;
            return;
        }
        let text = prompts::stats_summary(
            &self.registry.stats(),
            self.gate.privileged_count(),
            &self.config.channel,
        );
        self.reply(actor, &text).await;
    }

    async fn on_listitems(&self, actor: ActorId) {
        if !self.gate.is_privileged(actor) {
            self.reply(actor, "Operator only.").await;
            return;
        }
        self.reply(actor, &prompts::recent_listing(&self.registry.list_recent(10)))
            .await;
    }

    /// Manual membership diagnostic, available to any actor.
    async fn on_checkaccess(&self, actor: ActorId) {
        let operator = self.gate.is_privileged(actor);
        let subscribed = self.gate.permits(actor).await;
        let text = format!(
            "Membership check\n\n\
             Actor: {actor}\nChannel: {}\nOperator: {}\nSubscribed: {}",
            self.config.channel,
            if operator { "yes" } else { "no" },
            if subscribed { "yes" } else { "no" },
        );
        self.reply(actor, &text).await;
    }

    /// Placeholder: no recipient directory is in scope, so a broadcast
    /// reports zero-recipient success.
    async fn on_broadcast(&self, actor: ActorId, args: &[&str]) {
        if !self.gate.is_privileged(actor) {
            self.reply(actor, "Operator only.").await;
            return;
        }
        if args.is_empty() {
            self.reply(actor, "Usage: /broadcast <message>").await;
            return;
        }
        self.reply(actor, "Broadcast complete.\nSent: 0\nFailed: 0")
            .await;
    }

    // ---- outbound helpers ----

    async fn reply(&self, actor: ActorId, text: &str) {
        if let Err(e) = self.transport.send_text(actor, text).await {
            warn!(%actor, error = %e, "reply send failed");
        }
    }

    /// Edit the originating message when the transport gave us its handle,
    /// otherwise fall back to a fresh message.
    async fn edit_or_reply(&self, actor: ActorId, message: Option<MessageRef>, text: &str) {
        match message {
            Some(message) => {
                if let Err(e) = self.transport.edit_message(actor, message, text).await {
                    warn!(%actor, error = %e, "message edit failed, sending fresh");
                    self.reply(actor, text).await;
                }
            }
            None => self.reply(actor, text).await,
        }
    }

    async fn answer(&self, callback_id: &str, text: &str, alert: bool) {
        if let Err(e) = self.transport.answer_callback(callback_id, text, alert).await {
            warn!(callback_id, error = %e, "callback answer failed");
        }
    }
}
