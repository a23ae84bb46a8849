//! Submission state machine
//!
//! Consumes inbound actor events, advances the actor's session through the
//! fixed step order, and commits a content record on a successful finish.
//! Out-of-step events are a defined "ignored" transition, not an error:
//! the machine is permissive to multi-message client noise.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{info, warn};

use locket_core::{ActorId, AssetRef, ContentId, ContentIdGenerator, ContentRecord};
use locket_registry::{ContentRegistry, RegistryError};

use crate::{Session, SessionStore, SubmissionStep};

/// Outcome of a `start` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// Session created (overwriting any prior one), now awaiting a title.
    Started,
    /// Actor is not in the privileged set; no state was touched.
    NotPrivileged,
}

/// Outcome of a raw content event routed into the machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Title stored, session advanced to awaiting the poster.
    TitleSaved,
    /// Poster stored, session advanced to collecting files.
    PosterSaved,
    /// Asset appended; the caller must prompt finish/continue/cancel.
    Collected { count: usize },
    /// Event did not match the current step (or no session); dropped.
    Ignored,
}

#[derive(Error, Debug)]
pub enum FinishError {
    #[error("no active session")]
    NoSession,

    /// The caller must surface a retry prompt; the session is kept.
    #[error("submission has no collected assets")]
    EmptySubmission,

    #[error(transparent)]
    Commit(#[from] RegistryError),
}

/// The submission state machine.
///
/// Sole writer of sessions and the only component permitted to insert
/// into the content registry.
pub struct SubmissionMachine {
    sessions: SessionStore,
    registry: Arc<ContentRegistry>,
    ids: ContentIdGenerator,
    privileged: HashSet<ActorId>,
}

impl SubmissionMachine {
    pub fn new(registry: Arc<ContentRegistry>, privileged: HashSet<ActorId>) -> Self {
        SubmissionMachine {
            sessions: SessionStore::new(),
            registry,
            ids: ContentIdGenerator::new(),
            privileged,
        }
    }

    pub fn has_session(&self, actor: ActorId) -> bool {
        self.sessions.contains(actor)
    }

    /// Begin a submission dialogue. Last-writer-wins: any prior session for
    /// the actor is overwritten.
    pub fn start(&self, actor: ActorId) -> StartOutcome {
        if !self.privileged.contains(&actor) {
            warn!(%actor, "unprivileged actor attempted to start a submission");
            return StartOutcome::NotPrivileged;
        }

        self.sessions.with_slot(actor, |slot| {
            *slot = Some(Session::new());
        });
        info!(%actor, "submission started");
        StartOutcome::Started
    }

    /// Free-text event: only meaningful while awaiting the title. A
    /// committed record must carry non-empty text, so whitespace-only
    /// input is dropped and the session stays on this step.
    pub fn submit_text(&self, actor: ActorId, text: &str) -> SubmitOutcome {
        self.sessions.with_slot(actor, |slot| {
            let Some(session) = slot.as_mut() else {
                return SubmitOutcome::Ignored;
            };
            if session.step != SubmissionStep::AwaitingTitle {
                return SubmitOutcome::Ignored;
            }
            let title = text.trim();
            if title.is_empty() {
                return SubmitOutcome::Ignored;
            }
            session.title = Some(title.to_string());
            session.step = SubmissionStep::AwaitingPoster;
            SubmitOutcome::TitleSaved
        })
    }

    /// Image event: the poster while one is awaited, otherwise a collected
    /// asset; anything else is dropped.
    pub fn submit_image(&self, actor: ActorId, handle: &str) -> SubmitOutcome {
        self.sessions.with_slot(actor, |slot| {
            let Some(session) = slot.as_mut() else {
                return SubmitOutcome::Ignored;
            };
            if session.step != SubmissionStep::AwaitingPoster {
                return SubmitOutcome::Ignored;
            }
            session.poster = Some(handle.to_string());
            session.step = SubmissionStep::CollectingFiles;
            SubmitOutcome::PosterSaved
        })
    }

    /// Typed asset event: appended while collecting files. Never
    /// auto-finishes; the running count goes back to the caller as an
    /// explicit choice prompt.
    pub fn submit_asset(&self, actor: ActorId, asset: AssetRef) -> SubmitOutcome {
        self.sessions.with_slot(actor, |slot| {
            let Some(session) = slot.as_mut() else {
                return SubmitOutcome::Ignored;
            };
            if session.step != SubmissionStep::CollectingFiles {
                return SubmitOutcome::Ignored;
            }
            session.assets.push(asset);
            SubmitOutcome::Collected {
                count: session.assets.len(),
            }
        })
    }

    /// Explicit re-entry into collecting files; re-arms the acceptance
    /// window after a choice prompt.
    pub fn resume_collecting(&self, actor: ActorId) -> Result<(), FinishError> {
        self.sessions.with_slot(actor, |slot| {
            let session = slot.as_mut().ok_or(FinishError::NoSession)?;
            session.step = SubmissionStep::CollectingFiles;
            Ok(())
        })
    }

    /// Commit the session as a new content record and clear it. The
    /// session is cleared only after the registry accepts the record, so a
    /// commit failure never discards collected work.
    pub fn finish(&self, actor: ActorId) -> Result<ContentId, FinishError> {
        self.sessions.with_slot(actor, |slot| {
            let session = slot.as_ref().ok_or(FinishError::NoSession)?;
            if session.assets.is_empty() {
                return Err(FinishError::EmptySubmission);
            }

            let id = self.ids.next();
            let record = ContentRecord {
                id: id.clone(),
                title: session.title.clone().unwrap_or_default(),
                poster: session.poster.clone(),
                assets: session.assets.clone(),
                created_at: unix_now(),
                created_by: actor,
            };
            self.registry.put(record)?;
            *slot = None;
            info!(%actor, %id, "submission committed");
            Ok(id)
        })
    }

    /// Clear the actor's session. Idempotent: cancelling with no session
    /// is a no-op.
    pub fn cancel(&self, actor: ActorId) -> bool {
        self.sessions.with_slot(actor, |slot| {
            let existed = slot.is_some();
            *slot = None;
            if existed {
                info!(%actor, "submission cancelled");
            }
            existed
        })
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
