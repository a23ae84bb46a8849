//! Per-actor session state and the session store

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use locket_core::{ActorId, AssetRef};

/// Current step of a submission dialogue.
///
/// Steps advance in a fixed forward order; cancellation is the only
/// transition reachable from every step. Terminal outcomes (finished,
/// cancelled) are represented by removing the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionStep {
    AwaitingTitle,
    AwaitingPoster,
    CollectingFiles,
}

/// In-flight submission state for one actor.
///
/// Deliberately volatile: sessions never survive a process restart, since
/// no protocol exists to resume a half-finished dialogue.
#[derive(Clone, Debug)]
pub struct Session {
    pub step: SubmissionStep,
    pub title: Option<String>,
    pub poster: Option<String>,
    pub assets: Vec<AssetRef>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            step: SubmissionStep::AwaitingTitle,
            title: None,
            poster: None,
            assets: Vec::new(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

type Slot = Arc<Mutex<Option<Session>>>;

/// Session store keyed by actor id.
///
/// Each actor owns a slot guarded by its own mutex; every state transition
/// is an atomic read-modify-write under that slot's lock, so two events
/// from the same actor can never interleave a transition. The outer map
/// lock is held only long enough to resolve the slot.
#[derive(Default)]
pub struct SessionStore {
    slots: Mutex<HashMap<ActorId, Slot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    fn slot(&self, actor: ActorId) -> Slot {
        let mut slots = self.slots.lock();
        slots.entry(actor).or_default().clone()
    }

    /// Run one atomic read-modify-write against the actor's session slot.
    pub fn with_slot<R>(&self, actor: ActorId, f: impl FnOnce(&mut Option<Session>) -> R) -> R {
        let slot = self.slot(actor);
        let mut guard = slot.lock();
        f(&mut guard)
    }

    /// Whether the actor currently has a live session.
    pub fn contains(&self, actor: ActorId) -> bool {
        self.with_slot(actor, |s| s.is_some())
    }

    /// Snapshot of the actor's session, if any.
    pub fn get(&self, actor: ActorId) -> Option<Session> {
        self.with_slot(actor, |s| s.clone())
    }
}
