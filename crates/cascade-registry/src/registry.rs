//! Actor registry — the single source of truth for run outcomes.
//!
//! Orchestrators write outcomes here; reporting surfaces read from here.
//! Different actors never write the same slot, so a single lock around the
//! map is all the serialization concurrent runs need.

use std::collections::{HashMap, HashSet};

use cascade_core::{Error, Result};
use cascade_engine::RunOutcome;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

/// Registration and outcome status for one actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ActorStatus {
    /// The id was never registered.
    NotRegistered,
    /// Registered as a target, no outcome recorded yet.
    NotYetRun,
    /// A frozen run outcome is on record.
    Complete(RunOutcome),
}

/// The set of target actors and their recorded outcomes.
#[derive(Debug, Default)]
pub struct ActorRegistry {
    slots: RwLock<HashMap<String, Option<RunOutcome>>>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id to the target set.
    ///
    /// An id already present is a recoverable [`Error::DuplicateActor`];
    /// callers may skip it or go through [`ActorRegistry::register_for_retry`].
    pub fn register(&self, actor_id: &str) -> Result<()> {
        let mut slots = self.slots.write();
        if slots.contains_key(actor_id) {
            return Err(Error::DuplicateActor(actor_id.to_string()));
        }
        slots.insert(actor_id.to_string(), None);
        Ok(())
    }

    /// Explicit-retry registration: inserts the id, or resets an existing
    /// slot to pending. Never raises the duplicate error.
    pub fn register_for_retry(&self, actor_id: &str) {
        debug!("Registering {} for retry", actor_id);
        self.slots.write().insert(actor_id.to_string(), None);
    }

    /// Atomically register a batch of target ids, or register none of them.
    ///
    /// A duplicate within the batch, or against ids already present, leaves
    /// the registry untouched so a failed startup cannot corrupt the target
    /// set.
    pub fn register_targets(&self, actor_ids: &[String]) -> Result<()> {
        let mut slots = self.slots.write();
        let mut batch = HashSet::new();
        for id in actor_ids {
            if slots.contains_key(id.as_str()) || !batch.insert(id.as_str()) {
                return Err(Error::DuplicateActor(id.clone()));
            }
        }
        for id in actor_ids {
            slots.insert(id.clone(), None);
        }
        Ok(())
    }

    /// Store a frozen outcome for a registered actor.
    pub fn record_outcome(&self, actor_id: &str, outcome: RunOutcome) -> Result<()> {
        let mut slots = self.slots.write();
        match slots.get_mut(actor_id) {
            Some(slot) => {
                *slot = Some(outcome);
                Ok(())
            }
            None => Err(Error::UnknownActor(actor_id.to_string())),
        }
    }

    pub fn status(&self, actor_id: &str) -> ActorStatus {
        match self.slots.read().get(actor_id) {
            None => ActorStatus::NotRegistered,
            Some(None) => ActorStatus::NotYetRun,
            Some(Some(outcome)) => ActorStatus::Complete(outcome.clone()),
        }
    }

    pub fn is_registered(&self, actor_id: &str) -> bool {
        self.slots.read().contains_key(actor_id)
    }

    /// All registered target ids, sorted for reproducible reporting.
    pub fn target_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.slots.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ids whose recorded outcome reached terminal, sorted.
    pub fn completed_ids(&self) -> Vec<String> {
        let slots = self.slots.read();
        let mut ids: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| slot.as_ref().is_some_and(|o| o.reached_terminal))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}
