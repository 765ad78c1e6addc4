//! Network orchestrator — drives every target actor and folds readiness.

use std::collections::HashMap;
use std::sync::Arc;

use cascade_core::{CancelFlag, EngineConfig, Error, Result, StateChain};
use cascade_engine::{ActivationMachine, RunOutcome};
use cascade_registry::{ActorRegistry, StatusLog};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::types::{NetworkRunResult, NetworkStatus};

/// Cascades the activation sequence across a registry of actors and
/// aggregates their completion into a single readiness signal.
///
/// Actor runs share no mutable state beyond their registry slots, so the
/// orchestrator is free to run them concurrently; completion order is not
/// observable in the final result.
pub struct NetworkOrchestrator {
    config: EngineConfig,
    chain: Arc<StateChain>,
    registry: Arc<ActorRegistry>,
    status_log: Option<Arc<StatusLog>>,
    cancel: CancelFlag,
}

impl NetworkOrchestrator {
    /// Create an orchestrator with a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let chain = Arc::new(config.chain.clone());
        Ok(Self {
            config,
            chain,
            registry: Arc::new(ActorRegistry::new()),
            status_log: None,
            cancel: CancelFlag::new(),
        })
    }

    /// Attach a status log that receives every frozen outcome.
    pub fn with_status_log(mut self, log: StatusLog) -> Self {
        self.status_log = Some(Arc::new(log));
        self
    }

    pub fn registry(&self) -> Arc<ActorRegistry> {
        self.registry.clone()
    }

    /// Cancellation handle. Raising it stops new actor runs from starting
    /// and cuts in-flight runs at their next tick boundary; cut runs are
    /// recorded as partial.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Run every target actor up to `max_ticks_per_actor` ticks and
    /// aggregate readiness.
    ///
    /// A duplicate target id aborts before any tick executes. Partial
    /// outcomes never fail the run: callers always receive a complete
    /// [`NetworkRunResult`], even when `ready` is false.
    pub async fn run_network(
        &self,
        target_actor_ids: &[String],
        max_ticks_per_actor: u32,
    ) -> Result<NetworkRunResult> {
        if max_ticks_per_actor == 0 {
            return Err(Error::Config(
                "max_ticks_per_actor must be positive".to_string(),
            ));
        }
        self.registry.register_targets(target_actor_ids)?;

        let run_id = uuid::Uuid::new_v4().to_string();
        info!(
            "Network run {} started: {} actors, budget {} ticks each",
            run_id,
            target_actor_ids.len(),
            max_ticks_per_actor
        );

        let mut tasks: JoinSet<Result<RunOutcome>> = JoinSet::new();
        for actor_id in target_actor_ids {
            let chain = self.chain.clone();
            let accumulator = self.config.accumulator.clone();
            let seed = self.config.seed_coherence;
            let registry = self.registry.clone();
            let status_log = self.status_log.clone();
            let cancel = self.cancel.clone();
            let actor_id = actor_id.clone();
            let run_id = run_id.clone();

            tasks.spawn(async move {
                // A flag raised before the first tick yields a zero-tick
                // partial outcome, so never-started actors are still
                // recorded, not left half-registered.
                let mut machine =
                    ActivationMachine::with_shared_chain(chain, &accumulator, seed, &actor_id);
                let outcome = machine.run_until(max_ticks_per_actor, &cancel);

                registry.record_outcome(&actor_id, outcome.clone())?;
                if let Some(log) = &status_log {
                    if let Err(e) = log.record_outcome(&run_id, &outcome) {
                        warn!("Failed to log outcome for {}: {}", actor_id, e);
                    }
                }
                Ok(outcome)
            });
        }

        let mut outcomes: HashMap<String, RunOutcome> = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| Error::Internal(e.to_string()))??;
            debug!("Actor {} finished: {}", outcome.actor_id, outcome.classification());
            outcomes.insert(outcome.actor_id.clone(), outcome);
        }

        // Emit per-actor results in target order so completion order never
        // shows through.
        let mut per_actor = Vec::with_capacity(target_actor_ids.len());
        for actor_id in target_actor_ids {
            let outcome = outcomes.remove(actor_id).ok_or_else(|| {
                Error::Internal(format!("missing outcome for actor {}", actor_id))
            })?;
            per_actor.push(outcome);
        }

        let result = NetworkRunResult::from_outcomes(per_actor);
        info!(
            "Network run {} complete: ready={}, fraction={:.4}",
            run_id, result.ready, result.coherence_fraction
        );
        Ok(result)
    }

    /// Explicitly re-run one actor with a fresh tick budget.
    ///
    /// Distinct from startup registration: an id already present is reset
    /// rather than rejected. The network never retries on its own.
    pub fn retry_actor(&self, actor_id: &str, max_ticks: u32) -> Result<RunOutcome> {
        if max_ticks == 0 {
            return Err(Error::Config("max_ticks must be positive".to_string()));
        }
        self.registry.register_for_retry(actor_id);

        let mut machine = ActivationMachine::with_shared_chain(
            self.chain.clone(),
            &self.config.accumulator,
            self.config.seed_coherence,
            actor_id,
        );
        let outcome = machine.run_until(max_ticks, &self.cancel);

        self.registry.record_outcome(actor_id, outcome.clone())?;
        if let Some(log) = &self.status_log {
            let run_id = uuid::Uuid::new_v4().to_string();
            if let Err(e) = log.record_outcome(&run_id, &outcome) {
                warn!("Failed to log retry outcome for {}: {}", actor_id, e);
            }
        }
        info!("Retry for {} finished: {}", actor_id, outcome.classification());
        Ok(outcome)
    }

    /// Current aggregate status derived from the registry.
    pub fn network_status(&self) -> NetworkStatus {
        let target_actor_ids = self.registry.target_ids();
        let completed_actor_ids = self.registry.completed_ids();
        let coherence_fraction = if target_actor_ids.is_empty() {
            1.0
        } else {
            completed_actor_ids.len() as f64 / target_actor_ids.len() as f64
        };
        NetworkStatus {
            target_actor_ids,
            completed_actor_ids,
            coherence_fraction,
        }
    }
}
