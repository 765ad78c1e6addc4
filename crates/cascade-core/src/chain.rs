//! State-chain model — the ordered ladder of activation states.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// State name reported once an actor has left the last chain state.
pub const TERMINAL_STATE: &str = "terminal";

/// Side-effect tag stamped by the [`StateChain::linear`] builder.
pub const DEFAULT_SIDE_EFFECT_TAG: &str = "emit-transition-event";

/// One state in the activation chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDefinition {
    /// Unique state name.
    pub name: String,
    /// Coherence an actor must reach to leave this state.
    #[serde(rename = "activationThreshold")]
    pub activation_threshold: f64,
    /// Name of the next state, or `None` when leaving this state ends the run.
    #[serde(rename = "nextState")]
    pub next_state: Option<String>,
    /// Opaque label fired as an observable when the transition out of this
    /// state occurs. The engine never branches on its content.
    #[serde(rename = "sideEffectTag")]
    pub side_effect_tag: String,
}

/// A validated linear chain of state definitions.
///
/// Construction enforces the chain invariants: unique names, each definition
/// linking to the one that follows it, exactly one terminal link, and strictly
/// increasing activation thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct StateChain {
    states: Vec<StateDefinition>,
}

impl StateChain {
    /// Validate and build a chain from explicit definitions.
    ///
    /// Definitions must already be in chain order: every `next_state` names
    /// the immediately following definition and only the last is `None`.
    pub fn new(states: Vec<StateDefinition>) -> Result<Self> {
        if states.is_empty() {
            return Err(Error::Config(
                "state chain must contain at least one state".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for def in &states {
            if def.name == TERMINAL_STATE {
                return Err(Error::Config(format!(
                    "state name {:?} is reserved",
                    TERMINAL_STATE
                )));
            }
            if !names.insert(def.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate state name: {}",
                    def.name
                )));
            }
            if !def.activation_threshold.is_finite() {
                return Err(Error::Config(format!(
                    "activation threshold for {} must be finite",
                    def.name
                )));
            }
        }

        for (i, def) in states.iter().enumerate() {
            let expected = states.get(i + 1).map(|next| next.name.as_str());
            if def.next_state.as_deref() != expected {
                return Err(Error::Config(format!(
                    "state {} must link to {}",
                    def.name,
                    expected.unwrap_or(TERMINAL_STATE)
                )));
            }
            if i > 0 && def.activation_threshold <= states[i - 1].activation_threshold {
                return Err(Error::Config(format!(
                    "activation thresholds must be strictly increasing at {}",
                    def.name
                )));
            }
        }

        Ok(Self { states })
    }

    /// Build a chain from `(name, threshold)` pairs, wiring the links and
    /// stamping the default side-effect tag.
    pub fn linear(entries: &[(&str, f64)]) -> Result<Self> {
        let states = entries
            .iter()
            .enumerate()
            .map(|(i, (name, threshold))| StateDefinition {
                name: (*name).to_string(),
                activation_threshold: *threshold,
                next_state: entries.get(i + 1).map(|(next, _)| (*next).to_string()),
                side_effect_tag: DEFAULT_SIDE_EFFECT_TAG.to_string(),
            })
            .collect();
        Self::new(states)
    }

    /// Like [`StateChain::linear`] with an explicit side-effect tag per state.
    pub fn linear_tagged(entries: &[(&str, f64, &str)]) -> Result<Self> {
        let states = entries
            .iter()
            .enumerate()
            .map(|(i, (name, threshold, tag))| StateDefinition {
                name: (*name).to_string(),
                activation_threshold: *threshold,
                next_state: entries.get(i + 1).map(|(next, _, _)| (*next).to_string()),
                side_effect_tag: (*tag).to_string(),
            })
            .collect();
        Self::new(states)
    }

    /// The reference three-state chain used by the default configuration.
    pub(crate) fn reference() -> Self {
        let states = vec![
            StateDefinition {
                name: "standby".to_string(),
                activation_threshold: 0.3,
                next_state: Some("syncing".to_string()),
                side_effect_tag: DEFAULT_SIDE_EFFECT_TAG.to_string(),
            },
            StateDefinition {
                name: "syncing".to_string(),
                activation_threshold: 0.8,
                next_state: Some("engaged".to_string()),
                side_effect_tag: DEFAULT_SIDE_EFFECT_TAG.to_string(),
            },
            StateDefinition {
                name: "engaged".to_string(),
                activation_threshold: 1.5,
                next_state: None,
                side_effect_tag: DEFAULT_SIDE_EFFECT_TAG.to_string(),
            },
        ];
        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StateDefinition> {
        self.states.get(index)
    }

    pub fn states(&self) -> &[StateDefinition] {
        &self.states
    }

    /// The chain's entry state.
    pub fn initial(&self) -> &StateDefinition {
        &self.states[0]
    }

    /// Threshold of the last chain state (the one whose exit is terminal).
    pub fn final_threshold(&self) -> f64 {
        self.states.last().map_or(0.0, |def| def.activation_threshold)
    }

    /// Name of the state at `index`; indexes past the end report
    /// [`TERMINAL_STATE`].
    pub fn state_name(&self, index: usize) -> &str {
        self.states
            .get(index)
            .map_or(TERMINAL_STATE, |def| def.name.as_str())
    }
}

impl Serialize for StateChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.states.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StateChain {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let states = Vec::<StateDefinition>::deserialize(deserializer)?;
        StateChain::new(states).map_err(serde::de::Error::custom)
    }
}
