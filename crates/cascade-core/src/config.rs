//! Engine configuration — the static surface loaded once at startup.

use serde::{Deserialize, Serialize};

use crate::chain::StateChain;
use crate::error::{Error, Result};

/// Constants for the coherence accumulator.
///
/// Ordinary tunable configuration — none of these carries physical meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorConfig {
    /// Deterministic per-tick increment.
    pub base: f64,
    /// Bounded modulation amplitude; strictly smaller than `base`.
    pub amplitude: f64,
    /// Modulation frequency in cycles per tick.
    pub frequency: f64,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            base: 0.12,
            amplitude: 0.02,
            frequency: 0.15,
        }
    }
}

/// Full engine configuration: the state chain plus accumulator constants.
///
/// Loaded once, never mutated by actors at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub chain: StateChain,
    pub accumulator: AccumulatorConfig,
    /// Starting coherence for every actor; must sit below the first threshold.
    #[serde(rename = "seedCoherence")]
    pub seed_coherence: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chain: StateChain::reference(),
            accumulator: AccumulatorConfig::default(),
            seed_coherence: 0.05,
        }
    }
}

impl EngineConfig {
    /// Check the cross-field invariants the chain alone cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if !self.accumulator.base.is_finite() || self.accumulator.base <= 0.0 {
            return Err(Error::Config(
                "base increment must be positive and finite".to_string(),
            ));
        }
        if !(self.accumulator.amplitude >= 0.0
            && self.accumulator.amplitude < self.accumulator.base)
        {
            return Err(Error::Config(
                "modulation amplitude must sit in [0, base)".to_string(),
            ));
        }
        if !self.accumulator.frequency.is_finite() {
            return Err(Error::Config(
                "modulation frequency must be finite".to_string(),
            ));
        }
        let first = self.chain.initial().activation_threshold;
        if !(self.seed_coherence >= 0.0 && self.seed_coherence < first) {
            return Err(Error::Config(format!(
                "seed coherence must sit in [0, {}) for this chain",
                first
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chain.len(), 3);
        assert_eq!(config.chain.initial().name, "standby");
    }

    #[test]
    fn test_amplitude_must_stay_below_base() {
        let mut config = EngineConfig::default();
        config.accumulator.amplitude = config.accumulator.base;
        assert!(config.validate().is_err());

        config.accumulator.amplitude = -0.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_must_be_positive() {
        let mut config = EngineConfig::default();
        config.accumulator.base = 0.0;
        assert!(config.validate().is_err());

        config.accumulator.base = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seed_must_sit_below_first_threshold() {
        let mut config = EngineConfig::default();
        config.seed_coherence = 0.3;
        assert!(config.validate().is_err());

        config.seed_coherence = -0.1;
        assert!(config.validate().is_err());

        config.seed_coherence = 0.29;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        assert!(json.contains("seedCoherence"));
    }
}
