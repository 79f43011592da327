//! Tunable parameters for node energy mechanics and head utility.
//!
//! [`NodeConfig`] bundles the per-tick rates applied by the engine;
//! [`UtilityWeights`] holds the four weights of the head-candidate
//! utility. Both are plain values: the engine builds them from the YAML
//! configuration and validates them once, at construction.

use serde::Deserialize;

use crate::error::NodeError;

/// Battery level at or below which a node counts as depleted.
///
/// Repeated fractional drains (0.2 per tick) accumulate rounding error, so
/// a battery that should be exactly empty can sit a few ulps above zero.
pub const DEPLETION_EPSILON: f64 = 1e-9;

/// Energy and behavior rates applied to every node each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// Starting (and maximum) battery (default: 100).
    pub battery_capacity: f64,

    /// Battery drained from every living node each tick (default: 0.2).
    pub baseline_drain: f64,

    /// Extra battery drained when a node senses an event (default: 0.5).
    pub event_cost: f64,

    /// Battery charged to a node when it becomes head (default: 1.5).
    pub head_cost: f64,

    /// Multiplicative decay of the event score per tick (default: 0.9).
    pub event_decay: f64,

    /// Event score added when a node senses an event (default: 0.8).
    pub event_boost: f64,

    /// Fairness added per tick to nodes that are not head (default: 0.02).
    pub fairness_increment: f64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            battery_capacity: 100.0,
            baseline_drain: 0.2,
            event_cost: 0.5,
            head_cost: 1.5,
            event_decay: 0.9,
            event_boost: 0.8,
            fairness_increment: 0.02,
        }
    }
}

impl NodeConfig {
    /// Check that every rate is finite and within range.
    ///
    /// Capacity must be positive, drains and increments non-negative, and
    /// the decay factor must lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), NodeError> {
        if !self.battery_capacity.is_finite() || self.battery_capacity <= 0.0 {
            return Err(invalid(format!(
                "battery_capacity must be positive and finite, got {}",
                self.battery_capacity
            )));
        }
        non_negative("baseline_drain", self.baseline_drain)?;
        non_negative("event_cost", self.event_cost)?;
        non_negative("head_cost", self.head_cost)?;
        non_negative("event_boost", self.event_boost)?;
        non_negative("fairness_increment", self.fairness_increment)?;
        if !(0.0..=1.0).contains(&self.event_decay) {
            return Err(invalid(format!(
                "event_decay must be within [0, 1], got {}",
                self.event_decay
            )));
        }
        Ok(())
    }
}

/// Weights of the four utility terms.
///
/// Summing to 1.0 is a convention, not a requirement; the engine logs a
/// warning when the sum drifts.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct UtilityWeights {
    /// Weight of the event-responsiveness term (default: 0.5).
    #[serde(default = "default_event_weight")]
    pub event: f64,

    /// Weight of the remaining-energy term (default: 0.3).
    #[serde(default = "default_energy_weight")]
    pub energy: f64,

    /// Weight of the time-since-last-led term (default: 0.1).
    #[serde(default = "default_fairness_weight")]
    pub fairness: f64,

    /// Weight of the proximity-to-gateway term (default: 0.1).
    #[serde(default = "default_link_quality_weight")]
    pub link_quality: f64,
}

impl Default for UtilityWeights {
    fn default() -> Self {
        Self {
            event: default_event_weight(),
            energy: default_energy_weight(),
            fairness: default_fairness_weight(),
            link_quality: default_link_quality_weight(),
        }
    }
}

impl UtilityWeights {
    /// Sum of all four weights.
    pub fn sum(&self) -> f64 {
        self.event + self.energy + self.fairness + self.link_quality
    }

    /// Check that every weight is finite and non-negative.
    pub fn validate(&self) -> Result<(), NodeError> {
        non_negative("weights.event", self.event)?;
        non_negative("weights.energy", self.energy)?;
        non_negative("weights.fairness", self.fairness)?;
        non_negative("weights.link_quality", self.link_quality)
    }
}

const fn default_event_weight() -> f64 {
    0.5
}

const fn default_energy_weight() -> f64 {
    0.3
}

const fn default_fairness_weight() -> f64 {
    0.1
}

const fn default_link_quality_weight() -> f64 {
    0.1
}

fn non_negative(name: &str, value: f64) -> Result<(), NodeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}

const fn invalid(reason: String) -> NodeError {
    NodeError::InvalidConfig { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(NodeConfig::default().validate().is_ok());
        assert!(UtilityWeights::default().validate().is_ok());
    }

    #[test]
    fn default_weights_sum_to_one() {
        assert!((UtilityWeights::default().sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn negative_drain_rejected() {
        let cfg = NodeConfig {
            baseline_drain: -0.1,
            ..NodeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn decay_outside_unit_interval_rejected() {
        let too_big = NodeConfig {
            event_decay: 1.5,
            ..NodeConfig::default()
        };
        let negative = NodeConfig {
            event_decay: -0.9,
            ..NodeConfig::default()
        };
        assert!(too_big.validate().is_err());
        assert!(negative.validate().is_err());
    }

    #[test]
    fn zero_capacity_rejected() {
        let cfg = NodeConfig {
            battery_capacity: 0.0,
            ..NodeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn nan_weight_rejected() {
        let weights = UtilityWeights {
            fairness: f64::NAN,
            ..UtilityWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn weights_parse_with_partial_fields() {
        let weights: UtilityWeights =
            serde_json::from_str(r#"{"event": 0.7}"#).unwrap_or_default();
        assert!((weights.event - 0.7).abs() < f64::EPSILON);
        assert!((weights.energy - 0.3).abs() < f64::EPSILON);
    }
}
