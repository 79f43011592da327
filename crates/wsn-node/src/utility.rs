//! Cluster-head candidate utility.
//!
//! Utility is a weighted sum of four terms, each normalized to `[0, 1]`
//! for nodes inside the area:
//!
//! ```text
//! event        = min(event_score, 1)
//! energy       = battery / battery_capacity
//! fairness     = min(fairness_score, 1)
//! link_quality = 1 - distance(node, gateway) / (area_size * sqrt(2))
//! ```
//!
//! Scoring is pure: same node state and gateway, same number.

use std::f64::consts::SQRT_2;

use wsn_types::Point;

use crate::config::UtilityWeights;
use crate::node::Node;

/// The four unweighted utility terms for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilityTerms {
    /// Clamped event-responsiveness score.
    pub event: f64,
    /// Battery as a fraction of capacity.
    pub energy: f64,
    /// Clamped fairness score.
    pub fairness: f64,
    /// Proximity to the gateway relative to the area diagonal.
    pub link_quality: f64,
}

impl UtilityTerms {
    /// Combine the terms with `weights`.
    pub fn weighted(&self, weights: &UtilityWeights) -> f64 {
        weights.link_quality.mul_add(
            self.link_quality,
            weights.fairness.mul_add(
                self.fairness,
                weights.energy.mul_add(self.energy, weights.event * self.event),
            ),
        )
    }
}

/// Scores nodes as head candidates within one simulation area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilityModel {
    weights: UtilityWeights,
    battery_capacity: f64,
    area_diagonal: f64,
}

impl UtilityModel {
    /// Build a model for a square area of side `area_size`.
    pub fn new(weights: UtilityWeights, battery_capacity: f64, area_size: f64) -> Self {
        Self {
            weights,
            battery_capacity,
            area_diagonal: area_size * SQRT_2,
        }
    }

    /// The weights this model applies.
    pub const fn weights(&self) -> &UtilityWeights {
        &self.weights
    }

    /// Compute the unweighted terms for `node`.
    pub fn terms(&self, node: &Node, gateway: Point) -> UtilityTerms {
        let energy = if self.battery_capacity > 0.0 {
            node.battery() / self.battery_capacity
        } else {
            0.0
        };
        let link_quality = if self.area_diagonal > 0.0 {
            1.0 - node.position().distance_to(gateway) / self.area_diagonal
        } else {
            0.0
        };

        UtilityTerms {
            event: node.event_score().min(1.0),
            energy,
            fairness: node.fairness_score().min(1.0),
            link_quality,
        }
    }

    /// Weighted utility of `node`. Higher is a better candidate.
    pub fn score(&self, node: &Node, gateway: Point) -> f64 {
        self.terms(node, gateway).weighted(&self.weights)
    }
}
