//! Enumeration types shared between the engine and its consumers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Battery level (exclusive) above which a node is drawn as healthy.
pub const HEALTHY_BATTERY_THRESHOLD: f64 = 50.0;

/// Battery level (exclusive) above which a node is drawn as a warning.
pub const WARNING_BATTERY_THRESHOLD: f64 = 20.0;

/// Display classification of a node, derived from liveness and battery.
///
/// Serializes as the hex color the dashboard paints the node with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum NodeColor {
    /// The node's battery is depleted.
    #[serde(rename = "#ff0000")]
    Dead,
    /// Battery above 50.
    #[serde(rename = "#00ff00")]
    Healthy,
    /// Battery above 20 and at most 50.
    #[serde(rename = "#ffff00")]
    Warning,
    /// Battery at most 20.
    #[serde(rename = "#ff9900")]
    Critical,
}

impl NodeColor {
    /// Classify a node from its dead flag and battery level.
    ///
    /// A dead node is always [`NodeColor::Dead`] regardless of the battery
    /// value passed in.
    pub fn classify(dead: bool, battery: f64) -> Self {
        if dead {
            Self::Dead
        } else if battery > HEALTHY_BATTERY_THRESHOLD {
            Self::Healthy
        } else if battery > WARNING_BATTERY_THRESHOLD {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

/// Why an election was held in a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ElectionTrigger {
    /// The cluster had no head.
    Vacant,
    /// The previous head's battery ran out.
    HeadDied,
    /// The previous head served longer than the maximum tenure.
    TenureExpired,
}

impl core::fmt::Display for ElectionTrigger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Vacant => write!(f, "vacant"),
            Self::HeadDied => write!(f, "head_died"),
            Self::TenureExpired => write!(f, "tenure_expired"),
        }
    }
}

/// The kind of energy expenditure that drained a node's battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DrainKind {
    /// Per-tick idle consumption.
    Baseline,
    /// Sensing and reporting a nearby event.
    EventSensing,
    /// One-off cost of taking over as cluster head.
    HeadDuty,
    /// Drain applied from outside the tick cycle.
    Injected,
}

impl core::fmt::Display for DrainKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Baseline => write!(f, "baseline"),
            Self::EventSensing => write!(f, "event_sensing"),
            Self::HeadDuty => write!(f, "head_duty"),
            Self::Injected => write!(f, "injected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_overrides_battery() {
        assert_eq!(NodeColor::classify(true, 99.0), NodeColor::Dead);
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(NodeColor::classify(false, 50.1), NodeColor::Healthy);
        assert_eq!(NodeColor::classify(false, 50.0), NodeColor::Warning);
        assert_eq!(NodeColor::classify(false, 20.1), NodeColor::Warning);
        assert_eq!(NodeColor::classify(false, 20.0), NodeColor::Critical);
        assert_eq!(NodeColor::classify(false, 0.0), NodeColor::Critical);
    }

    #[test]
    fn color_serializes_as_hex() {
        let json = serde_json::to_string(&NodeColor::Healthy).ok();
        assert_eq!(json.as_deref(), Some("\"#00ff00\""));
        let critical: Option<NodeColor> = serde_json::from_str("\"#ff9900\"").ok();
        assert_eq!(critical, Some(NodeColor::Critical));
    }

    #[test]
    fn trigger_display() {
        assert_eq!(ElectionTrigger::TenureExpired.to_string(), "tenure_expired");
        assert_eq!(DrainKind::HeadDuty.to_string(), "head_duty");
    }
}
