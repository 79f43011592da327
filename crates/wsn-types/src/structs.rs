//! Geometry and snapshot record types.
//!
//! A [`Snapshot`] is the only contract between the engine and whatever
//! drives it. Field names on the wire match the dashboard client
//! (`batt`, `cluster`, `dead_since`); the serde renames below are part
//! of that contract.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::NodeColor;
use crate::ids::{ClusterId, NodeId};

/// A point in the square simulation area, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Point(pub f64, pub f64);

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self(x, y)
    }

    /// Horizontal coordinate.
    pub const fn x(self) -> f64 {
        self.0
    }

    /// Vertical coordinate.
    pub const fn y(self) -> f64 {
        self.1
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Self) -> f64 {
        (self.0 - other.0).hypot(self.1 - other.1)
    }

    /// Clamp both coordinates into `[0, size]`.
    pub fn clamp_to_area(self, size: f64) -> Self {
        Self(self.0.clamp(0.0, size), self.1.clamp(0.0, size))
    }
}

/// Per-node record in a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NodeRecord {
    /// Node identifier.
    pub id: NodeId,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Display classification.
    pub color: NodeColor,
    /// Whether the node currently leads its cluster.
    pub is_head: bool,
    /// Whether the node's battery is depleted.
    pub dead: bool,
    /// Remaining battery.
    #[serde(rename = "batt")]
    pub battery: f64,
    /// Cluster the node belongs to.
    #[serde(rename = "cluster")]
    pub cluster_id: ClusterId,
}

/// A follower-to-head edge for rendering cluster topology.
///
/// Only emitted for living non-head nodes whose cluster head is alive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LinkRecord {
    /// Position of the follower node.
    pub start: Point,
    /// Position of its cluster head.
    pub end: Point,
    /// The follower node.
    pub node: NodeId,
    /// The head the follower reports to.
    pub head: NodeId,
}

/// Downtime accounting for one dead node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DeadStat {
    /// The dead node.
    #[serde(rename = "id")]
    pub node_id: NodeId,
    /// Tick at which the node died.
    pub dead_since: u64,
    /// Ticks elapsed since death.
    pub downtime: u64,
}

/// Per-cluster leadership summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClusterRecord {
    /// Cluster identifier.
    pub id: ClusterId,
    /// Current head, if the cluster has a living one.
    pub head: Option<NodeId>,
    /// Number of nodes assigned to the cluster at reset.
    pub members: u32,
    /// Number of members still alive.
    pub alive_members: u32,
}

/// Population-wide aggregates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PopulationStats {
    /// Total number of nodes.
    pub total: u32,
    /// Nodes with battery remaining.
    pub alive: u32,
    /// Nodes whose battery is depleted.
    pub dead: u32,
    /// Nodes currently leading a cluster.
    pub heads: u32,
    /// Sum of downtime over all dead nodes.
    pub total_downtime: u64,
    /// Mean battery over living nodes (0 when none are alive).
    pub mean_battery: f64,
}

/// Immutable view of the simulation at one tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    /// Current tick.
    pub sim_time: u64,
    /// Gateway (sink) position.
    pub gateway: Point,
    /// Every node in ascending id order.
    pub nodes: Vec<NodeRecord>,
    /// Follower-to-head edges.
    pub links: Vec<LinkRecord>,
    /// Downtime for every dead node.
    pub dead_stats: Vec<DeadStat>,
    /// Per-cluster leadership in ascending cluster id order.
    pub clusters: Vec<ClusterRecord>,
    /// Population aggregates.
    pub population: PopulationStats,
}

impl Snapshot {
    /// Look up a node record by id.
    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
