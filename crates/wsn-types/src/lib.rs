//! Shared type definitions for the WSN cluster simulation.
//!
//! Everything that crosses the boundary between the engine and its
//! drivers lives here, so the observer and the dashboard bindings never
//! need to depend on engine internals. Types flow to `TypeScript` via
//! `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Integer newtypes for node and cluster identifiers
//! - [`enums`] -- Color classes, election triggers, drain kinds
//! - [`structs`] -- Geometry and snapshot records

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::{
    DrainKind, ElectionTrigger, HEALTHY_BATTERY_THRESHOLD, NodeColor, WARNING_BATTERY_THRESHOLD,
};
pub use ids::{ClusterId, NodeId};
pub use structs::{
    ClusterRecord, DeadStat, LinkRecord, NodeRecord, Point, PopulationStats, Snapshot,
};
