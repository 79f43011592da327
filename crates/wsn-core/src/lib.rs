//! Simulation clock, cluster placement, head election, and tick cycle for
//! the WSN cluster simulation.
//!
//! This crate owns the three-phase tick cycle that drives the simulation:
//! Advance, Drain, and Elect. [`ClusterSimulation`] wraps the tick state
//! with its random source and exposes reset, step, and snapshot.
//!
//! # Modules
//!
//! - [`clock`] -- Monotonic tick counter with overflow detection.
//! - [`config`] -- Configuration loading from `wsn-config.yaml` into
//!   strongly-typed structs.
//! - [`election`] -- Election triggers and winner selection.
//! - [`placement`] -- Random cluster centers and node deployment.
//! - [`simulation`] -- The [`ClusterSimulation`] engine.
//! - [`snapshot`] -- Export of the live state into a [`Snapshot`].
//! - [`tick`] -- The three-phase tick cycle.
//!
//! [`Snapshot`]: wsn_types::Snapshot

pub mod clock;
pub mod config;
pub mod election;
pub mod placement;
pub mod simulation;
pub mod snapshot;
pub mod tick;

pub use clock::{ClockError, SimClock};
pub use config::{ConfigError, SimulationConfig};
pub use election::Election;
pub use simulation::{ClusterSimulation, DefaultSimulation, SimulationError};
pub use tick::{ClusterState, TickError, TickSummary};
