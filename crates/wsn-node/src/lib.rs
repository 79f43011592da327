//! Sensor node state, energy drain, and head-candidate utility.
//!
//! This crate holds everything that operates on a single node without
//! knowing about clusters or time. The engine in `wsn-core` owns the
//! population and decides when each transition happens.
//!
//! # Modules
//!
//! - [`config`] -- Energy rates ([`NodeConfig`]) and utility weights ([`UtilityWeights`])
//! - [`death`] -- The record emitted when a battery runs out ([`Death`])
//! - [`error`] -- Configuration validation errors ([`NodeError`])
//! - [`node`] -- Per-node state and transitions ([`Node`])
//! - [`utility`] -- Weighted candidate scoring ([`UtilityModel`])

pub mod config;
pub mod death;
pub mod error;
pub mod node;
pub mod utility;

pub use config::{DEPLETION_EPSILON, NodeConfig, UtilityWeights};
pub use death::Death;
pub use error::NodeError;
pub use node::Node;
pub use utility::{UtilityModel, UtilityTerms};
