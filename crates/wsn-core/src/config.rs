//! Configuration loading and typed config structures for the WSN simulation.
//!
//! The canonical configuration lives in `wsn-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, a loader that reads the file, and a validator that rejects
//! parameter sets the engine cannot run with.
//!
//! Every field has a serde default, so an empty document (or a missing
//! section) yields the stock simulation: a 1000 x 1000 area, five clusters,
//! 50 nodes with 100 units of battery each.

use std::path::Path;

use serde::Deserialize;
use wsn_node::{NodeConfig, NodeError, UtilityModel, UtilityWeights};

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A simulation parameter is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Which parameter and why.
        reason: String,
    },

    /// Node energy rates or utility weights are out of range.
    #[error("invalid node configuration: {source}")]
    Node {
        /// The underlying node validation error.
        #[from]
        source: NodeError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `wsn-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Run name and random seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// Deployment area and cluster geometry.
    #[serde(default)]
    pub area: AreaConfig,

    /// Node counts and starting battery.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Per-tick energy costs.
    #[serde(default)]
    pub energy: EnergyConfig,

    /// Event sensing parameters.
    #[serde(default)]
    pub events: EventConfig,

    /// Head election parameters.
    #[serde(default)]
    pub election: ElectionConfig,

    /// Observer HTTP server settings.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the observer:
    /// - `OBSERVER_HOST` overrides `observer.host`
    /// - `OBSERVER_PORT` overrides `observer.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.observer.apply_env_overrides();
        Ok(config)
    }

    /// Check every parameter the engine depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for out-of-range geometry or event
    /// parameters, and [`ConfigError::Node`] for bad energy rates or
    /// utility weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.area.validate()?;
        self.events.validate()?;
        if self.population.initial_nodes > self.population.max_nodes {
            return Err(invalid(format!(
                "initial_nodes ({}) exceeds max_nodes ({})",
                self.population.initial_nodes, self.population.max_nodes
            )));
        }
        self.node_config().validate()?;
        self.election.weights.validate()?;
        Ok(())
    }

    /// Energy and behavior rates for individual nodes.
    pub fn node_config(&self) -> NodeConfig {
        NodeConfig {
            battery_capacity: self.population.battery_capacity,
            baseline_drain: self.energy.baseline_drain,
            event_cost: self.energy.event_cost,
            head_cost: self.energy.head_cost,
            event_decay: self.events.decay,
            event_boost: self.events.boost,
            fairness_increment: self.election.fairness_increment,
        }
    }

    /// Utility model scoring head candidates in this area.
    pub fn utility_model(&self) -> UtilityModel {
        UtilityModel::new(
            self.election.weights,
            self.population.battery_capacity,
            self.area.size,
        )
    }
}

/// Run identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
        }
    }
}

/// Square deployment area and cluster placement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AreaConfig {
    /// Side length of the square area (default: 1000).
    #[serde(default = "default_area_size")]
    pub size: f64,

    /// Number of clusters (default: 5).
    #[serde(default = "default_cluster_count")]
    pub cluster_count: u32,

    /// Minimum distance from cluster centers to the area edge (default: 100).
    #[serde(default = "default_center_margin")]
    pub center_margin: f64,

    /// Standard deviation of node offsets around their center (default: 80).
    #[serde(default = "default_placement_std_dev")]
    pub placement_std_dev: f64,
}

impl AreaConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(invalid(format!(
                "area.size must be positive and finite, got {}",
                self.size
            )));
        }
        if self.cluster_count == 0 {
            return Err(invalid("area.cluster_count must be at least 1".to_owned()));
        }
        if !self.center_margin.is_finite()
            || self.center_margin < 0.0
            || self.center_margin * 2.0 > self.size
        {
            return Err(invalid(format!(
                "area.center_margin must lie in [0, size / 2], got {}",
                self.center_margin
            )));
        }
        if !self.placement_std_dev.is_finite() || self.placement_std_dev <= 0.0 {
            return Err(invalid(format!(
                "area.placement_std_dev must be positive and finite, got {}",
                self.placement_std_dev
            )));
        }
        Ok(())
    }
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            size: default_area_size(),
            cluster_count: default_cluster_count(),
            center_margin: default_center_margin(),
            placement_std_dev: default_placement_std_dev(),
        }
    }
}

/// Population parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationConfig {
    /// Nodes placed when the simulation is first built (default: 50).
    #[serde(default = "default_initial_nodes")]
    pub initial_nodes: u32,

    /// Largest population a reset may request (default: 1000).
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u32,

    /// Starting battery of every node (default: 100).
    #[serde(default = "default_battery_capacity")]
    pub battery_capacity: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_nodes: default_initial_nodes(),
            max_nodes: default_max_nodes(),
            battery_capacity: default_battery_capacity(),
        }
    }
}

/// Per-tick energy costs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnergyConfig {
    /// Drained from every living node each tick (default: 0.2).
    #[serde(default = "default_baseline_drain")]
    pub baseline_drain: f64,

    /// Extra drain for sensing an event (default: 0.5).
    #[serde(default = "default_event_cost")]
    pub event_cost: f64,

    /// One-off cost of taking over as head (default: 1.5).
    #[serde(default = "default_head_cost")]
    pub head_cost: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            baseline_drain: default_baseline_drain(),
            event_cost: default_event_cost(),
            head_cost: default_head_cost(),
        }
    }
}

/// Event sensing parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventConfig {
    /// Nodes strictly closer than this to the event sense it (default: 150).
    #[serde(default = "default_event_radius")]
    pub radius: f64,

    /// Event score gained on sensing (default: 0.8).
    #[serde(default = "default_event_boost")]
    pub boost: f64,

    /// Per-tick multiplicative event score decay (default: 0.9).
    #[serde(default = "default_event_decay")]
    pub decay: f64,
}

impl EventConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.radius.is_finite() && self.radius >= 0.0 {
            Ok(())
        } else {
            Err(invalid(format!(
                "events.radius must be finite and non-negative, got {}",
                self.radius
            )))
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            radius: default_event_radius(),
            boost: default_event_boost(),
            decay: default_event_decay(),
        }
    }
}

/// Head election parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElectionConfig {
    /// Ticks a head may serve before a fresh election (default: 30).
    #[serde(default = "default_max_tenure_ticks")]
    pub max_tenure_ticks: u64,

    /// Fairness accrued per tick by non-head nodes (default: 0.02).
    #[serde(default = "default_fairness_increment")]
    pub fairness_increment: f64,

    /// Utility term weights.
    #[serde(default)]
    pub weights: UtilityWeights,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            max_tenure_ticks: default_max_tenure_ticks(),
            fairness_increment: default_fairness_increment(),
            weights: UtilityWeights::default(),
        }
    }
}

/// Observer HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Bind address (default: `0.0.0.0`).
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// Bind port (default: 5000).
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl ObserverConfig {
    /// Override the bind address with environment variables when set.
    ///
    /// An `OBSERVER_PORT` that is not a valid port number is ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("OBSERVER_HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("OBSERVER_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(e) => {
                    tracing::warn!(value = %val, error = %e, "Ignoring invalid OBSERVER_PORT");
                }
            }
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset (default: `info`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid { reason }
}

fn default_world_name() -> String {
    "WSN Cluster Simulation".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_area_size() -> f64 {
    1_000.0
}

const fn default_cluster_count() -> u32 {
    5
}

const fn default_center_margin() -> f64 {
    100.0
}

const fn default_placement_std_dev() -> f64 {
    80.0
}

const fn default_initial_nodes() -> u32 {
    50
}

const fn default_max_nodes() -> u32 {
    1_000
}

const fn default_battery_capacity() -> f64 {
    100.0
}

const fn default_baseline_drain() -> f64 {
    0.2
}

const fn default_event_cost() -> f64 {
    0.5
}

const fn default_head_cost() -> f64 {
    1.5
}

const fn default_event_radius() -> f64 {
    150.0
}

const fn default_event_boost() -> f64 {
    0.8
}

const fn default_event_decay() -> f64 {
    0.9
}

const fn default_max_tenure_ticks() -> u64 {
    30
}

const fn default_fairness_increment() -> f64 {
    0.02
}

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_owned()
}
