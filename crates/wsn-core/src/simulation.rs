//! The cluster simulation engine.
//!
//! [`ClusterSimulation`] owns the node population, the random source, and
//! the clock. Clients drive it with [`reset`](ClusterSimulation::reset),
//! [`step`](ClusterSimulation::step), and
//! [`snapshot`](ClusterSimulation::snapshot). The engine is single-threaded;
//! callers that share it across tasks wrap it in a mutex.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use wsn_node::{Death, Node};
use wsn_types::{ClusterId, DrainKind, NodeId, Point, Snapshot};

use crate::clock::SimClock;
use crate::config::{ConfigError, SimulationConfig};
use crate::placement::{Placement, PlacementError};
use crate::snapshot;
use crate::tick::{self, ClusterState, TickError, TickSummary};

/// Errors that can occur when building a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The configuration was rejected.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The placement distribution could not be built.
    #[error("placement error: {source}")]
    Placement {
        /// The underlying placement error.
        #[from]
        source: PlacementError,
    },
}

/// Simulation seeded from a [`SmallRng`].
pub type DefaultSimulation = ClusterSimulation<SmallRng>;

/// A clustered sensor network simulation.
#[derive(Debug)]
pub struct ClusterSimulation<R = SmallRng> {
    state: ClusterState,
    placement: Placement,
    config: SimulationConfig,
    rng: R,
}

impl ClusterSimulation<SmallRng> {
    /// Build a simulation seeded from `config.world.seed`.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        Self::from_seed(config, config.world.seed)
    }

    /// Build a simulation with an explicit seed.
    pub fn from_seed(config: &SimulationConfig, seed: u64) -> Result<Self, SimulationError> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ClusterSimulation<R> {
    /// Build a simulation drawing randomness from `rng`.
    ///
    /// The configuration is validated, then the initial population of
    /// `population.initial_nodes` is placed.
    pub fn with_rng(config: &SimulationConfig, rng: R) -> Result<Self, SimulationError> {
        config.validate()?;
        let placement = Placement::new(&config.area)?;

        let weight_sum = config.election.weights.sum();
        if (weight_sum - 1.0).abs() > 1e-6 {
            warn!(weight_sum, "Utility weights do not sum to 1");
        }

        let size = config.area.size;
        let state = ClusterState {
            clock: SimClock::new(),
            nodes: BTreeMap::new(),
            clusters: BTreeMap::new(),
            heads: BTreeMap::new(),
            gateway: Point::new(size / 2.0, size / 2.0),
            area_size: size,
            event_radius: config.events.radius,
            max_tenure_ticks: config.election.max_tenure_ticks,
            node_config: config.node_config(),
            utility: config.utility_model(),
        };

        let mut simulation = Self {
            state,
            placement,
            config: config.clone(),
            rng,
        };
        simulation.reset(config.population.initial_nodes);
        Ok(simulation)
    }

    /// Discard the current population and place `node_count` fresh nodes.
    ///
    /// The clock rewinds to 0 and every cluster starts without a head.
    pub fn reset(&mut self, node_count: u32) {
        let deployment = self.placement.deploy(
            &mut self.rng,
            node_count,
            self.config.population.battery_capacity,
        );

        self.state.clock.reset();
        self.state.heads = deployment.members.keys().map(|id| (*id, None)).collect();
        self.state.nodes = deployment.nodes;
        self.state.clusters = deployment.members;

        for (cluster_id, center) in &deployment.centers {
            debug!(cluster = %cluster_id, x = center.x(), y = center.y(), "Cluster center");
        }
        info!(
            node_count,
            cluster_count = self.state.clusters.len(),
            "Simulation reset"
        );
    }

    /// Run one tick and return its summary.
    pub fn advance(&mut self) -> Result<TickSummary, TickError> {
        tick::run_tick(&mut self.state, &mut self.rng)
    }

    /// Run one tick and return the resulting snapshot.
    pub fn step(&mut self) -> Result<Snapshot, TickError> {
        self.advance()?;
        Ok(self.snapshot())
    }

    /// Drain `amount` from one node outside the tick cycle.
    ///
    /// Returns the death record if this empties the battery. Unknown ids,
    /// dead nodes, and non-positive amounts are ignored. A head killed this
    /// way is replaced at the next tick's election.
    pub fn drain_node(&mut self, id: NodeId, amount: f64) -> Option<Death> {
        let tick = self.state.clock.tick();
        let death = self
            .state
            .nodes
            .get_mut(&id)?
            .consume(amount, DrainKind::Injected, tick)?;
        debug!(
            tick,
            node = %death.node_id,
            cluster = %death.cluster_id,
            was_head = death.was_head,
            "Node drained to death"
        );
        Some(death)
    }
}

impl<R> ClusterSimulation<R> {
    /// Export the current state without advancing.
    pub fn snapshot(&self) -> Snapshot {
        snapshot::export(&self.state)
    }

    /// Current tick.
    pub const fn sim_time(&self) -> u64 {
        self.state.clock.tick()
    }

    /// Gateway (sink) position.
    pub const fn gateway(&self) -> Point {
        self.state.gateway
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.state.nodes.get(&id)
    }

    /// Every node in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.state.nodes.values()
    }

    /// Number of nodes, living or dead.
    pub fn node_count(&self) -> usize {
        self.state.nodes.len()
    }

    /// The living head of a cluster.
    pub fn head_of(&self, cluster_id: ClusterId) -> Option<&Node> {
        self.state.living_head(cluster_id)
    }

    /// Read-only view of the full tick state.
    pub const fn state(&self) -> &ClusterState {
        &self.state
    }

    /// The configuration this simulation was built from.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn single_cluster(initial_nodes: u32) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.area.cluster_count = 1;
        config.population.initial_nodes = initial_nodes;
        config
    }

    fn heads_per_cluster(sim: &DefaultSimulation) -> BTreeMap<ClusterId, usize> {
        let mut counts = BTreeMap::new();
        for node in sim.nodes().filter(|n| n.is_head()) {
            let entry: &mut usize = counts.entry(node.cluster_id()).or_default();
            *entry = entry.saturating_add(1);
        }
        counts
    }

    #[test]
    fn construction_places_initial_population() {
        let sim = DefaultSimulation::from_config(&SimulationConfig::default()).unwrap();
        assert_eq!(sim.node_count(), 50);
        assert_eq!(sim.sim_time(), 0);
        assert_eq!(sim.gateway(), Point::new(500.0, 500.0));
        assert!(sim.nodes().all(|n| n.is_alive() && !n.is_head()));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SimulationConfig::default();
        config.area.cluster_count = 0;
        let result = DefaultSimulation::from_config(&config);
        assert!(matches!(result, Err(SimulationError::Config { .. })));
    }

    #[test]
    fn reset_replaces_population_and_rewinds_clock() {
        let mut sim = DefaultSimulation::from_seed(&SimulationConfig::default(), 1).unwrap();
        for _ in 0..5 {
            sim.step().unwrap();
        }
        sim.reset(12);
        assert_eq!(sim.sim_time(), 0);
        assert_eq!(sim.node_count(), 12);
        assert!(sim.nodes().all(|n| !n.is_head() && n.is_alive()));
        let snapshot = sim.snapshot();
        assert!(snapshot.links.is_empty());
        assert!(snapshot.clusters.iter().all(|c| c.head.is_none()));
    }

    #[test]
    fn population_is_constant_across_steps() {
        let mut sim = DefaultSimulation::from_seed(&SimulationConfig::default(), 2).unwrap();
        for _ in 0..100 {
            let snapshot = sim.step().unwrap();
            assert_eq!(snapshot.nodes.len(), 50);
            assert_eq!(snapshot.population.alive + snapshot.population.dead, 50);
        }
    }

    #[test]
    fn battery_never_increases() {
        let mut sim = DefaultSimulation::from_seed(&SimulationConfig::default(), 3).unwrap();
        let mut previous: Vec<f64> = sim.nodes().map(Node::battery).collect();
        for _ in 0..300 {
            sim.step().unwrap();
            let current: Vec<f64> = sim.nodes().map(Node::battery).collect();
            for (now, before) in current.iter().zip(&previous) {
                assert!(now <= before);
                assert!(*now >= 0.0);
            }
            previous = current;
        }
    }

    #[test]
    fn death_is_terminal() {
        let mut sim = DefaultSimulation::from_seed(&SimulationConfig::default(), 4).unwrap();
        let mut deaths: BTreeMap<NodeId, u64> = BTreeMap::new();
        for _ in 0..400 {
            sim.step().unwrap();
            for node in sim.nodes() {
                if let Some(tick) = node.death_tick() {
                    let first = *deaths.entry(node.id()).or_insert(tick);
                    assert_eq!(first, tick);
                    assert!(node.battery().abs() < f64::EPSILON);
                    assert!(!node.is_head());
                }
            }
            for id in deaths.keys() {
                assert!(sim.node(*id).unwrap().is_dead());
            }
        }
    }

    #[test]
    fn at_most_one_living_head_per_cluster() {
        let mut sim = DefaultSimulation::from_seed(&SimulationConfig::default(), 5).unwrap();
        for _ in 0..400 {
            sim.step().unwrap();
            assert!(heads_per_cluster(&sim).values().all(|count| *count <= 1));
            assert!(sim.nodes().filter(|n| n.is_head()).all(Node::is_alive));
        }
    }

    #[test]
    fn tenure_never_exceeds_limit_by_more_than_one() {
        let config = SimulationConfig::default();
        let limit = config.election.max_tenure_ticks.saturating_add(1);
        let mut sim = DefaultSimulation::from_seed(&config, 6).unwrap();
        for _ in 0..200 {
            sim.step().unwrap();
            let now = sim.sim_time();
            for node in sim.nodes().filter(|n| n.is_head()) {
                assert!(node.tenure(now).unwrap() <= limit);
            }
        }
    }

    #[test]
    fn every_link_targets_a_living_head() {
        let mut sim = DefaultSimulation::from_seed(&SimulationConfig::default(), 7).unwrap();
        for _ in 0..300 {
            let snapshot = sim.step().unwrap();
            for link in &snapshot.links {
                let head = snapshot.node(link.head).unwrap();
                let follower = snapshot.node(link.node).unwrap();
                assert!(head.is_head && !head.dead);
                assert!(!follower.is_head && !follower.dead);
                assert_eq!(head.cluster_id, follower.cluster_id);
            }
        }
    }

    #[test]
    fn same_seed_same_history() {
        let config = SimulationConfig::default();
        let mut a = DefaultSimulation::from_seed(&config, 99).unwrap();
        let mut b = DefaultSimulation::from_seed(&config, 99).unwrap();
        for _ in 0..50 {
            assert_eq!(a.step().unwrap(), b.step().unwrap());
        }
    }

    #[test]
    fn baseline_only_population_dies_at_tick_500() {
        let mut config = single_cluster(10);
        config.energy.event_cost = 0.0;
        config.energy.head_cost = 0.0;
        let mut sim = DefaultSimulation::from_seed(&config, 8).unwrap();

        for _ in 0..499 {
            sim.step().unwrap();
        }
        assert!(sim.nodes().all(Node::is_alive));

        let snapshot = sim.step().unwrap();
        assert_eq!(snapshot.sim_time, 500);
        assert_eq!(snapshot.population.dead, 10);
        assert!(sim.nodes().all(|n| n.death_tick() == Some(500)));
        assert!(snapshot.dead_stats.iter().all(|d| d.downtime == 0));
    }

    #[test]
    fn sole_survivor_takes_over_next_tick() {
        let mut sim = DefaultSimulation::from_seed(&single_cluster(6), 10).unwrap();
        sim.step().unwrap();

        let cluster = ClusterId::new(0);
        let head = sim.head_of(cluster).unwrap().id();
        let survivor = sim.nodes().map(Node::id).find(|id| *id != head).unwrap();
        let doomed: Vec<NodeId> = sim.nodes().map(Node::id).filter(|id| *id != survivor).collect();
        for id in doomed {
            assert!(sim.drain_node(id, 1_000.0).is_some());
        }

        // No link may reference the dead head before the next election.
        assert!(sim.snapshot().links.is_empty());
        assert!(sim.head_of(cluster).is_none());

        let summary = sim.advance().unwrap();
        assert_eq!(summary.tick, 2);
        assert_eq!(sim.head_of(cluster).map(Node::id), Some(survivor));
        let election = summary.elections.first().unwrap();
        assert_eq!(election.previous, Some(head));
        assert_eq!(election.winner, survivor);
    }

    #[test]
    fn drain_node_ignores_unknown_and_dead() {
        let mut sim = DefaultSimulation::from_seed(&single_cluster(2), 11).unwrap();
        assert!(sim.drain_node(NodeId::new(99), 1_000.0).is_none());
        assert!(sim.drain_node(NodeId::new(0), 1_000.0).is_some());
        assert!(sim.drain_node(NodeId::new(0), 1_000.0).is_none());
        assert!(sim.drain_node(NodeId::new(1), 10.0).is_none());
        assert!((sim.node(NodeId::new(1)).unwrap().battery() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn empty_simulation_steps() {
        let mut sim = DefaultSimulation::from_seed(&SimulationConfig::default(), 12).unwrap();
        sim.reset(0);
        let snapshot = sim.step().unwrap();
        assert_eq!(snapshot.sim_time, 1);
        assert!(snapshot.nodes.is_empty());
        assert!(snapshot.links.is_empty());
        assert!(snapshot.dead_stats.is_empty());
        assert_eq!(snapshot.clusters.len(), 5);
    }

    #[test]
    fn snapshot_does_not_advance() {
        let mut sim = DefaultSimulation::from_seed(&SimulationConfig::default(), 13).unwrap();
        sim.step().unwrap();
        let first = sim.snapshot();
        let second = sim.snapshot();
        assert_eq!(first, second);
        assert_eq!(sim.sim_time(), 1);
    }
}
