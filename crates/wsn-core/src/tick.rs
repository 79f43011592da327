//! Tick cycle: the three-phase loop that drives the cluster simulation.
//!
//! Each tick runs through these phases:
//!
//! 1. **Advance** -- increment the clock and sample one event location
//!    uniformly over the area.
//!
//! 2. **Drain** -- for every living node in ascending id order: charge the
//!    baseline drain, decay the event score, accrue fairness (non-heads),
//!    and, if the node lies strictly within the event radius, boost its
//!    event score and charge the sensing cost. A node that dies part-way
//!    through skips the rest of its updates.
//!
//! 3. **Elect** -- for every cluster in ascending id order, hold an
//!    election if the head is missing, dead, or past its tenure. The winner
//!    is promoted (even when re-elected) and charged the head cost; a
//!    different living incumbent is demoted.
//!
//! Given the same state and random source, a tick is deterministic.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;
use wsn_node::{Death, Node, NodeConfig, UtilityModel};
use wsn_types::{ClusterId, DrainKind, NodeId, Point};

use crate::clock::SimClock;
use crate::election::{self, Election};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: crate::clock::ClockError,
    },
}

/// Summary of a completed tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Where this tick's event occurred.
    pub event: Point,
    /// Nodes that died during this tick, in the order they died.
    pub deaths: Vec<Death>,
    /// Elections held during this tick, in cluster order.
    pub elections: Vec<Election>,
    /// Living nodes at the end of the tick.
    pub nodes_alive: u32,
    /// Living heads at the end of the tick.
    pub heads: u32,
}

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug, Clone)]
pub struct ClusterState {
    /// The simulation clock.
    pub clock: SimClock,
    /// Every node, keyed by id.
    pub nodes: BTreeMap<NodeId, Node>,
    /// Member ids of each cluster.
    pub clusters: BTreeMap<ClusterId, Vec<NodeId>>,
    /// The recorded head of each cluster. A dead head stays recorded until
    /// the next election replaces it.
    pub heads: BTreeMap<ClusterId, Option<NodeId>>,
    /// Gateway (sink) position.
    pub gateway: Point,
    /// Side length of the square area.
    pub area_size: f64,
    /// Nodes strictly closer than this to an event sense it.
    pub event_radius: f64,
    /// Ticks a head may serve before re-election.
    pub max_tenure_ticks: u64,
    /// Energy and behavior rates.
    pub node_config: NodeConfig,
    /// Head candidate scoring.
    pub utility: UtilityModel,
}

impl ClusterState {
    /// The living head of `cluster_id`, if it has one.
    pub fn living_head(&self, cluster_id: ClusterId) -> Option<&Node> {
        self.heads
            .get(&cluster_id)
            .copied()
            .flatten()
            .and_then(|id| self.nodes.get(&id))
            .filter(|node| node.is_alive())
    }

    /// Number of living nodes.
    pub fn alive_count(&self) -> u32 {
        let alive = self.nodes.values().filter(|n| n.is_alive()).count();
        u32::try_from(alive).unwrap_or(u32::MAX)
    }

    /// Number of living heads.
    pub fn head_count(&self) -> u32 {
        let heads = self
            .nodes
            .values()
            .filter(|n| n.is_alive() && n.is_head())
            .count();
        u32::try_from(heads).unwrap_or(u32::MAX)
    }
}

/// Execute one complete tick of the simulation.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter cannot advance. No
/// state is modified in that case.
pub fn run_tick<R: Rng + ?Sized>(
    state: &mut ClusterState,
    rng: &mut R,
) -> Result<TickSummary, TickError> {
    // --- Phase 1: Advance ---
    let tick = state.clock.advance()?;
    let event = Point::new(
        rng.random_range(0.0..=state.area_size),
        rng.random_range(0.0..=state.area_size),
    );
    debug!(tick, x = event.x(), y = event.y(), "Event sampled");

    // --- Phase 2: Drain ---
    let mut deaths = phase_drain(state, tick, event);

    // --- Phase 3: Elect ---
    let elections = phase_elect(state, tick, &mut deaths);

    let nodes_alive = state.alive_count();
    let heads = state.head_count();
    debug!(
        tick,
        nodes_alive,
        heads,
        deaths = deaths.len(),
        elections = elections.len(),
        "Tick complete"
    );

    Ok(TickSummary {
        tick,
        event,
        deaths,
        elections,
        nodes_alive,
        heads,
    })
}

/// Phase 2: per-node energy drain and score updates.
fn phase_drain(state: &mut ClusterState, tick: u64, event: Point) -> Vec<Death> {
    let cfg = &state.node_config;
    let mut deaths = Vec::new();

    for node in state.nodes.values_mut() {
        if node.is_dead() {
            continue;
        }

        if let Some(death) = node.consume(cfg.baseline_drain, DrainKind::Baseline, tick) {
            log_death(&death);
            deaths.push(death);
            continue;
        }

        node.decay_event_score(cfg.event_decay);
        node.accrue_fairness(cfg.fairness_increment);

        if node.position().distance_to(event) < state.event_radius {
            node.sense_event(cfg.event_boost);
            if let Some(death) = node.consume(cfg.event_cost, DrainKind::EventSensing, tick) {
                log_death(&death);
                deaths.push(death);
            }
        }
    }

    deaths
}

/// Phase 3: per-cluster head elections.
fn phase_elect(state: &mut ClusterState, tick: u64, deaths: &mut Vec<Death>) -> Vec<Election> {
    let mut elections = Vec::new();

    for (cluster_id, members) in &state.clusters {
        let previous = state.heads.get(cluster_id).copied().flatten();
        let incumbent = previous.and_then(|id| state.nodes.get(&id));
        let Some(trigger) = election::election_trigger(incumbent, tick, state.max_tenure_ticks)
        else {
            continue;
        };

        let candidates = members.iter().filter_map(|id| state.nodes.get(id));
        let Some(winner) = election::elect(candidates, state.gateway, &state.utility) else {
            if let Some(old) = previous.and_then(|id| state.nodes.get_mut(&id)) {
                old.demote();
                debug!(tick, cluster = %cluster_id, "Cluster has no living members");
            }
            state.heads.insert(*cluster_id, None);
            continue;
        };

        if let Some(old) = previous
            .filter(|id| *id != winner.id)
            .and_then(|id| state.nodes.get_mut(&id))
        {
            old.demote();
        }

        if let Some(node) = state.nodes.get_mut(&winner.id) {
            node.promote(tick);
            if let Some(death) = node.consume(state.node_config.head_cost, DrainKind::HeadDuty, tick)
            {
                log_death(&death);
                deaths.push(death);
            }
        }
        state.heads.insert(*cluster_id, Some(winner.id));

        debug!(
            tick,
            cluster = %cluster_id,
            winner = %winner.id,
            previous = ?previous.map(NodeId::into_inner),
            trigger = %trigger,
            utility = winner.utility,
            "Head elected"
        );
        elections.push(Election {
            cluster_id: *cluster_id,
            previous,
            winner: winner.id,
            trigger,
            utility: winner.utility,
        });
    }

    elections
}

fn log_death(death: &Death) {
    debug!(
        tick = death.tick,
        node = %death.node_id,
        cluster = %death.cluster_id,
        cause = %death.cause,
        was_head = death.was_head,
        "Node died"
    );
}
