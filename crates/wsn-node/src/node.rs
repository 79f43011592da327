//! Per-node state and its transitions.
//!
//! A [`Node`] moves through `alive, follower` and `alive, head` any number
//! of times and ends in `dead`, which is terminal. Every mutator keeps the
//! node-local invariants:
//!
//! - battery never rises and never goes below zero
//! - a dead node is never head
//! - the death tick is written once, by the drain that empties the battery
//!
//! Cluster-level invariants (one head per cluster) are the engine's job.

use wsn_types::{ClusterId, DrainKind, NodeId, Point};

use crate::config::DEPLETION_EPSILON;
use crate::death::Death;
use crate::utility::UtilityModel;

/// One simulated sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    position: Point,
    cluster_id: ClusterId,
    battery: f64,
    death_tick: Option<u64>,
    event_score: f64,
    fairness_score: f64,
    is_head: bool,
    head_since: u64,
}

impl Node {
    /// Create a living, non-head node with a full battery.
    pub const fn new(id: NodeId, position: Point, cluster_id: ClusterId, battery: f64) -> Self {
        Self {
            id,
            position,
            cluster_id,
            battery,
            death_tick: None,
            event_score: 0.0,
            fairness_score: 0.0,
            is_head: false,
            head_since: 0,
        }
    }

    /// Node identifier.
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Fixed position in the area.
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Cluster the node was assigned to at reset.
    pub const fn cluster_id(&self) -> ClusterId {
        self.cluster_id
    }

    /// Remaining battery.
    pub const fn battery(&self) -> f64 {
        self.battery
    }

    /// Whether the node still has battery.
    pub const fn is_alive(&self) -> bool {
        self.death_tick.is_none()
    }

    /// Whether the node's battery is depleted.
    pub const fn is_dead(&self) -> bool {
        self.death_tick.is_some()
    }

    /// Tick on which the node died, if it has.
    pub const fn death_tick(&self) -> Option<u64> {
        self.death_tick
    }

    /// Recent proximity to sensed events (unclamped).
    pub const fn event_score(&self) -> f64 {
        self.event_score
    }

    /// Accumulated time since the node last led (unclamped).
    pub const fn fairness_score(&self) -> f64 {
        self.fairness_score
    }

    /// Whether the node currently leads its cluster.
    pub const fn is_head(&self) -> bool {
        self.is_head
    }

    /// Tick on which the node last became head.
    pub const fn head_since(&self) -> u64 {
        self.head_since
    }

    /// Ticks the node has held head status as of `now`, or `None` if it is
    /// not head.
    pub const fn tenure(&self, now: u64) -> Option<u64> {
        if self.is_head {
            Some(now.saturating_sub(self.head_since))
        } else {
            None
        }
    }

    /// Drain `amount` from the battery.
    ///
    /// If this empties the battery the node dies: battery is clamped to 0,
    /// head status is stripped, and `tick` is recorded as the death tick.
    /// The returned [`Death`] is the only report of that transition.
    ///
    /// Draining a dead node, or draining a non-positive or NaN amount, does
    /// nothing.
    pub fn consume(&mut self, amount: f64, cause: DrainKind, tick: u64) -> Option<Death> {
        if self.is_dead() || amount.is_nan() || amount <= 0.0 {
            return None;
        }

        self.battery -= amount;
        if self.battery > DEPLETION_EPSILON {
            return None;
        }

        let was_head = self.is_head;
        self.battery = 0.0;
        self.is_head = false;
        self.death_tick = Some(tick);

        Some(Death {
            node_id: self.id,
            cluster_id: self.cluster_id,
            tick,
            was_head,
            cause,
        })
    }

    /// Apply one tick of exponential decay to the event score.
    pub fn decay_event_score(&mut self, factor: f64) {
        if self.is_alive() {
            self.event_score *= factor;
        }
    }

    /// Raise the event score after sensing a nearby event.
    pub fn sense_event(&mut self, boost: f64) {
        if self.is_alive() {
            self.event_score += boost;
        }
    }

    /// Grow the fairness score of a living follower. Heads do not accrue.
    pub fn accrue_fairness(&mut self, increment: f64) {
        if self.is_alive() && !self.is_head {
            self.fairness_score += increment;
        }
    }

    /// Make this node its cluster's head as of `tick`.
    ///
    /// Resets the fairness score and restarts tenure. Returns `false` (and
    /// changes nothing) if the node is dead.
    pub const fn promote(&mut self, tick: u64) -> bool {
        if self.death_tick.is_some() {
            return false;
        }
        self.is_head = true;
        self.head_since = tick;
        self.fairness_score = 0.0;
        true
    }

    /// Strip head status.
    pub const fn demote(&mut self) {
        self.is_head = false;
    }

    /// Score this node as a head candidate against `gateway`.
    pub fn utility(&self, gateway: Point, model: &UtilityModel) -> f64 {
        model.score(self, gateway)
    }
}
