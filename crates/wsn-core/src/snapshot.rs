//! Snapshot export.
//!
//! Builds the immutable [`Snapshot`] served to clients from the live
//! [`ClusterState`]. Export never mutates the simulation.

use wsn_node::Node;
use wsn_types::{
    ClusterRecord, DeadStat, LinkRecord, NodeColor, NodeRecord, PopulationStats, Snapshot,
};

use crate::tick::ClusterState;

/// Build a snapshot of `state` at its current tick.
pub fn export(state: &ClusterState) -> Snapshot {
    let sim_time = state.clock.tick();

    let nodes = state.nodes.values().map(node_record).collect();
    let links = state
        .nodes
        .values()
        .filter_map(|node| link_record(state, node))
        .collect();
    let dead_stats: Vec<DeadStat> = state
        .nodes
        .values()
        .filter_map(|node| {
            node.death_tick().map(|dead_since| DeadStat {
                node_id: node.id(),
                dead_since,
                downtime: state.clock.elapsed_since(dead_since),
            })
        })
        .collect();
    let clusters = state
        .clusters
        .iter()
        .map(|(id, members)| ClusterRecord {
            id: *id,
            head: state.living_head(*id).map(Node::id),
            members: count(members.len()),
            alive_members: count(
                members
                    .iter()
                    .filter_map(|m| state.nodes.get(m))
                    .filter(|n| n.is_alive())
                    .count(),
            ),
        })
        .collect();
    let population = population_stats(state, &dead_stats);

    Snapshot {
        sim_time,
        gateway: state.gateway,
        nodes,
        links,
        dead_stats,
        clusters,
        population,
    }
}

fn node_record(node: &Node) -> NodeRecord {
    let position = node.position();
    NodeRecord {
        id: node.id(),
        x: position.x(),
        y: position.y(),
        color: NodeColor::classify(node.is_dead(), node.battery()),
        is_head: node.is_head(),
        dead: node.is_dead(),
        battery: node.battery(),
        cluster_id: node.cluster_id(),
    }
}

/// A link exists only from a living follower to its cluster's living head.
fn link_record(state: &ClusterState, node: &Node) -> Option<LinkRecord> {
    if node.is_dead() || node.is_head() {
        return None;
    }
    let head = state
        .living_head(node.cluster_id())
        .filter(|head| head.id() != node.id())?;
    Some(LinkRecord {
        start: node.position(),
        end: head.position(),
        node: node.id(),
        head: head.id(),
    })
}

fn population_stats(state: &ClusterState, dead_stats: &[DeadStat]) -> PopulationStats {
    let alive = state.alive_count();
    let battery_sum: f64 = state
        .nodes
        .values()
        .filter(|n| n.is_alive())
        .map(Node::battery)
        .sum();
    let mean_battery = if alive == 0 {
        0.0
    } else {
        battery_sum / f64::from(alive)
    };

    PopulationStats {
        total: count(state.nodes.len()),
        alive,
        dead: count(dead_stats.len()),
        heads: state.head_count(),
        total_downtime: dead_stats
            .iter()
            .fold(0_u64, |acc, stat| acc.saturating_add(stat.downtime)),
        mean_battery,
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
