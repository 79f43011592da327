//! Cluster head election.
//!
//! A cluster holds an election when any of these is true at the end of the
//! drain phase:
//!
//! 1. **Vacant**: the cluster has never had a head, or its last election
//!    found no living candidate.
//! 2. **Head died**: the recorded head's battery is depleted.
//! 3. **Tenure expired**: more than `max_tenure_ticks` ticks have passed
//!    since the head was last elected.
//!
//! The winner is the living member with the highest utility. Ties go to the
//! lowest node id, so results never depend on iteration order.

use std::cmp::Ordering;

use wsn_node::{Node, UtilityModel};
use wsn_types::{ClusterId, ElectionTrigger, NodeId, Point};

/// The outcome of one election.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Election {
    /// The cluster that voted.
    pub cluster_id: ClusterId,
    /// The head before the election, if any (possibly dead).
    pub previous: Option<NodeId>,
    /// The newly elected head.
    pub winner: NodeId,
    /// Why the election was held.
    pub trigger: ElectionTrigger,
    /// The winner's utility at election time.
    pub utility: f64,
}

/// A scored candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// The candidate node.
    pub id: NodeId,
    /// Its utility.
    pub utility: f64,
}

/// Decide whether a cluster must hold an election at tick `now`.
///
/// `incumbent` is the node recorded as the cluster's head, if any. Returns
/// `None` while a living head is within its tenure.
pub fn election_trigger(
    incumbent: Option<&Node>,
    now: u64,
    max_tenure_ticks: u64,
) -> Option<ElectionTrigger> {
    let Some(head) = incumbent else {
        return Some(ElectionTrigger::Vacant);
    };
    if head.is_dead() {
        return Some(ElectionTrigger::HeadDied);
    }
    if now.saturating_sub(head.head_since()) > max_tenure_ticks {
        return Some(ElectionTrigger::TenureExpired);
    }
    None
}

/// Pick the best living candidate among `members`.
///
/// Returns `None` if no member is alive.
pub fn elect<'a, I>(members: I, gateway: Point, model: &UtilityModel) -> Option<Candidate>
where
    I: IntoIterator<Item = &'a Node>,
{
    members
        .into_iter()
        .filter(|node| node.is_alive())
        .map(|node| Candidate {
            id: node.id(),
            utility: node.utility(gateway, model),
        })
        .fold(None, |best, candidate| match best {
            None => Some(candidate),
            Some(current) => Some(if outranks(&candidate, &current) {
                candidate
            } else {
                current
            }),
        })
}

fn outranks(challenger: &Candidate, current: &Candidate) -> bool {
    match challenger.utility.total_cmp(&current.utility) {
        Ordering::Greater => true,
        Ordering::Equal => challenger.id < current.id,
        Ordering::Less => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wsn_node::UtilityWeights;
    use wsn_types::DrainKind;

    use super::*;

    fn model() -> UtilityModel {
        UtilityModel::new(UtilityWeights::default(), 100.0, 1_000.0)
    }

    fn node(id: u32, x: f64, battery: f64) -> Node {
        Node::new(NodeId::new(id), Point::new(x, 500.0), ClusterId::new(0), battery)
    }

    const GATEWAY: Point = Point::new(500.0, 500.0);

    #[test]
    fn no_head_is_vacant() {
        assert_eq!(election_trigger(None, 1, 30), Some(ElectionTrigger::Vacant));
    }

    #[test]
    fn dead_head_triggers() {
        let mut head = node(0, 500.0, 1.0);
        head.promote(1);
        head.consume(5.0, DrainKind::Baseline, 3);
        assert_eq!(
            election_trigger(Some(&head), 3, 30),
            Some(ElectionTrigger::HeadDied)
        );
    }

    #[test]
    fn tenure_boundary() {
        let mut head = node(0, 500.0, 100.0);
        head.promote(1);
        assert_eq!(election_trigger(Some(&head), 31, 30), None);
        assert_eq!(
            election_trigger(Some(&head), 32, 30),
            Some(ElectionTrigger::TenureExpired)
        );
    }

    #[test]
    fn highest_utility_wins() {
        let nodes = [node(0, 500.0, 40.0), node(1, 500.0, 90.0), node(2, 500.0, 60.0)];
        let winner = elect(&nodes, GATEWAY, &model()).unwrap();
        assert_eq!(winner.id, NodeId::new(1));
    }

    #[test]
    fn closer_node_wins_on_equal_battery() {
        let nodes = [node(0, 100.0, 80.0), node(1, 480.0, 80.0)];
        let winner = elect(&nodes, GATEWAY, &model()).unwrap();
        assert_eq!(winner.id, NodeId::new(1));
    }

    #[test]
    fn ties_go_to_lowest_id_regardless_of_order() {
        let nodes = [node(7, 500.0, 80.0), node(3, 500.0, 80.0), node(5, 500.0, 80.0)];
        let winner = elect(&nodes, GATEWAY, &model()).unwrap();
        assert_eq!(winner.id, NodeId::new(3));
    }

    #[test]
    fn dead_members_are_not_candidates() {
        let mut strong = node(0, 500.0, 1.0);
        strong.consume(2.0, DrainKind::Injected, 4);
        let nodes = [strong, node(1, 100.0, 10.0)];
        let winner = elect(&nodes, GATEWAY, &model()).unwrap();
        assert_eq!(winner.id, NodeId::new(1));
    }

    #[test]
    fn no_living_member_elects_nobody() {
        let mut only = node(0, 500.0, 1.0);
        only.consume(2.0, DrainKind::Injected, 4);
        assert!(elect(&[only], GATEWAY, &model()).is_none());
        assert!(elect(std::iter::empty::<&Node>(), GATEWAY, &model()).is_none());
    }
}
