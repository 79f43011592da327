//! Death records emitted when a node's battery runs out.
//!
//! A node dies exactly once, on the drain that takes its battery to zero.
//! The [`Death`] returned by [`Node::consume`](crate::node::Node::consume)
//! is the only report of that transition; the engine collects these into
//! the tick summary and logs them.

use wsn_types::{ClusterId, DrainKind, NodeId};

/// A node's transition from alive to dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Death {
    /// The node that died.
    pub node_id: NodeId,

    /// The cluster the node belonged to.
    pub cluster_id: ClusterId,

    /// Tick on which the battery reached zero.
    pub tick: u64,

    /// Whether the node was leading its cluster when it died.
    pub was_head: bool,

    /// The drain that emptied the battery.
    pub cause: DrainKind,
}

impl core::fmt::Display for Death {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "node {} (cluster {}) died at tick {} from {}",
            self.node_id, self.cluster_id, self.tick, self.cause
        )?;
        if self.was_head {
            write!(f, " while head")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_head_status() {
        let death = Death {
            node_id: NodeId::new(4),
            cluster_id: ClusterId::new(2),
            tick: 17,
            was_head: true,
            cause: DrainKind::HeadDuty,
        };
        assert_eq!(
            death.to_string(),
            "node 4 (cluster 2) died at tick 17 from head_duty while head"
        );
    }
}
