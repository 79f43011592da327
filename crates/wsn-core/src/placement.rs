//! Random deployment of nodes around cluster centers.
//!
//! Each reset draws `cluster_count` centers uniformly from the inner square
//! `[margin, size - margin]^2`, then places every node around a uniformly
//! chosen center with independent normal offsets on each axis. Positions
//! that fall outside the area are clamped onto its edge.
//!
//! Node ids are assigned `0..n` in placement order, so cluster member lists
//! come out sorted by id.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use rand_distr::{Distribution, Normal};
use wsn_node::Node;
use wsn_types::{ClusterId, NodeId, Point};

use crate::config::AreaConfig;

/// Errors raised when building a [`Placement`].
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    /// The offset distribution could not be built.
    #[error("invalid placement spread: {reason}")]
    Spread {
        /// Why the distribution was rejected.
        reason: String,
    },
}

/// A freshly placed population.
#[derive(Debug, Clone, Default)]
pub struct Deployment {
    /// Cluster centers by cluster id.
    pub centers: BTreeMap<ClusterId, Point>,
    /// Every node, keyed by id.
    pub nodes: BTreeMap<NodeId, Node>,
    /// Member ids of each cluster in ascending order. Every cluster id has
    /// an entry, possibly empty.
    pub members: BTreeMap<ClusterId, Vec<NodeId>>,
}

/// Placement parameters for one area.
#[derive(Debug, Clone)]
pub struct Placement {
    area_size: f64,
    cluster_count: u32,
    center_margin: f64,
    spread: Normal<f64>,
}

impl Placement {
    /// Build a placement from area settings.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::Spread`] if the standard deviation is not a
    /// usable normal parameter.
    pub fn new(area: &AreaConfig) -> Result<Self, PlacementError> {
        let spread =
            Normal::new(0.0, area.placement_std_dev).map_err(|e| PlacementError::Spread {
                reason: e.to_string(),
            })?;
        Ok(Self {
            area_size: area.size,
            cluster_count: area.cluster_count,
            center_margin: area.center_margin,
            spread,
        })
    }

    /// Draw one center per cluster.
    pub fn cluster_centers<R: Rng + ?Sized>(&self, rng: &mut R) -> BTreeMap<ClusterId, Point> {
        let low = self.center_margin;
        let high = self.area_size - self.center_margin;
        (0..self.cluster_count)
            .map(|raw| {
                let x = rng.random_range(low..=high);
                let y = rng.random_range(low..=high);
                (ClusterId::new(raw), Point::new(x, y))
            })
            .collect()
    }

    /// Place `node_count` nodes, each starting with `battery`.
    pub fn deploy<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        node_count: u32,
        battery: f64,
    ) -> Deployment {
        let centers = self.cluster_centers(rng);
        let choices: Vec<(ClusterId, Point)> =
            centers.iter().map(|(id, center)| (*id, *center)).collect();

        let mut members: BTreeMap<ClusterId, Vec<NodeId>> =
            centers.keys().map(|id| (*id, Vec::new())).collect();
        let mut nodes = BTreeMap::new();

        for raw in 0..node_count {
            let Some(&(cluster_id, center)) = choices.choose(rng) else {
                break;
            };
            let dx = self.spread.sample(rng);
            let dy = self.spread.sample(rng);
            let position =
                Point::new(center.x() + dx, center.y() + dy).clamp_to_area(self.area_size);

            let id = NodeId::new(raw);
            nodes.insert(id, Node::new(id, position, cluster_id, battery));
            members.entry(cluster_id).or_default().push(id);
        }

        Deployment {
            centers,
            nodes,
            members,
        }
    }
}
