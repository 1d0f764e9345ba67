//! Proximity clustering.
//!
//! Uses a union-find data structure to group hits that are connected
//! through chains of neighbors closer than a fixed radius.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use slicerecon_core::{parse_params, Cluster, ClusteringAlgorithm, ConfigError, Hit, Result};

use crate::SpatialGrid;

/// Proximity clustering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProximityConfig {
    /// Maximum (x, z) distance between neighboring hits (cm).
    pub radius: f64,
    /// Minimum number of hits to form a valid cluster.
    pub min_cluster_size: usize,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            radius: 2.5,
            min_cluster_size: 1,
        }
    }
}

impl ProximityConfig {
    /// Sets the neighbor radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the minimum cluster size.
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }
}

/// Union-Find data structure for connected component detection.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let px = self.find(x);
        let py = self.find(y);

        if px == py {
            return;
        }

        match self.rank[px].cmp(&self.rank[py]) {
            std::cmp::Ordering::Less => self.parent[px] = py,
            std::cmp::Ordering::Greater => self.parent[py] = px,
            std::cmp::Ordering::Equal => {
                self.parent[py] = px;
                self.rank[px] += 1;
            }
        }
    }
}

/// Clustering of hits connected by neighbors within `radius`.
///
/// Clusters come out ordered by their first hit in input order.
#[derive(Debug, Clone, Default)]
pub struct ProximityClustering {
    config: ProximityConfig,
}

impl ProximityClustering {
    /// Identifier used in settings.
    pub const NAME: &'static str = "ProximityClustering";

    /// Create with custom configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] unless `radius` is positive
    /// and finite.
    pub fn new(config: ProximityConfig) -> std::result::Result<Self, ConfigError> {
        if !(config.radius.is_finite() && config.radius > 0.0) {
            return Err(ConfigError::InvalidParameter {
                algorithm: Self::NAME.to_string(),
                reason: format!("radius must be positive, got {}", config.radius),
            });
        }
        Ok(Self { config })
    }

    /// Create from a settings `params` object.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] for malformed parameters.
    pub fn from_params(params: &Value) -> std::result::Result<Self, ConfigError> {
        Self::new(parse_params(Self::NAME, params)?)
    }

    /// Active configuration.
    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }
}

impl ClusteringAlgorithm for ProximityClustering {
    fn cluster(&mut self, hits: &[Hit]) -> Result<Vec<Cluster>> {
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let n = hits.len();
        let mut uf = UnionFind::new(n);
        let radius_squared = self.config.radius * self.config.radius;
        let mut grid = SpatialGrid::new(self.config.radius);

        // Link each hit to already indexed neighbors
        for (i, hit) in hits.iter().enumerate() {
            let neighbors: Vec<usize> = grid
                .query_neighborhood(hit.x, hit.z)
                .copied()
                .filter(|&j| hit.distance_squared(&hits[j]) <= radius_squared)
                .collect();
            for j in neighbors {
                uf.union(i, j);
            }
            grid.insert(hit.x, hit.z, i);
        }

        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut clusters: Vec<Cluster> = Vec::new();
        for (i, hit) in hits.iter().enumerate() {
            let root = uf.find(i);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                clusters.push(Cluster::new());
                clusters.len() - 1
            });
            clusters[slot].push(*hit);
        }

        clusters.retain(|cluster| cluster.len() >= self.config.min_cluster_size);
        Ok(clusters)
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicerecon_core::View;

    fn hit(id: u32, x: f64, z: f64) -> Hit {
        Hit::new(id, View::W, x, z, 1.0)
    }

    #[test]
    fn test_proximity_single_cluster() {
        let hits = vec![hit(0, 0.0, 0.0), hit(1, 1.0, 0.0), hit(2, 1.0, 1.0)];

        let mut algo = ProximityClustering::new(ProximityConfig::default().with_radius(1.5)).unwrap();
        let clusters = algo.cluster(&hits).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 3);
    }

    #[test]
    fn test_proximity_separate_clusters_keep_input_order() {
        let hits = vec![
            hit(0, 100.0, 100.0),
            hit(1, 0.0, 0.0),
            hit(2, 101.0, 100.0),
            hit(3, 1.0, 0.0),
        ];

        let mut algo = ProximityClustering::new(ProximityConfig::default().with_radius(2.0)).unwrap();
        let clusters = algo.cluster(&hits).unwrap();

        assert_eq!(clusters.len(), 2);
        let ids: Vec<Vec<u32>> = clusters
            .iter()
            .map(|c| c.iter().map(|h| h.id).collect())
            .collect();
        assert_eq!(ids, vec![vec![0, 2], vec![1, 3]]);
    }

    #[test]
    fn test_proximity_chain_across_cells() {
        let hits: Vec<Hit> = (0..10).map(|i| hit(i, f64::from(i) * 0.9, 0.0)).collect();
        let mut algo = ProximityClustering::new(ProximityConfig::default().with_radius(1.0)).unwrap();
        let clusters = algo.cluster(&hits).unwrap();
        assert_eq!(clusters.len(), 1);
    }

    #[test]
    fn test_proximity_min_cluster_size() {
        let hits = vec![hit(0, 0.0, 0.0), hit(1, 0.5, 0.0), hit(2, 50.0, 50.0)];
        let config = ProximityConfig::default().with_min_cluster_size(2);
        let mut algo = ProximityClustering::new(config).unwrap();
        let clusters = algo.cluster(&hits).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 2);
    }

    #[test]
    fn test_proximity_empty_input() {
        let mut algo = ProximityClustering::default();
        assert!(algo.cluster(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_proximity_extreme_coordinates() {
        let hits = vec![
            Hit::new(0, View::U, 1e300, 0.0, 1.0),
            Hit::new(1, View::U, 1e300, 0.5, 1.0),
            Hit::new(2, View::U, -1e300, 0.0, 1.0),
        ];
        let mut algo = ProximityClustering::default();
        let clusters = algo.cluster(&hits).unwrap();

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[1].len(), 1);
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let err = ProximityClustering::from_params(&serde_json::json!({"radius": 0.0})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));

        let err =
            ProximityClustering::from_params(&serde_json::json!({"radius": 1.0, "eps": 2})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));
    }

    #[test]
    fn test_union_find() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(2, 3);
        uf.union(1, 2);

        assert_eq!(uf.find(0), uf.find(3));
        assert_ne!(uf.find(0), uf.find(4));
    }
}
