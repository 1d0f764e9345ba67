//! Hit and cluster types for wire-plane detector data.

use serde::{Deserialize, Serialize};

use crate::View;

/// A single elementary measurement on one wire plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Identifier, unique within an event.
    pub id: u32,
    /// Plane the hit was recorded on.
    pub view: View,
    /// Drift coordinate (cm), common to all views.
    pub x: f64,
    /// Wire coordinate (cm) within the view.
    pub z: f64,
    /// Deposited charge (arbitrary units).
    #[serde(default)]
    pub charge: f32,
}

impl Hit {
    /// Creates a new hit.
    #[inline]
    pub fn new(id: u32, view: View, x: f64, z: f64, charge: f32) -> Self {
        Self {
            id,
            view,
            x,
            z,
            charge,
        }
    }

    /// Computes the squared Euclidean distance to another hit in (x, z).
    #[inline]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }
}

/// A group of hits from one view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Hits belonging to this cluster.
    pub hits: Vec<Hit>,
}

impl Cluster {
    /// Creates an empty cluster.
    pub fn new() -> Self {
        Self { hits: Vec::new() }
    }

    /// Creates a cluster with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hits: Vec::with_capacity(capacity),
        }
    }

    /// Adds a hit to the cluster.
    pub fn push(&mut self, hit: Hit) {
        self.hits.push(hit);
    }

    /// Returns the number of hits in the cluster.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if the cluster is empty.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Returns an iterator over the hits.
    pub fn iter(&self) -> impl Iterator<Item = &Hit> {
        self.hits.iter()
    }

    /// Total charge of all hits.
    pub fn total_charge(&self) -> f32 {
        self.hits.iter().map(|hit| hit.charge).sum()
    }

    /// View of the first hit, if any.
    pub fn view(&self) -> Option<View> {
        self.hits.first().map(|hit| hit.view)
    }
}

impl FromIterator<Hit> for Cluster {
    fn from_iter<I: IntoIterator<Item = Hit>>(iter: I) -> Self {
        Self {
            hits: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hit_distance() {
        let a = Hit::new(0, View::U, 0.0, 0.0, 1.0);
        let b = Hit::new(1, View::U, 3.0, 4.0, 1.0);
        assert_relative_eq!(a.distance_squared(&b), 25.0);
    }

    #[test]
    fn test_cluster_operations() {
        let mut cluster = Cluster::with_capacity(10);
        assert!(cluster.is_empty());
        assert_eq!(cluster.view(), None);

        cluster.push(Hit::new(0, View::W, 1.0, 1.0, 10.0));
        cluster.push(Hit::new(1, View::W, 1.5, 1.0, 15.0));
        cluster.push(Hit::new(2, View::W, 1.0, 1.5, 12.5));

        assert_eq!(cluster.len(), 3);
        assert_eq!(cluster.view(), Some(View::W));
        assert_relative_eq!(cluster.total_charge(), 37.5);
    }

    #[test]
    fn test_hit_charge_defaults() {
        let hit: Hit = serde_json::from_str(r#"{"id": 4, "view": "v", "x": 1.0, "z": 2.0}"#)
            .expect("valid hit");
        assert_eq!(hit.view, View::V);
        assert_relative_eq!(hit.charge, 0.0);
    }
}
