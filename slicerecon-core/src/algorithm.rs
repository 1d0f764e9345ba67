//! Traits for the daughter algorithms driven by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::store::{EventStore, ListKey};
use crate::{Cluster, Hit, Result, ViewMap};

/// A daughter algorithm, run against the store's current lists.
pub trait Algorithm: Send {
    /// Runs the algorithm once.
    ///
    /// # Errors
    /// Any error aborts the whole reconstruction run.
    fn run(&mut self, store: &mut EventStore) -> Result<()>;

    /// Returns the name of the algorithm.
    fn name(&self) -> &str;
}

/// Trait for clustering algorithms.
///
/// Groups the hits of one view into clusters. An empty result is valid.
pub trait ClusteringAlgorithm: Send {
    /// Clusters the given hits.
    ///
    /// # Errors
    /// Returns an error if clustering cannot be performed.
    fn cluster(&mut self, hits: &[Hit]) -> Result<Vec<Cluster>>;

    /// Returns the name of the algorithm.
    fn name(&self) -> &str;
}

/// The hits of one candidate interaction, per view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    /// Hits assigned to the slice.
    pub hits: ViewMap<Vec<Hit>>,
}

impl Slice {
    /// Total number of hits over all views.
    pub fn len(&self) -> usize {
        self.hits.iter().map(|(_, hits)| hits.len()).sum()
    }

    /// Returns true if no view has any hit.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Slices of one event, in discovery order.
pub type SliceList = Vec<Slice>;

/// Trait for tools partitioning an event into slices.
pub trait SlicingTool: Send {
    /// Partitions the event.
    ///
    /// `hit_lists` and `cluster_lists` hold the configured list keys per view.
    /// A cluster list may be absent when its view produced no clusters.
    ///
    /// # Errors
    /// Any error aborts the whole reconstruction run.
    fn slice(
        &mut self,
        store: &EventStore,
        hit_lists: &ViewMap<ListKey>,
        cluster_lists: &ViewMap<ListKey>,
    ) -> Result<SliceList>;

    /// Returns the name of the tool.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::View;

    #[test]
    fn test_slice_len() {
        let mut slice = Slice::default();
        assert!(slice.is_empty());

        slice.hits.v.push(Hit::new(0, View::V, 1.0, 1.0, 1.0));
        slice.hits.w.push(Hit::new(1, View::W, 1.0, 2.0, 1.0));
        assert_eq!(slice.len(), 2);
    }
}
