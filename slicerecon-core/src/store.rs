//! Named list store for one reconstruction event.
//!
//! The store owns every hit and cluster list of an event. Lists are addressed
//! by [`ListKey`]; at most one hit list and one cluster list are "current" at a
//! time, and the algorithms invoked by the orchestrator operate on those.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::ClusteringAlgorithm;
use crate::error::{Error, ListKind, Result};
use crate::{Cluster, Hit, View};

/// Key of a list in the [`EventStore`].
///
/// Working keys are compared structurally, so a base name ending in a digit
/// can never collide with another base/counter pair that renders identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListKey {
    /// A configured list name.
    Named(String),
    /// A per-slice working list: base name plus slice counter.
    Working { base: String, counter: u32 },
    /// A list generated by a clustering run, pending save or drop.
    Temporary(u32),
}

impl ListKey {
    /// Key for a configured list name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Key for a per-slice working list.
    pub fn working(base: impl Into<String>, counter: u32) -> Self {
        Self::Working {
            base: base.into(),
            counter,
        }
    }

    /// Returns true for lists generated by clustering.
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Working { base, counter } => write!(f, "{base}{counter}"),
            Self::Temporary(id) => write!(f, "TemporaryClusters{id}"),
        }
    }
}

/// Cluster list moved out of the working area once a slice is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputList {
    /// Index of the slice the clusters were reconstructed in.
    pub slice: usize,
    /// View of the clusters.
    pub view: View,
    /// Name the list had in the working area.
    pub name: String,
    /// Moved clusters.
    pub clusters: Vec<Cluster>,
}

/// Counters describing what happened to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatistics {
    /// Hit lists saved.
    pub hit_lists_saved: usize,
    /// Cluster lists produced by clustering.
    pub cluster_lists_created: usize,
    /// Cluster lists saved under a name.
    pub cluster_lists_saved: usize,
    /// Current cluster lists dropped.
    pub cluster_lists_dropped: usize,
    /// Full resets.
    pub resets: usize,
}

/// Store of named hit and cluster lists for one event.
#[derive(Debug, Default)]
pub struct EventStore {
    hit_lists: HashMap<ListKey, Vec<Hit>>,
    cluster_lists: HashMap<ListKey, Vec<Cluster>>,
    current_hits: Option<ListKey>,
    current_clusters: Option<ListKey>,
    next_temporary: u32,
    output: Vec<OutputList>,
    output_slices: usize,
    stats: StoreStatistics,
}

impl EventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves `hits` under `key`.
    ///
    /// # Errors
    /// Returns [`Error::ListAlreadyExists`] if a hit list with that key exists.
    pub fn save_hits(&mut self, key: ListKey, hits: Vec<Hit>) -> Result<()> {
        if self.hit_lists.contains_key(&key) {
            return Err(Error::ListAlreadyExists {
                kind: ListKind::Hits,
                name: key.to_string(),
            });
        }
        debug!("saving {} hits under {key}", hits.len());
        self.hit_lists.insert(key, hits);
        self.stats.hit_lists_saved += 1;
        Ok(())
    }

    /// Makes the hit list under `key` current.
    ///
    /// # Errors
    /// Returns [`Error::ListNotFound`] if there is no such list.
    pub fn replace_current_hits(&mut self, key: &ListKey) -> Result<()> {
        if !self.hit_lists.contains_key(key) {
            return Err(not_found(ListKind::Hits, key));
        }
        self.current_hits = Some(key.clone());
        Ok(())
    }

    /// Returns the hit list under `key`.
    ///
    /// # Errors
    /// Returns [`Error::ListNotFound`] if there is no such list.
    pub fn hits(&self, key: &ListKey) -> Result<&[Hit]> {
        self.hit_lists
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| not_found(ListKind::Hits, key))
    }

    /// Returns the current hit list.
    ///
    /// # Errors
    /// Returns [`Error::NoCurrentList`] if no hit list is current.
    pub fn current_hits(&self) -> Result<&[Hit]> {
        let key = self
            .current_hits
            .as_ref()
            .ok_or(Error::NoCurrentList(ListKind::Hits))?;
        self.hits(key)
    }

    /// Key of the current hit list, if any.
    pub fn current_hit_list_key(&self) -> Option<&ListKey> {
        self.current_hits.as_ref()
    }

    /// Runs `algorithm` over the current hits.
    ///
    /// The resulting clusters are stored under a fresh temporary key, which
    /// becomes the current cluster list and is returned.
    ///
    /// # Errors
    /// Returns [`Error::NoCurrentList`] without a current hit list, or the
    /// clustering algorithm's own error.
    pub fn run_clustering(&mut self, algorithm: &mut dyn ClusteringAlgorithm) -> Result<ListKey> {
        let clusters = algorithm.cluster(self.current_hits()?)?;
        let key = ListKey::Temporary(self.next_temporary);
        self.next_temporary += 1;

        debug!(
            "{} produced {} clusters in {key}",
            algorithm.name(),
            clusters.len()
        );
        self.cluster_lists.insert(key.clone(), clusters);
        self.current_clusters = Some(key.clone());
        self.stats.cluster_lists_created += 1;
        Ok(key)
    }

    /// Moves the current cluster list's clusters into the list under `key`.
    ///
    /// Clusters are appended if that list already exists. Afterwards no
    /// cluster list is current.
    ///
    /// # Errors
    /// Returns [`Error::NoCurrentList`] if no cluster list is current.
    pub fn save_current_clusters(&mut self, key: ListKey) -> Result<()> {
        let current = self
            .current_clusters
            .take()
            .ok_or(Error::NoCurrentList(ListKind::Clusters))?;
        if current == key {
            return Ok(());
        }

        let clusters = self.cluster_lists.remove(&current).unwrap_or_default();
        debug!("saving {} clusters from {current} under {key}", clusters.len());
        self.cluster_lists.entry(key).or_default().extend(clusters);
        self.stats.cluster_lists_saved += 1;
        Ok(())
    }

    /// Makes the cluster list under `key` current.
    ///
    /// # Errors
    /// Returns [`Error::ListNotFound`] if there is no such list.
    pub fn replace_current_clusters(&mut self, key: &ListKey) -> Result<()> {
        if !self.cluster_lists.contains_key(key) {
            return Err(not_found(ListKind::Clusters, key));
        }
        self.current_clusters = Some(key.clone());
        Ok(())
    }

    /// Drops the current cluster list.
    ///
    /// Temporary lists are deleted; named lists stay stored but stop being current.
    ///
    /// # Errors
    /// Returns [`Error::NoCurrentList`] if no cluster list is current.
    pub fn drop_current_clusters(&mut self) -> Result<()> {
        let current = self
            .current_clusters
            .take()
            .ok_or(Error::NoCurrentList(ListKind::Clusters))?;
        if current.is_temporary() {
            self.cluster_lists.remove(&current);
        }
        debug!("dropped current cluster list {current}");
        self.stats.cluster_lists_dropped += 1;
        Ok(())
    }

    /// Returns the cluster list under `key`.
    ///
    /// # Errors
    /// Returns [`Error::ListNotFound`] if there is no such list.
    pub fn clusters(&self, key: &ListKey) -> Result<&[Cluster]> {
        self.cluster_lists
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| not_found(ListKind::Clusters, key))
    }

    /// Returns the current cluster list.
    ///
    /// # Errors
    /// Returns [`Error::NoCurrentList`] if no cluster list is current.
    pub fn current_clusters(&self) -> Result<&[Cluster]> {
        let key = self
            .current_clusters
            .as_ref()
            .ok_or(Error::NoCurrentList(ListKind::Clusters))?;
        self.clusters(key)
    }

    /// Returns the current cluster list mutably.
    ///
    /// # Errors
    /// Returns [`Error::NoCurrentList`] if no cluster list is current.
    pub fn current_clusters_mut(&mut self) -> Result<&mut Vec<Cluster>> {
        let key = self
            .current_clusters
            .as_ref()
            .ok_or(Error::NoCurrentList(ListKind::Clusters))?;
        self.cluster_lists
            .get_mut(key)
            .ok_or_else(|| not_found(ListKind::Clusters, key))
    }

    /// Key of the current cluster list, if any.
    pub fn current_cluster_list_key(&self) -> Option<&ListKey> {
        self.current_clusters.as_ref()
    }

    /// Removes the cluster list under `key` and returns its clusters.
    ///
    /// Clears the current cluster list if it was the removed one.
    pub fn take_clusters(&mut self, key: &ListKey) -> Option<Vec<Cluster>> {
        let clusters = self.cluster_lists.remove(key)?;
        if self.current_clusters.as_ref() == Some(key) {
            self.current_clusters = None;
        }
        Some(clusters)
    }

    /// Sorted keys of all stored hit lists.
    pub fn hit_list_keys(&self) -> Vec<&ListKey> {
        let mut keys: Vec<_> = self.hit_lists.keys().collect();
        keys.sort();
        keys
    }

    /// Sorted keys of all stored cluster lists.
    pub fn cluster_list_keys(&self) -> Vec<&ListKey> {
        let mut keys: Vec<_> = self.cluster_lists.keys().collect();
        keys.sort();
        keys
    }

    /// Erases every hit and cluster list and the current-list context.
    ///
    /// The output bank and its slice numbering are kept.
    pub fn reset(&mut self) {
        debug!(
            "resetting store: {} hit lists, {} cluster lists",
            self.hit_lists.len(),
            self.cluster_lists.len()
        );
        self.hit_lists.clear();
        self.cluster_lists.clear();
        self.current_hits = None;
        self.current_clusters = None;
        self.stats.resets += 1;
    }

    /// Reserves the next output slice index, starting at zero.
    pub fn next_output_slice(&mut self) -> usize {
        let slice = self.output_slices;
        self.output_slices += 1;
        slice
    }

    /// Appends a list to the output bank.
    pub fn push_output(&mut self, list: OutputList) {
        self.output.push(list);
    }

    /// Lists moved to the output bank, in the order they were moved.
    pub fn output(&self) -> &[OutputList] {
        &self.output
    }

    /// Store counters.
    pub fn statistics(&self) -> StoreStatistics {
        self.stats
    }
}

fn not_found(kind: ListKind, key: &ListKey) -> Error {
    Error::ListNotFound {
        kind,
        name: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Singles;

    impl ClusteringAlgorithm for Singles {
        fn cluster(&mut self, hits: &[Hit]) -> Result<Vec<Cluster>> {
            Ok(hits.iter().map(|hit| Cluster::from_iter([*hit])).collect())
        }

        fn name(&self) -> &str {
            "Singles"
        }
    }

    fn hits(n: u32) -> Vec<Hit> {
        (0..n)
            .map(|i| Hit::new(i, View::U, f64::from(i), 0.0, 1.0))
            .collect()
    }

    #[test]
    fn test_working_keys_are_structural() {
        let a = ListKey::working("Hits1", 0);
        let b = ListKey::working("Hits", 10);
        assert_eq!(a.to_string(), b.to_string());
        assert_ne!(a, b);

        let mut store = EventStore::new();
        store.save_hits(a, hits(1)).unwrap();
        store.save_hits(b, hits(2)).unwrap();
        assert_eq!(store.hit_list_keys().len(), 2);
    }

    #[test]
    fn test_save_hits_twice_fails() {
        let mut store = EventStore::new();
        store.save_hits(ListKey::named("HitsU"), hits(2)).unwrap();
        let err = store
            .save_hits(ListKey::named("HitsU"), hits(2))
            .unwrap_err();
        assert!(matches!(err, Error::ListAlreadyExists { .. }));
    }

    #[test]
    fn test_clustering_save_and_replace() {
        let mut store = EventStore::new();
        let key = ListKey::named("HitsU");
        store.save_hits(key.clone(), hits(3)).unwrap();

        assert_eq!(
            store.run_clustering(&mut Singles).unwrap_err(),
            Error::NoCurrentList(ListKind::Hits)
        );

        store.replace_current_hits(&key).unwrap();
        let temp = store.run_clustering(&mut Singles).unwrap();
        assert!(temp.is_temporary());
        assert_eq!(store.current_clusters().unwrap().len(), 3);

        let named = ListKey::named("ClustersU");
        store.save_current_clusters(named.clone()).unwrap();
        assert!(store.current_cluster_list_key().is_none());
        assert!(store.clusters(&temp).is_err());

        store.replace_current_clusters(&named).unwrap();
        assert_eq!(store.current_clusters().unwrap().len(), 3);
        assert_eq!(store.statistics().cluster_lists_saved, 1);
    }

    #[test]
    fn test_drop_current_clusters() {
        let mut store = EventStore::new();
        let key = ListKey::named("HitsU");
        store.save_hits(key.clone(), Vec::new()).unwrap();
        store.replace_current_hits(&key).unwrap();

        let temp = store.run_clustering(&mut Singles).unwrap();
        store.drop_current_clusters().unwrap();
        assert!(store.clusters(&temp).is_err());
        assert_eq!(
            store.drop_current_clusters().unwrap_err(),
            Error::NoCurrentList(ListKind::Clusters)
        );
        assert_eq!(store.statistics().cluster_lists_dropped, 1);
    }

    #[test]
    fn test_reset_keeps_output() {
        let mut store = EventStore::new();
        let key = ListKey::named("HitsU");
        store.save_hits(key.clone(), hits(2)).unwrap();
        store.replace_current_hits(&key).unwrap();
        store.push_output(OutputList {
            slice: 0,
            view: View::U,
            name: "ClustersU".to_string(),
            clusters: Vec::new(),
        });

        store.reset();

        assert!(store.hit_list_keys().is_empty());
        assert!(store.current_hit_list_key().is_none());
        assert_eq!(store.output().len(), 1);
        assert_eq!(store.statistics().resets, 1);
    }
}
