//! Two-pass neutrino reconstruction driver.
//!
//! ```text
//! PASS 1: per view U, V, W  -> clustering + 2D algorithms
//!         3D algorithms, 3D hit algorithms
//!         slicing tool       -> slice list
//!         list deletion      (always, exactly once)
//! PASS 2: per slice
//!           per view U, V, W -> save slice hits under a working key,
//!                               clustering + 2D algorithms
//!           vertex, 3D, mop-up, 3D hit, neutrino algorithms, list moving
//! ```
//!
//! The first error anywhere ends the run and is returned as-is.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::{Algorithm, ClusteringAlgorithm, SlicingTool};
use crate::error::{ConfigError, Result};
use crate::settings::{require, AlgorithmRegistry, AlgorithmSpec, ParentSettings};
use crate::store::{EventStore, ListKey};
use crate::{View, ViewMap};

/// Ordered algorithms run back to back.
pub struct AlgorithmSequence {
    label: &'static str,
    algorithms: Vec<Box<dyn Algorithm>>,
}

impl AlgorithmSequence {
    /// Creates a sequence.
    pub fn new(label: &'static str, algorithms: Vec<Box<dyn Algorithm>>) -> Self {
        Self { label, algorithms }
    }

    /// Label used in log output.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Number of algorithms.
    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    /// Returns true if the sequence has no algorithms.
    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    /// Runs every algorithm in order, stopping at the first error.
    ///
    /// # Errors
    /// Returns the first algorithm error.
    pub fn run(&mut self, store: &mut EventStore) -> Result<()> {
        for algorithm in &mut self.algorithms {
            debug!("[{}] running {}", self.label, algorithm.name());
            algorithm.run(store)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for AlgorithmSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.algorithms.iter().map(|a| a.name()).collect();
        f.debug_struct("AlgorithmSequence")
            .field("label", &self.label)
            .field("algorithms", &names)
            .finish()
    }
}

/// Counters for one call to [`NeutrinoParent::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// View passes whose clustering produced clusters.
    pub views_clustered: usize,
    /// View passes skipped because clustering produced nothing.
    pub views_skipped: usize,
    /// Slices returned by the slicing tool.
    pub slices: usize,
    /// Working hit lists created during the slice pass.
    pub working_lists: u32,
}

/// Orchestrator of the two-pass reconstruction.
///
/// Only obtainable through [`NeutrinoParent::from_settings`], so a value of
/// this type is always fully bound.
pub struct NeutrinoParent {
    hit_list_names: ViewMap<String>,
    cluster_list_names: ViewMap<String>,
    clustering: Box<dyn ClusteringAlgorithm>,
    slicing_tool: Box<dyn SlicingTool>,
    list_deletion: Box<dyn Algorithm>,
    list_moving: Box<dyn Algorithm>,
    two_d: AlgorithmSequence,
    three_d: AlgorithmSequence,
    three_d_hit: AlgorithmSequence,
    vertex: AlgorithmSequence,
    mop_up: AlgorithmSequence,
    neutrino: AlgorithmSequence,
    last_run: RunStatistics,
}

impl NeutrinoParent {
    /// Binds `settings`, instantiating every algorithm through `registry`.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingSetting`] for absent or empty settings,
    /// [`ConfigError::NotASlicingTool`] if the slicing identifier names
    /// something other than a slicing tool, and any registry error.
    pub fn from_settings(
        settings: &ParentSettings,
        registry: &AlgorithmRegistry,
    ) -> std::result::Result<Self, ConfigError> {
        let hit_list_names = list_names(&settings.hit_list_names, "hit_list_names")?;
        let cluster_list_names = list_names(&settings.cluster_list_names, "cluster_list_names")?;

        let clustering = registry.create_clustering(require(&settings.clustering, "clustering")?)?;
        let slicing_tool = registry.create_slicing_tool(require(&settings.slicing, "slicing")?)?;
        let list_deletion =
            registry.create_algorithm(require(&settings.list_deletion, "list_deletion")?)?;
        let list_moving =
            registry.create_algorithm(require(&settings.list_moving, "list_moving")?)?;

        let sequence = |label: &'static str,
                        specs: &Option<Vec<AlgorithmSpec>>|
         -> std::result::Result<AlgorithmSequence, ConfigError> {
            let specs = require(specs, label)?;
            Ok(AlgorithmSequence::new(label, registry.create_algorithms(specs)?))
        };

        let parent = Self {
            hit_list_names,
            cluster_list_names,
            clustering,
            slicing_tool,
            list_deletion,
            list_moving,
            two_d: sequence("two_d_algorithms", &settings.two_d_algorithms)?,
            three_d: sequence("three_d_algorithms", &settings.three_d_algorithms)?,
            three_d_hit: sequence("three_d_hit_algorithms", &settings.three_d_hit_algorithms)?,
            vertex: sequence("vertex_algorithms", &settings.vertex_algorithms)?,
            mop_up: sequence("mop_up_algorithms", &settings.mop_up_algorithms)?,
            neutrino: sequence("neutrino_algorithms", &settings.neutrino_algorithms)?,
            last_run: RunStatistics::default(),
        };
        debug!("bound neutrino parent: {parent:?}");
        Ok(parent)
    }

    /// Configured input hit list names.
    pub fn hit_list_names(&self) -> &ViewMap<String> {
        &self.hit_list_names
    }

    /// Configured output cluster list names.
    pub fn cluster_list_names(&self) -> &ViewMap<String> {
        &self.cluster_list_names
    }

    /// Counters of the most recent run, complete or not.
    pub fn last_run(&self) -> RunStatistics {
        self.last_run
    }

    /// Reconstructs one event held in `store`.
    ///
    /// The configured hit lists must already be saved in the store.
    ///
    /// # Errors
    /// Returns the first error raised by any store operation, algorithm or
    /// tool; nothing after it runs.
    pub fn run(&mut self, store: &mut EventStore) -> Result<()> {
        self.last_run = RunStatistics::default();

        for view in View::ALL {
            let hit_list = ListKey::named(&self.hit_list_names[view]);
            self.reconstruct_view(store, view, &hit_list)?;
        }

        self.three_d.run(store)?;
        self.three_d_hit.run(store)?;

        let hit_lists = self.hit_list_names.map(|_, name| ListKey::named(name));
        let cluster_lists = self.cluster_list_names.map(|_, name| ListKey::named(name));
        let slices = self.slicing_tool.slice(store, &hit_lists, &cluster_lists)?;
        self.last_run.slices = slices.len();
        debug!("{} found {} slices", self.slicing_tool.name(), slices.len());

        self.list_deletion.run(store)?;

        let mut slice_counter: u32 = 0;
        for (index, slice) in slices.into_iter().enumerate() {
            debug!("reconstructing slice {index} ({} hits)", slice.len());
            let mut hits = slice.hits;

            for view in View::ALL {
                let working = ListKey::working(&self.hit_list_names[view], slice_counter);
                slice_counter += 1;
                self.last_run.working_lists = slice_counter;

                store.save_hits(working.clone(), std::mem::take(&mut hits[view]))?;
                self.reconstruct_view(store, view, &working)?;
            }

            for sequence in [
                &mut self.vertex,
                &mut self.three_d,
                &mut self.mop_up,
                &mut self.three_d_hit,
                &mut self.neutrino,
            ] {
                sequence.run(store)?;
            }
            self.list_moving.run(store)?;
        }

        info!(
            "reconstructed event: {} slices, {} views clustered, {} views skipped",
            self.last_run.slices, self.last_run.views_clustered, self.last_run.views_skipped
        );
        Ok(())
    }

    /// Clusters the hits under `hit_list` and runs the 2D algorithms on them.
    ///
    /// An empty clustering result drops the cluster list and skips the view.
    fn reconstruct_view(&mut self, store: &mut EventStore, view: View, hit_list: &ListKey) -> Result<()> {
        store.replace_current_hits(hit_list)?;
        store.run_clustering(&mut *self.clustering)?;

        if store.current_clusters()?.is_empty() {
            warn!("view {view}: no clusters from {hit_list}, skipping");
            store.drop_current_clusters()?;
            self.last_run.views_skipped += 1;
            return Ok(());
        }

        let cluster_list = ListKey::named(&self.cluster_list_names[view]);
        store.save_current_clusters(cluster_list.clone())?;
        store.replace_current_clusters(&cluster_list)?;
        self.last_run.views_clustered += 1;

        self.two_d.run(store)
    }
}

impl std::fmt::Debug for NeutrinoParent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeutrinoParent")
            .field("hit_list_names", &self.hit_list_names)
            .field("cluster_list_names", &self.cluster_list_names)
            .field("clustering", &self.clustering.name())
            .field("slicing_tool", &self.slicing_tool.name())
            .field("list_deletion", &self.list_deletion.name())
            .field("list_moving", &self.list_moving.name())
            .field("two_d", &self.two_d)
            .field("three_d", &self.three_d)
            .field("three_d_hit", &self.three_d_hit)
            .field("vertex", &self.vertex)
            .field("mop_up", &self.mop_up)
            .field("neutrino", &self.neutrino)
            .finish_non_exhaustive()
    }
}

fn list_names(
    names: &Option<ViewMap<String>>,
    setting: &'static str,
) -> std::result::Result<ViewMap<String>, ConfigError> {
    let names = require(names, setting)?;
    if names.iter().any(|(_, name)| name.is_empty()) {
        return Err(ConfigError::MissingSetting(setting));
    }
    Ok(names.clone())
}
