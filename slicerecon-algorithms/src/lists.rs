//! List management algorithms.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slicerecon_core::{
    parse_params, Algorithm, ConfigError, EventStore, ListKey, OutputList, Result, ViewMap,
};

/// Erases every hit and cluster list in the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListDeletion;

impl ListDeletion {
    /// Identifier used in settings.
    pub const NAME: &'static str = "ListDeletion";
}

impl Algorithm for ListDeletion {
    fn run(&mut self, store: &mut EventStore) -> Result<()> {
        store.reset();
        Ok(())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

/// List moving configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListMovingConfig {
    /// Cluster list to move, per view.
    pub cluster_list_names: ViewMap<String>,
}

/// Moves the per-view cluster lists of a finished slice to the output bank.
///
/// Lists that do not exist, because their view produced no clusters, are
/// skipped. Every run claims a new output slice index.
#[derive(Debug, Clone)]
pub struct ListMoving {
    config: ListMovingConfig,
}

impl ListMoving {
    /// Identifier used in settings.
    pub const NAME: &'static str = "ListMoving";

    /// Create with custom configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] if a list name is empty.
    pub fn new(config: ListMovingConfig) -> std::result::Result<Self, ConfigError> {
        if config.cluster_list_names.iter().any(|(_, name)| name.is_empty()) {
            return Err(ConfigError::InvalidParameter {
                algorithm: Self::NAME.to_string(),
                reason: "cluster_list_names must name a list for every view".to_string(),
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
}

impl Algorithm for ListMoving {
    fn run(&mut self, store: &mut EventStore) -> Result<()> {
        let slice = store.next_output_slice();
        for (view, name) in self.config.cluster_list_names.iter() {
            let Some(clusters) = store.take_clusters(&ListKey::named(name)) else {
                continue;
            };
            debug!("moving {} clusters from {name} (slice {slice})", clusters.len());
            store.push_output(OutputList {
                slice,
                view,
                name: name.clone(),
                clusters,
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

/// Small cluster removal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmallClusterRemovalConfig {
    /// Clusters with fewer hits are removed.
    pub min_hits: usize,
}

impl Default for SmallClusterRemovalConfig {
    fn default() -> Self {
        Self { min_hits: 2 }
    }
}

/// Removes clusters below a size threshold from the current cluster list.
#[derive(Debug, Clone, Default)]
pub struct SmallClusterRemoval {
    config: SmallClusterRemovalConfig,
}

impl SmallClusterRemoval {
    /// Identifier used in settings.
    pub const NAME: &'static str = "SmallClusterRemoval";

    /// Create with custom configuration.
    pub fn new(config: SmallClusterRemovalConfig) -> Self {
        Self { config }
    }

    /// Create from a settings `params` object.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] for malformed parameters.
    pub fn from_params(params: &Value) -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(parse_params(Self::NAME, params)?))
    }
}

impl Algorithm for SmallClusterRemoval {
    fn run(&mut self, store: &mut EventStore) -> Result<()> {
        let min_hits = self.config.min_hits;
        let clusters = store.current_clusters_mut()?;
        let before = clusters.len();
        clusters.retain(|cluster| cluster.len() >= min_hits);
        debug!("removed {} small clusters", before - clusters.len());
        Ok(())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}
