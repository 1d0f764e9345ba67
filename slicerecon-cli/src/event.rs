//! Event files and per-event summaries.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slicerecon_core::{
    EventStore, Hit, ListKey, RunStatistics, StoreStatistics, View, ViewMap,
};

use crate::CliError;

/// Input event: the hits of each view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventFile {
    /// Hits per view. Each hit's `view` must match the view it is listed under.
    pub hits: ViewMap<Vec<Hit>>,
}

impl EventFile {
    /// Reads an event from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| CliError::Event {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Saves the hits into a fresh store under the given list names.
    pub fn into_store(self, hit_list_names: &ViewMap<String>) -> slicerecon_core::Result<EventStore> {
        let mut store = EventStore::new();
        let ViewMap { u, v, w } = self.hits;
        for (view, hits) in [(View::U, u), (View::V, v), (View::W, w)] {
            if let Some(hit) = hits.iter().find(|hit| hit.view != view) {
                return Err(slicerecon_core::Error::InvalidParameter(format!(
                    "hit {} is a {} hit listed under view {}",
                    hit.id, hit.view, view
                )));
            }
            store.save_hits(ListKey::named(&hit_list_names[view]), hits)?;
        }
        Ok(store)
    }
}

/// One moved output list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSummary {
    /// Slice index.
    pub slice: usize,
    /// View of the list.
    pub view: View,
    /// Working list name.
    pub name: String,
    /// Number of clusters.
    pub clusters: usize,
    /// Hits across all clusters.
    pub hits: usize,
}

/// What happened to one event.
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    /// Event file.
    pub file: PathBuf,
    /// Orchestrator counters.
    pub run: RunStatistics,
    /// Store counters.
    pub store: StoreStatistics,
    /// Moved output lists, in order.
    pub output: Vec<OutputSummary>,
}

impl EventSummary {
    /// Summarizes the run of `file` and the output bank of `store`.
    pub fn new(file: &Path, run: RunStatistics, store: &EventStore) -> Self {
        let output = store
            .output()
            .iter()
            .map(|list| OutputSummary {
                slice: list.slice,
                view: list.view,
                name: list.name.clone(),
                clusters: list.clusters.len(),
                hits: list.clusters.iter().map(|cluster| cluster.len()).sum(),
            })
            .collect();
        Self {
            file: file.to_path_buf(),
            run,
            store: store.statistics(),
            output,
        }
    }
}

impl fmt::Display for EventSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Event: {}", self.file.display())?;
        writeln!(
            f,
            "  Slices: {}  (views clustered: {}, skipped: {})",
            self.run.slices, self.run.views_clustered, self.run.views_skipped
        )?;
        for list in &self.output {
            writeln!(
                f,
                "  slice {:>3}  {}  {:<16} {:>5} clusters {:>7} hits",
                list.slice, list.view, list.name, list.clusters, list.hits
            )?;
        }
        Ok(())
    }
}
