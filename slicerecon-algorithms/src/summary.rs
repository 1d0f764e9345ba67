//! Logging of the store's current lists.

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slicerecon_core::{parse_params, Algorithm, ConfigError, EventStore, Result};

/// List summary configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListSummaryConfig {
    /// Prefix for the log line.
    pub label: Option<String>,
}

/// Logs the current hit and cluster lists and their sizes. Never fails.
#[derive(Debug, Clone, Default)]
pub struct ListSummary {
    config: ListSummaryConfig,
}

impl ListSummary {
    /// Identifier used in settings.
    pub const NAME: &'static str = "ListSummary";

    /// Create with custom configuration.
    pub fn new(config: ListSummaryConfig) -> Self {
        Self { config }
    }

    /// Create from a settings `params` object.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] for malformed parameters.
    pub fn from_params(params: &Value) -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(parse_params(Self::NAME, params)?))
    }

    /// Summary line for the store's current state.
    pub fn describe(&self, store: &EventStore) -> String {
        let hits = match (store.current_hit_list_key(), store.current_hits()) {
            (Some(key), Ok(hits)) => format!("{key} ({} hits)", hits.len()),
            _ => "none".to_string(),
        };
        let clusters = match (store.current_cluster_list_key(), store.current_clusters()) {
            (Some(key), Ok(clusters)) => format!("{key} ({} clusters)", clusters.len()),
            _ => "none".to_string(),
        };
        let label = self.config.label.as_deref().unwrap_or(Self::NAME);
        format!("{label}: current hits {hits}, current clusters {clusters}")
    }
}

impl Algorithm for ListSummary {
    fn run(&mut self, store: &mut EventStore) -> Result<()> {
        info!("{}", self.describe(store));
        Ok(())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicerecon_core::{Hit, ListKey, View};

    #[test]
    fn test_describe() {
        let mut store = EventStore::new();
        let summary = ListSummary::new(ListSummaryConfig {
            label: Some("after 2D".to_string()),
        });
        assert_eq!(
            summary.describe(&store),
            "after 2D: current hits none, current clusters none"
        );

        let key = ListKey::working("HitsU", 4);
        store
            .save_hits(key.clone(), vec![Hit::new(0, View::U, 0.0, 0.0, 1.0)])
            .unwrap();
        store.replace_current_hits(&key).unwrap();
        assert_eq!(
            summary.describe(&store),
            "after 2D: current hits HitsU4 (1 hits), current clusters none"
        );
    }
}
