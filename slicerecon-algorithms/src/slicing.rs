//! Slicing tools.
//!
//! Both tools work from the configured hit lists only. In a wire-plane TPC
//! the drift coordinate is shared by every view, so hits of one interaction
//! line up in `x` across U, V and W.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slicerecon_core::{
    parse_params, ConfigError, EventStore, Hit, ListKey, Result, Slice, SliceList, SlicingTool,
    View, ViewMap,
};

/// Drift gap slicing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriftGapConfig {
    /// Largest drift distance between neighboring hits within a slice (cm).
    pub max_gap: f64,
    /// Slices with fewer hits over all views are discarded.
    pub min_hits: usize,
}

impl Default for DriftGapConfig {
    fn default() -> Self {
        Self {
            max_gap: 5.0,
            min_hits: 1,
        }
    }
}

impl DriftGapConfig {
    /// Sets the maximum drift gap.
    pub fn with_max_gap(mut self, max_gap: f64) -> Self {
        self.max_gap = max_gap;
        self
    }

    /// Sets the minimum slice size.
    pub fn with_min_hits(mut self, min_hits: usize) -> Self {
        self.min_hits = min_hits;
        self
    }
}

/// Splits an event wherever the drift coordinate has a gap wider than
/// `max_gap`, across all views at once.
#[derive(Debug, Clone, Default)]
pub struct DriftGapSlicing {
    config: DriftGapConfig,
}

impl DriftGapSlicing {
    /// Identifier used in settings.
    pub const NAME: &'static str = "DriftGapSlicing";

    /// Create with custom configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] if `max_gap` is negative or
    /// not finite.
    pub fn new(config: DriftGapConfig) -> std::result::Result<Self, ConfigError> {
        if !(config.max_gap.is_finite() && config.max_gap >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                algorithm: Self::NAME.to_string(),
                reason: format!("max_gap must be non-negative, got {}", config.max_gap),
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

    fn finish(&self, slice: Slice, slices: &mut SliceList) {
        if !slice.is_empty() && slice.len() >= self.config.min_hits {
            slices.push(slice);
        }
    }
}

impl SlicingTool for DriftGapSlicing {
    fn slice(
        &mut self,
        store: &EventStore,
        hit_lists: &ViewMap<ListKey>,
        _cluster_lists: &ViewMap<ListKey>,
    ) -> Result<SliceList> {
        let mut hits: Vec<(View, Hit)> = Vec::new();
        for (view, key) in hit_lists.iter() {
            hits.extend(store.hits(key)?.iter().map(|hit| (view, *hit)));
        }
        hits.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));

        let mut slices = SliceList::new();
        let mut current = Slice::default();
        let mut last_x: Option<f64> = None;

        for (view, hit) in hits {
            if last_x.is_some_and(|x| hit.x - x > self.config.max_gap) {
                self.finish(std::mem::take(&mut current), &mut slices);
            }
            current.hits[view].push(hit);
            last_x = Some(hit.x);
        }
        self.finish(current, &mut slices);

        debug!("{} made {} slices", Self::NAME, slices.len());
        Ok(slices)
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

/// Puts every hit of the event into one slice.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleSlice;

impl SingleSlice {
    /// Identifier used in settings.
    pub const NAME: &'static str = "SingleSlice";
}

impl SlicingTool for SingleSlice {
    fn slice(
        &mut self,
        store: &EventStore,
        hit_lists: &ViewMap<ListKey>,
        _cluster_lists: &ViewMap<ListKey>,
    ) -> Result<SliceList> {
        let mut slice = Slice::default();
        for (view, key) in hit_lists.iter() {
            slice.hits[view] = store.hits(key)?.to_vec();
        }

        if slice.is_empty() {
            return Ok(SliceList::new());
        }
        Ok(vec![slice])
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}
