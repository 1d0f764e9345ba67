//! slicerecon-algorithms: Built-in daughter algorithms and tools.
//!
//! This crate provides:
//! - **ProximityClustering** - union-find clustering within a radius
//! - **DriftGapSlicing** / **SingleSlice** - slicing tools
//! - **ListDeletion** / **ListMoving** - list bookkeeping between passes
//! - **SmallClusterRemoval** / **ListSummary** - simple 2D helpers
//!
#![warn(missing_docs)]

mod lists;
mod proximity;
mod registry;
mod slicing;
pub mod spatial;
mod summary;

pub use lists::{
    ListDeletion, ListMoving, ListMovingConfig, SmallClusterRemoval, SmallClusterRemovalConfig,
};
pub use proximity::{ProximityClustering, ProximityConfig};
pub use registry::{builtin_registry, register_builtins};
pub use slicing::{DriftGapConfig, DriftGapSlicing, SingleSlice};
pub use spatial::SpatialGrid;
pub use summary::{ListSummary, ListSummaryConfig};
