//! slicerecon-core: Two-pass, slice-based reconstruction orchestration.
//!
//! This crate provides the named list store, the traits implemented by
//! daughter algorithms, settings binding, and the [`NeutrinoParent`]
//! orchestrator that sequences them.
//!

pub mod algorithm;
pub mod error;
pub mod hit;
pub mod parent;
pub mod settings;
pub mod store;
pub mod view;

pub use algorithm::{Algorithm, ClusteringAlgorithm, Slice, SliceList, SlicingTool};
pub use error::{ConfigError, Error, ListKind, Result};
pub use hit::{Cluster, Hit};
pub use parent::{AlgorithmSequence, NeutrinoParent, RunStatistics};
pub use settings::{parse_params, AlgorithmRegistry, AlgorithmSpec, ParentSettings};
pub use store::{EventStore, ListKey, OutputList, StoreStatistics};
pub use view::{View, ViewMap};
