//! Error types for slicerecon-core.

use thiserror::Error;

/// Result type alias for slicerecon operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of list held by the event store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// A list of hits.
    Hits,
    /// A list of clusters.
    Clusters,
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hits => f.write_str("hit"),
            Self::Clusters => f.write_str("cluster"),
        }
    }
}

/// Run-time error types.
///
/// Every store operation and algorithm invocation reports failure with one of
/// these. The orchestrator never wraps them: the first one raised is the one
/// the caller sees.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// No list of the given kind is stored under the given name.
    #[error("{kind} list not found: {name}")]
    ListNotFound { kind: ListKind, name: String },

    /// An operation needed a current list but none is set.
    #[error("no current {0} list")]
    NoCurrentList(ListKind),

    /// Saving hits under a name that is already taken.
    #[error("{kind} list already exists: {name}")]
    ListAlreadyExists { kind: ListKind, name: String },

    /// A daughter algorithm reported failure.
    #[error("algorithm {algorithm} failed: {reason}")]
    AlgorithmFailed { algorithm: String, reason: String },

    /// Invalid parameter passed to an operation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    /// Convenience constructor for algorithm failures.
    pub fn algorithm_failed(algorithm: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AlgorithmFailed {
            algorithm: algorithm.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration error types, raised while binding settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings could not be parsed, or a required setting is missing.
    #[error("malformed settings: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A required setting is present but empty.
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    /// The identifier is not registered at all.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The identifier is registered, but not as a slicing tool.
    #[error("{0} is not a slicing tool")]
    NotASlicingTool(String),

    /// An algorithm rejected its parameters.
    #[error("invalid parameter for {algorithm}: {reason}")]
    InvalidParameter { algorithm: String, reason: String },

    /// Settings file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
