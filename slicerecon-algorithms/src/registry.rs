//! Registration of the built-in algorithms.

use slicerecon_core::AlgorithmRegistry;

use crate::{
    DriftGapSlicing, ListDeletion, ListMoving, ListSummary, ProximityClustering, SingleSlice,
    SmallClusterRemoval,
};

/// Adds every built-in algorithm and tool to `registry`.
pub fn register_builtins(registry: &mut AlgorithmRegistry) -> &mut AlgorithmRegistry {
    registry
        .register_clustering(ProximityClustering::NAME, |params| {
            Ok(Box::new(ProximityClustering::from_params(params)?))
        })
        .register_slicing_tool(DriftGapSlicing::NAME, |params| {
            Ok(Box::new(DriftGapSlicing::from_params(params)?))
        })
        .register_slicing_tool(SingleSlice::NAME, |_| Ok(Box::new(SingleSlice)))
        .register_algorithm(ListDeletion::NAME, |_| Ok(Box::new(ListDeletion)))
        .register_algorithm(ListMoving::NAME, |params| {
            Ok(Box::new(ListMoving::from_params(params)?))
        })
        .register_algorithm(SmallClusterRemoval::NAME, |params| {
            Ok(Box::new(SmallClusterRemoval::from_params(params)?))
        })
        .register_algorithm(ListSummary::NAME, |params| {
            Ok(Box::new(ListSummary::from_params(params)?))
        })
}

/// A registry holding only the built-in algorithms.
pub fn builtin_registry() -> AlgorithmRegistry {
    let mut registry = AlgorithmRegistry::new();
    register_builtins(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicerecon_core::{AlgorithmSpec, ConfigError};

    #[test]
    fn test_builtin_names() {
        let registry = builtin_registry();
        assert_eq!(
            registry.slicing_tool_names().collect::<Vec<_>>(),
            vec!["DriftGapSlicing", "SingleSlice"]
        );
        assert_eq!(
            registry.clustering_names().collect::<Vec<_>>(),
            vec!["ProximityClustering"]
        );
        assert_eq!(registry.algorithm_names().count(), 4);
    }

    #[test]
    fn test_list_deletion_is_not_a_slicing_tool() {
        let registry = builtin_registry();
        for name in ["ListDeletion", "ProximityClustering"] {
            assert!(
                matches!(
                    registry.create_slicing_tool(&AlgorithmSpec::new(name)),
                    Err(ConfigError::NotASlicingTool(ref kind)) if kind == name
                ),
                "{name} bound as a slicing tool"
            );
        }
    }

    #[test]
    fn test_params_are_forwarded() {
        let registry = builtin_registry();
        let spec = AlgorithmSpec::new("DriftGapSlicing")
            .with_params(serde_json::json!({"max_gap": -2.0}));
        assert!(matches!(
            registry.create_slicing_tool(&spec),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }
}
