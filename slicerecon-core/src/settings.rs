//! Settings and the algorithm registry used to bind them.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::algorithm::{Algorithm, ClusteringAlgorithm, SlicingTool};
use crate::error::ConfigError;
use crate::ViewMap;

/// Reference to a registered algorithm, with its parameters.
///
/// Deserializes from either a bare identifier (`"ListSummary"`) or an object
/// (`{"type": "ProximityClustering", "params": {"radius": 2.0}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SpecRepr")]
pub struct AlgorithmSpec {
    /// Registered identifier.
    #[serde(rename = "type")]
    pub kind: String,
    /// Algorithm-specific parameters; `null` selects the defaults.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

impl AlgorithmSpec {
    /// Spec with default parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Value::Null,
        }
    }

    /// Sets the parameters.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FullSpec {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    params: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpecRepr {
    Name(String),
    Full(FullSpec),
}

impl From<SpecRepr> for AlgorithmSpec {
    fn from(repr: SpecRepr) -> Self {
        match repr {
            SpecRepr::Name(kind) => Self::new(kind),
            SpecRepr::Full(FullSpec { kind, params }) => Self { kind, params },
        }
    }
}

/// Unbound settings of the neutrino parent.
///
/// Every field is required; `Option` only lets a missing entry be reported by
/// name rather than as a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParentSettings {
    /// Input hit list name per view.
    pub hit_list_names: Option<ViewMap<String>>,
    /// Output cluster list name per view.
    pub cluster_list_names: Option<ViewMap<String>>,
    /// Clustering algorithm run for every view.
    pub clustering: Option<AlgorithmSpec>,
    /// Slicing tool.
    pub slicing: Option<AlgorithmSpec>,
    /// Algorithm erasing every list between the two passes.
    pub list_deletion: Option<AlgorithmSpec>,
    /// Algorithm run last for every slice.
    pub list_moving: Option<AlgorithmSpec>,
    /// Per-view algorithms.
    pub two_d_algorithms: Option<Vec<AlgorithmSpec>>,
    /// 3D algorithms.
    pub three_d_algorithms: Option<Vec<AlgorithmSpec>>,
    /// 3D hit creation algorithms.
    pub three_d_hit_algorithms: Option<Vec<AlgorithmSpec>>,
    /// Vertex algorithms.
    pub vertex_algorithms: Option<Vec<AlgorithmSpec>>,
    /// Mop-up algorithms.
    pub mop_up_algorithms: Option<Vec<AlgorithmSpec>>,
    /// Neutrino building algorithms.
    pub neutrino_algorithms: Option<Vec<AlgorithmSpec>>,
}

impl ParentSettings {
    /// Parses settings from JSON text.
    ///
    /// # Errors
    /// Returns [`ConfigError::Malformed`] on invalid JSON or unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads settings from a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Malformed`] if it cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Returns a required setting or names the missing one.
pub(crate) fn require<'a, T>(
    value: &'a Option<T>,
    name: &'static str,
) -> Result<&'a T, ConfigError> {
    value.as_ref().ok_or(ConfigError::MissingSetting(name))
}

/// Parses algorithm parameters, falling back to defaults for `null`.
///
/// # Errors
/// Returns [`ConfigError::InvalidParameter`] if `params` does not match `P`.
pub fn parse_params<P>(algorithm: &str, params: &Value) -> Result<P, ConfigError>
where
    P: DeserializeOwned + Default,
{
    if params.is_null() {
        return Ok(P::default());
    }
    serde_json::from_value(params.clone()).map_err(|err| ConfigError::InvalidParameter {
        algorithm: algorithm.to_string(),
        reason: err.to_string(),
    })
}

type Factory<T> = Box<dyn Fn(&Value) -> Result<T, ConfigError> + Send + Sync>;

/// Identifier to factory tables, one per capability.
///
/// Looking up a slicing tool only consults the slicing table, so an identifier
/// registered as a plain algorithm can never be bound as the slicing tool.
#[derive(Default)]
pub struct AlgorithmRegistry {
    algorithms: BTreeMap<String, Factory<Box<dyn Algorithm>>>,
    clustering: BTreeMap<String, Factory<Box<dyn ClusteringAlgorithm>>>,
    slicing_tools: BTreeMap<String, Factory<Box<dyn SlicingTool>>>,
}

impl AlgorithmRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a daughter algorithm factory.
    pub fn register_algorithm<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<Box<dyn Algorithm>, ConfigError> + Send + Sync + 'static,
    {
        self.algorithms.insert(name.into(), Box::new(factory));
        self
    }

    /// Registers a clustering algorithm factory.
    pub fn register_clustering<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<Box<dyn ClusteringAlgorithm>, ConfigError> + Send + Sync + 'static,
    {
        self.clustering.insert(name.into(), Box::new(factory));
        self
    }

    /// Registers a slicing tool factory.
    pub fn register_slicing_tool<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<Box<dyn SlicingTool>, ConfigError> + Send + Sync + 'static,
    {
        self.slicing_tools.insert(name.into(), Box::new(factory));
        self
    }

    /// Instantiates a daughter algorithm.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownAlgorithm`] for unregistered identifiers,
    /// or the factory's error.
    pub fn create_algorithm(&self, spec: &AlgorithmSpec) -> Result<Box<dyn Algorithm>, ConfigError> {
        let factory = self
            .algorithms
            .get(&spec.kind)
            .ok_or_else(|| ConfigError::UnknownAlgorithm(spec.kind.clone()))?;
        factory(&spec.params)
    }

    /// Instantiates every algorithm of a list, in order.
    ///
    /// # Errors
    /// Returns the first error of [`Self::create_algorithm`].
    pub fn create_algorithms(
        &self,
        specs: &[AlgorithmSpec],
    ) -> Result<Vec<Box<dyn Algorithm>>, ConfigError> {
        specs.iter().map(|spec| self.create_algorithm(spec)).collect()
    }

    /// Instantiates a clustering algorithm.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownAlgorithm`] for unregistered identifiers,
    /// or the factory's error.
    pub fn create_clustering(
        &self,
        spec: &AlgorithmSpec,
    ) -> Result<Box<dyn ClusteringAlgorithm>, ConfigError> {
        let factory = self
            .clustering
            .get(&spec.kind)
            .ok_or_else(|| ConfigError::UnknownAlgorithm(spec.kind.clone()))?;
        factory(&spec.params)
    }

    /// Instantiates a slicing tool.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotASlicingTool`] if the identifier is
    /// registered under another capability, [`ConfigError::UnknownAlgorithm`]
    /// if it is not registered at all, or the factory's error.
    pub fn create_slicing_tool(
        &self,
        spec: &AlgorithmSpec,
    ) -> Result<Box<dyn SlicingTool>, ConfigError> {
        match self.slicing_tools.get(&spec.kind) {
            Some(factory) => factory(&spec.params),
            None if self.algorithms.contains_key(&spec.kind)
                || self.clustering.contains_key(&spec.kind) =>
            {
                Err(ConfigError::NotASlicingTool(spec.kind.clone()))
            }
            None => Err(ConfigError::UnknownAlgorithm(spec.kind.clone())),
        }
    }

    /// Registered daughter algorithm identifiers, sorted.
    pub fn algorithm_names(&self) -> impl Iterator<Item = &str> {
        self.algorithms.keys().map(String::as_str)
    }

    /// Registered clustering identifiers, sorted.
    pub fn clustering_names(&self) -> impl Iterator<Item = &str> {
        self.clustering.keys().map(String::as_str)
    }

    /// Registered slicing tool identifiers, sorted.
    pub fn slicing_tool_names(&self) -> impl Iterator<Item = &str> {
        self.slicing_tools.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.algorithms.keys().collect::<Vec<_>>())
            .field("clustering", &self.clustering.keys().collect::<Vec<_>>())
            .field("slicing_tools", &self.slicing_tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Params {
        #[serde(default)]
        radius: f64,
    }

    #[test]
    fn test_spec_shorthand() {
        let specs: Vec<AlgorithmSpec> =
            serde_json::from_str(r#"["A", {"type": "B", "params": {"radius": 2.0}}]"#).unwrap();
        assert_eq!(specs[0], AlgorithmSpec::new("A"));
        assert_eq!(specs[1].kind, "B");
        assert_eq!(specs[1].params["radius"], 2.0);
    }

    #[test]
    fn test_parse_params() {
        let defaults: Params = parse_params("A", &Value::Null).unwrap();
        assert_eq!(defaults, Params::default());

        let err = parse_params::<Params>("A", &serde_json::json!({"radius": "far"})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = ParentSettings::from_json_str(r#"{"slicer": "X"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_misspelled_spec_key_rejected() {
        let result = serde_json::from_str::<AlgorithmSpec>(
            r#"{"type": "ProximityClustering", "parms": {"radius": 9.0}}"#,
        );
        assert!(result.is_err());

        let json = r#"{"clustering": {"type": "ProximityClustering", "parms": {}}}"#;
        let err = ParentSettings::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_require_names_missing_setting() {
        let settings = ParentSettings::default();
        let err = require(&settings.slicing, "slicing").unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting("slicing")));
    }
}
