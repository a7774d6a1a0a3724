//! HyperTKET compilation options.
//!
//! Not a registry kind: these settings travel alongside a backend
//! configuration rather than selecting one.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SchemaResult;
use crate::validate::{
    Issues, Validate, deserialize_validated, take_tag, unknown_variant, variant,
};

fn default_true() -> bool {
    true
}

/// Compilation passes that search for a circuit rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteSearchConfig {
    /// Search for circuit rewrites during compilation.
    #[serde(default = "default_true")]
    pub enable_rewrite_search: bool,
}

impl Default for RewriteSearchConfig {
    fn default() -> Self {
        Self {
            enable_rewrite_search: true,
        }
    }
}

fn default_time_limit() -> u64 {
    600
}

fn default_threads() -> u32 {
    1
}

/// Qubit ordering used by the qubit reuse pass, tagged by `ordering_method`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "ordering_method")]
pub enum OrderingConfig {
    #[serde(rename = "BruteForceOrder")]
    BruteForce,
    /// Constraint solver search.
    #[serde(rename = "ConstrainedOptOrder")]
    ConstrainedOpt {
        /// Solver time limit in seconds.
        time_limit: u64,
        n_threads: u32,
        /// Starting order for the solver.
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<Vec<u32>>,
    },
    #[serde(rename = "LocalGreedyOrder")]
    LocalGreedy,
    #[serde(rename = "LocalGreedyFirstNodeSearchOrder")]
    LocalGreedyFirstNodeSearch,
    /// Caller supplied order.
    #[serde(rename = "CustomOrder")]
    Custom { order: Vec<u32> },
    #[default]
    #[serde(rename = "DefaultOrder")]
    Default,
}

#[derive(Deserialize)]
struct ConstrainedOptFields {
    #[serde(default = "default_time_limit")]
    time_limit: u64,
    #[serde(default = "default_threads")]
    n_threads: u32,
    #[serde(default)]
    hint: Option<Vec<u32>>,
}

#[derive(Deserialize)]
struct CustomOrderFields {
    order: Vec<u32>,
}

const ORDERING_METHODS: &[&str] = &[
    "BruteForceOrder",
    "ConstrainedOptOrder",
    "LocalGreedyOrder",
    "LocalGreedyFirstNodeSearchOrder",
    "CustomOrder",
    "DefaultOrder",
];

impl<'de> Deserialize<'de> for OrderingConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (method, body) =
            take_tag::<D::Error>(Value::deserialize(deserializer)?, "ordering_method")?;
        match method.as_str() {
            "BruteForceOrder" => Ok(Self::BruteForce),
            "ConstrainedOptOrder" => variant(body).map(|f: ConstrainedOptFields| {
                Self::ConstrainedOpt {
                    time_limit: f.time_limit,
                    n_threads: f.n_threads,
                    hint: f.hint,
                }
            }),
            "LocalGreedyOrder" => Ok(Self::LocalGreedy),
            "LocalGreedyFirstNodeSearchOrder" => Ok(Self::LocalGreedyFirstNodeSearch),
            "CustomOrder" => variant(body).map(|f: CustomOrderFields| Self::Custom { order: f.order }),
            "DefaultOrder" => Ok(Self::Default),
            other => Err(unknown_variant("ordering_method", other, ORDERING_METHODS)),
        }
    }
}

impl OrderingConfig {
    /// `ConstrainedOptOrder` with default limits.
    pub fn constrained_opt() -> Self {
        Self::ConstrainedOpt {
            time_limit: default_time_limit(),
            n_threads: default_threads(),
            hint: None,
        }
    }
}

impl Validate for OrderingConfig {
    fn validate(&self, issues: &mut Issues) {
        if let Self::ConstrainedOpt { n_threads, .. } = self {
            issues.at_least("n_threads", *n_threads, 1);
        }
    }
}

/// Strategy for dual circuit compilation. Serialized as `0`, `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DualStrat {
    Single,
    Dual,
    Auto,
}

impl TryFrom<u8> for DualStrat {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Single),
            1 => Ok(Self::Dual),
            2 => Ok(Self::Auto),
            other => Err(format!("dual circuit strategy must be 0, 1 or 2, got {other}")),
        }
    }
}

impl From<DualStrat> for u8 {
    fn from(strategy: DualStrat) -> Self {
        match strategy {
            DualStrat::Single => 0,
            DualStrat::Dual => 1,
            DualStrat::Auto => 2,
        }
    }
}

/// Qubit reuse compilation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QubitReuseConfig {
    /// Run the qubit reuse pass.
    pub enable_qubit_reuse: bool,
    /// How the pass orders qubits.
    pub ordering_config: OrderingConfig,
    /// Stop reusing once the circuit needs this many qubits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_qubits: Option<u32>,
    /// Whether to compile a dual circuit as well.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dual_circuit_strategy: Option<DualStrat>,
}

impl Validate for QubitReuseConfig {
    fn validate(&self, issues: &mut Issues) {
        issues.child("ordering_config", &self.ordering_config);
    }
}

/// Options for HyperTKET compilation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperTketConfig {
    /// Rewrite search settings.
    pub rewrite_search_config: RewriteSearchConfig,
    /// Qubit reuse settings; the pass is skipped when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qubit_reuse_config: Option<QubitReuseConfig>,
}

impl HyperTketConfig {
    /// Build from an untyped document and check constraints.
    pub fn from_value(document: Value) -> SchemaResult<Self> {
        deserialize_validated("HyperTketConfig", document)
    }
}

impl Validate for HyperTketConfig {
    fn validate(&self, issues: &mut Issues) {
        issues.child("qubit_reuse_config", &self.qubit_reuse_config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = HyperTketConfig::from_value(json!({})).unwrap();
        assert!(config.rewrite_search_config.enable_rewrite_search);
        assert!(config.qubit_reuse_config.is_none());
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"rewrite_search_config": {"enable_rewrite_search": true}})
        );
    }

    #[test]
    fn test_dual_strategy_serialized_as_integer() {
        let config = HyperTketConfig {
            qubit_reuse_config: Some(QubitReuseConfig {
                dual_circuit_strategy: Some(DualStrat::Auto),
                ..Default::default()
            }),
            ..Default::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["qubit_reuse_config"]["dual_circuit_strategy"], json!(2));
        assert_eq!(
            value["qubit_reuse_config"]["ordering_config"],
            json!({"ordering_method": "DefaultOrder"})
        );
        assert_eq!(HyperTketConfig::from_value(value).unwrap(), config);

        let err = HyperTketConfig::from_value(json!({
            "qubit_reuse_config": {"dual_circuit_strategy": 3}
        }))
        .unwrap_err();
        assert!(err.mentions_field("qubit_reuse_config.dual_circuit_strategy"), "{err}");
    }

    #[test]
    fn test_constrained_opt_defaults_and_bounds() {
        let config = HyperTketConfig::from_value(json!({
            "qubit_reuse_config": {
                "enable_qubit_reuse": true,
                "ordering_config": {"ordering_method": "ConstrainedOptOrder"}
            }
        }))
        .unwrap();
        let reuse = config.qubit_reuse_config.unwrap();
        assert_eq!(reuse.ordering_config, OrderingConfig::constrained_opt());

        let err = HyperTketConfig::from_value(json!({
            "qubit_reuse_config": {
                "ordering_config": {"ordering_method": "ConstrainedOptOrder", "n_threads": 0}
            }
        }))
        .unwrap_err();
        assert!(
            err.mentions_field("qubit_reuse_config.ordering_config.n_threads"),
            "{err}"
        );
    }

    #[test]
    fn test_custom_order_requires_order() {
        let config = HyperTketConfig::from_value(json!({
            "qubit_reuse_config": {
                "ordering_config": {"ordering_method": "CustomOrder", "order": [2, 0, 1]}
            }
        }))
        .unwrap();
        assert_eq!(
            config.qubit_reuse_config.unwrap().ordering_config,
            OrderingConfig::Custom {
                order: vec![2, 0, 1]
            }
        );

        assert!(
            HyperTketConfig::from_value(json!({
                "qubit_reuse_config": {"ordering_config": {"ordering_method": "CustomOrder"}}
            }))
            .is_err()
        );
    }

    #[test]
    fn test_ordering_errors_point_at_inner_field() {
        let err = HyperTketConfig::from_value(json!({
            "qubit_reuse_config": {
                "ordering_config": {"ordering_method": "CustomOrder", "order": [0, "one"]}
            }
        }))
        .unwrap_err();
        assert!(
            err.mentions_field("qubit_reuse_config.ordering_config.order[1]"),
            "{err}"
        );

        let err = HyperTketConfig::from_value(json!({
            "qubit_reuse_config": {"ordering_config": {"ordering_method": "Fastest"}}
        }))
        .unwrap_err();
        assert!(
            err.mentions_field("qubit_reuse_config.ordering_config.ordering_method"),
            "{err}"
        );
    }
}
