//! Selene emulator configurations.
//!
//! Every Selene kind shares a runtime, an error model, an optional seed and a
//! required qubit count; the kinds differ in the simulation engine and its
//! settings.
//!
//! | Kind | Engine | Extra settings |
//! |------|--------|----------------|
//! | `SeleneQuestConfig` | QuEST statevector | `n_qubits` at most 28 |
//! | `SeleneStimConfig` | Stim stabilizer | `angle_threshold` |
//! | `SeleneLeanConfig` | Lean tensor network | `backend`, `precision`, `chi`, ... |
//! | `SeleneCoinflipConfig` | random outcomes | `bias` |
//! | `SeleneClassicalReplayConfig` | replayed outcomes | `measurements` |

use serde::{Deserialize, Serialize};

use crate::config::ConfigRecord;
use crate::emulator::{ComputeBackend, ErrorModel, Precision, Runtime, validate_tensor_network};
use crate::kind::ConfigKind;
use crate::validate::{Issues, Validate};

/// Largest qubit count the hosted QuEST engine accepts.
pub const QUEST_MAX_QUBITS: u32 = 28;

fn validate_common(issues: &mut Issues, error_model: &ErrorModel, n_qubits: u32) {
    issues.at_least("n_qubits", n_qubits, 1);
    issues.child("error_model", error_model);
}

/// Selene with the QuEST statevector engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeleneQuestConfig {
    /// Runtime model.
    #[serde(default)]
    pub runtime: Runtime,
    /// Noise applied during simulation.
    #[serde(default)]
    pub error_model: ErrorModel,
    /// Seed for the simulation engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Maximum number of qubits to simulate.
    pub n_qubits: u32,
}

impl SeleneQuestConfig {
    /// Ideal simulation of `n_qubits` with the simple runtime.
    pub fn new(n_qubits: u32) -> Self {
        Self {
            runtime: Runtime::default(),
            error_model: ErrorModel::default(),
            seed: None,
            n_qubits,
        }
    }
}

impl Validate for SeleneQuestConfig {
    fn validate(&self, issues: &mut Issues) {
        validate_common(issues, &self.error_model, self.n_qubits);
        issues.at_most("n_qubits", self.n_qubits, QUEST_MAX_QUBITS);
    }
}

impl ConfigRecord for SeleneQuestConfig {
    const KIND: ConfigKind = ConfigKind::SeleneQuest;
    const FIELDS: &'static [&'static str] = &["runtime", "error_model", "seed", "n_qubits"];
}

fn default_angle_threshold() -> f64 {
    1e-8
}

/// Selene with the Stim stabilizer engine. Only Clifford operations can be
/// simulated; `angle_threshold` bounds how far rotation angles may stray from
/// multiples of pi/2 before they are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeleneStimConfig {
    /// Runtime model.
    #[serde(default)]
    pub runtime: Runtime,
    /// Noise applied during simulation.
    #[serde(default)]
    pub error_model: ErrorModel,
    /// Seed for the simulation engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Number of qubits to simulate.
    pub n_qubits: u32,
    /// How far angles may stray from multiples of pi/2.
    #[serde(default = "default_angle_threshold")]
    pub angle_threshold: f64,
}

impl Validate for SeleneStimConfig {
    fn validate(&self, issues: &mut Issues) {
        validate_common(issues, &self.error_model, self.n_qubits);
        issues.greater_than("angle_threshold", self.angle_threshold, 0.0);
    }
}

impl ConfigRecord for SeleneStimConfig {
    const KIND: ConfigKind = ConfigKind::SeleneStim;
    const FIELDS: &'static [&'static str] =
        &["runtime", "error_model", "seed", "n_qubits", "angle_threshold"];
}

/// Selene with the Lean (low-entanglement approximation) tensor-network engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeleneLeanConfig {
    /// Runtime model.
    #[serde(default)]
    pub runtime: Runtime,
    /// Noise applied during simulation.
    #[serde(default)]
    pub error_model: ErrorModel,
    /// Seed for the simulation engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Number of qubits to simulate.
    pub n_qubits: u32,
    /// Classical compute backend.
    #[serde(default)]
    pub backend: ComputeBackend,
    /// Floating point precision of tensor calculations.
    #[serde(default)]
    pub precision: Precision,
    /// Maximum virtual bond dimension; unbounded when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chi: Option<u32>,
    /// Minimum fidelity kept when truncating bonds; 1 when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncation_fidelity: Option<f64>,
    /// Singular values below this are truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_threshold: Option<f64>,
}

impl Validate for SeleneLeanConfig {
    fn validate(&self, issues: &mut Issues) {
        validate_common(issues, &self.error_model, self.n_qubits);
        validate_tensor_network(
            issues,
            self.backend,
            self.chi,
            self.truncation_fidelity,
            self.zero_threshold,
        );
    }
}

impl ConfigRecord for SeleneLeanConfig {
    const KIND: ConfigKind = ConfigKind::SeleneLean;
    const FIELDS: &'static [&'static str] = &[
        "runtime",
        "error_model",
        "seed",
        "n_qubits",
        "backend",
        "precision",
        "chi",
        "truncation_fidelity",
        "zero_threshold",
    ];
}

fn default_bias() -> f64 {
    0.5
}

/// Selene coin-flip engine: keeps no quantum state and returns a random
/// boolean for each measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeleneCoinflipConfig {
    /// Runtime model.
    #[serde(default)]
    pub runtime: Runtime,
    /// Noise applied during simulation.
    #[serde(default)]
    pub error_model: ErrorModel,
    /// Seed for the simulation engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Number of qubits to simulate.
    pub n_qubits: u32,
    /// Probability that a measurement returns true.
    #[serde(default = "default_bias")]
    pub bias: f64,
}

impl Validate for SeleneCoinflipConfig {
    fn validate(&self, issues: &mut Issues) {
        validate_common(issues, &self.error_model, self.n_qubits);
        issues.probability("bias", self.bias);
    }
}

impl ConfigRecord for SeleneCoinflipConfig {
    const KIND: ConfigKind = ConfigKind::SeleneCoinflip;
    const FIELDS: &'static [&'static str] =
        &["runtime", "error_model", "seed", "n_qubits", "bias"];
}

/// Selene classical replay engine: measurement results are predefined per
/// shot and no quantum operations are performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeleneClassicalReplayConfig {
    /// Runtime model.
    #[serde(default)]
    pub runtime: Runtime,
    /// Noise applied during simulation.
    #[serde(default)]
    pub error_model: ErrorModel,
    /// Seed for the simulation engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Number of qubits to simulate.
    pub n_qubits: u32,
    /// One list of measurement outcomes per shot.
    #[serde(default)]
    pub measurements: Vec<Vec<bool>>,
}

impl Validate for SeleneClassicalReplayConfig {
    fn validate(&self, issues: &mut Issues) {
        validate_common(issues, &self.error_model, self.n_qubits);
    }
}

impl ConfigRecord for SeleneClassicalReplayConfig {
    const KIND: ConfigKind = ConfigKind::SeleneClassicalReplay;
    const FIELDS: &'static [&'static str] =
        &["runtime", "error_model", "seed", "n_qubits", "measurements"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::DepolarizingErrorModel;
    use crate::error::SchemaError;
    use crate::options::ResolveOptions;
    use serde_json::json;

    #[test]
    fn test_quest_defaults() {
        let config = SeleneQuestConfig::from_document(json!({"n_qubits": 4})).unwrap();
        assert_eq!(config, SeleneQuestConfig::new(4));
        assert_eq!(config.runtime, Runtime::Simple { seed: None });
        assert_eq!(config.error_model, ErrorModel::none());
    }

    #[test]
    fn test_quest_qubit_bounds() {
        let err = SeleneQuestConfig::from_document(json!({"n_qubits": 29})).unwrap_err();
        assert!(err.mentions_field("n_qubits"));
        let err = SeleneQuestConfig::from_document(json!({"n_qubits": 0})).unwrap_err();
        assert!(err.mentions_field("n_qubits"));
        assert!(SeleneQuestConfig::from_document(json!({"n_qubits": 28})).is_ok());
    }

    #[test]
    fn test_n_qubits_required() {
        let err = SeleneStimConfig::from_document(json!({})).unwrap_err();
        assert!(err.mentions_field("n_qubits"));
        assert_eq!(err.issues()[0].reason, "field required");
    }

    #[test]
    fn test_runtime_and_error_model_round_trip() {
        let config = SeleneCoinflipConfig::from_document(json!({
            "n_qubits": 4,
            "runtime": {"type": "HeliosRuntime"},
            "error_model": {"type": "DepolarizingErrorModel", "p_1q": 0.01}
        }))
        .unwrap();
        assert_eq!(config.runtime, Runtime::Helios { seed: None });
        assert_eq!(
            config.error_model,
            ErrorModel::Depolarizing(DepolarizingErrorModel {
                p_1q: 0.01,
                ..Default::default()
            })
        );

        let reloaded =
            SeleneCoinflipConfig::from_document(config.to_serializable().unwrap()).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_error_model_probability_path() {
        let err = SeleneStimConfig::from_document(json!({
            "n_qubits": 2,
            "error_model": {"type": "DepolarizingErrorModel", "p_init": -0.5}
        }))
        .unwrap_err();
        assert!(err.mentions_field("error_model.p_init"), "{err}");

        let err = SeleneStimConfig::from_document(json!({
            "n_qubits": 2,
            "error_model": {"type": "DepolarizingErrorModel", "p_1q": "abc"}
        }))
        .unwrap_err();
        assert!(err.mentions_field("error_model.p_1q"), "{err}");
        assert_eq!(err.issues().len(), 1);
    }

    #[test]
    fn test_strict_rejects_unknown_error_model_keys() {
        let doc = json!({
            "n_qubits": 2,
            "runtime": {"type": "SimpleRuntime", "seed": 4},
            "error_model": {"type": "NoErrorModel", "bogus": 1}
        });
        assert!(SeleneStimConfig::from_document(doc.clone()).is_ok());

        let err = SeleneStimConfig::from_document_with(doc, &ResolveOptions::strict()).unwrap_err();
        assert!(
            matches!(err, SchemaError::UnknownFields { ref fields, .. } if fields == &["error_model.bogus"]),
            "{err}"
        );
    }

    #[test]
    fn test_lean_rules() {
        let err = SeleneLeanConfig::from_document(json!({"n_qubits": 10, "chi": 300})).unwrap_err();
        assert!(err.to_string().contains("chi > 256"));

        let config = SeleneLeanConfig::from_document(json!({
            "n_qubits": 10,
            "chi": 300,
            "backend": "cuda",
            "precision": 64
        }))
        .unwrap();
        assert_eq!(config.precision, Precision::Double);

        let err = SeleneLeanConfig::from_document(json!({"n_qubits": 10, "precision": 16}))
            .unwrap_err();
        assert!(err.mentions_field("precision"), "{err}");

        let err = SeleneLeanConfig::from_document(json!({"n_qubits": 10, "backend": "tpu"}))
            .unwrap_err();
        assert!(err.mentions_field("backend"), "{err}");
    }

    #[test]
    fn test_coinflip_bias_bounds() {
        let err = SeleneCoinflipConfig::from_document(json!({"n_qubits": 1, "bias": 1.01}))
            .unwrap_err();
        assert!(err.mentions_field("bias"));
    }

    #[test]
    fn test_classical_replay_measurements() {
        let config = SeleneClassicalReplayConfig::from_document(json!({
            "n_qubits": 2,
            "measurements": [[true, false], [false, false]]
        }))
        .unwrap();
        assert_eq!(config.measurements.len(), 2);

        let config = SeleneClassicalReplayConfig::from_document(json!({"n_qubits": 2})).unwrap();
        assert!(config.measurements.is_empty());
    }
}
