//! Locally run simulators: Qiskit Aer, ProjectQ and Qulacs.

use serde::{Deserialize, Serialize};

use crate::config::ConfigRecord;
use crate::kind::ConfigKind;
use crate::noise::{AerNoiseModel, CrosstalkParams};
use crate::validate::{Issues, Validate};

/// Default qubit limit for Aer simulators.
pub const AER_DEFAULT_QUBITS: u32 = 40;

fn default_aer_qubits() -> u32 {
    AER_DEFAULT_QUBITS
}

fn default_simulation_method() -> String {
    "automatic".into()
}

/// Qiskit Aer QASM simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AerConfig {
    /// Noise model applied during simulation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_model: Option<AerNoiseModel>,
    /// Aer simulation method.
    #[serde(default = "default_simulation_method")]
    pub simulation_method: String,
    /// Crosstalk noise parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crosstalk_params: Option<CrosstalkParams>,
    /// Maximum number of qubits.
    #[serde(default = "default_aer_qubits")]
    pub n_qubits: u32,
    /// Simulator seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

impl Default for AerConfig {
    fn default() -> Self {
        Self {
            noise_model: None,
            simulation_method: default_simulation_method(),
            crosstalk_params: None,
            n_qubits: AER_DEFAULT_QUBITS,
            seed: None,
        }
    }
}

impl Validate for AerConfig {
    fn validate(&self, issues: &mut Issues) {
        issues.at_least("n_qubits", self.n_qubits, 1);
        issues.child("noise_model", &self.noise_model);
    }
}

impl ConfigRecord for AerConfig {
    const KIND: ConfigKind = ConfigKind::Aer;
    const FIELDS: &'static [&'static str] = &[
        "noise_model",
        "simulation_method",
        "crosstalk_params",
        "n_qubits",
        "seed",
    ];
}

/// Qiskit Aer statevector simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AerStateConfig {
    /// Maximum number of qubits.
    #[serde(default = "default_aer_qubits")]
    pub n_qubits: u32,
}

impl Default for AerStateConfig {
    fn default() -> Self {
        Self {
            n_qubits: AER_DEFAULT_QUBITS,
        }
    }
}

impl Validate for AerStateConfig {
    fn validate(&self, issues: &mut Issues) {
        issues.at_least("n_qubits", self.n_qubits, 1);
    }
}

impl ConfigRecord for AerStateConfig {
    const KIND: ConfigKind = ConfigKind::AerState;
    const FIELDS: &'static [&'static str] = &["n_qubits"];
}

/// Qiskit Aer unitary simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AerUnitaryConfig {
    /// Maximum number of qubits.
    #[serde(default = "default_aer_qubits")]
    pub n_qubits: u32,
}

impl Default for AerUnitaryConfig {
    fn default() -> Self {
        Self {
            n_qubits: AER_DEFAULT_QUBITS,
        }
    }
}

impl Validate for AerUnitaryConfig {
    fn validate(&self, issues: &mut Issues) {
        issues.at_least("n_qubits", self.n_qubits, 1);
    }
}

impl ConfigRecord for AerUnitaryConfig {
    const KIND: ConfigKind = ConfigKind::AerUnitary;
    const FIELDS: &'static [&'static str] = &["n_qubits"];
}

/// ProjectQ statevector simulator. Has no options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectQConfig {}

impl Validate for ProjectQConfig {
    fn validate(&self, _issues: &mut Issues) {}
}

impl ConfigRecord for ProjectQConfig {
    const KIND: ConfigKind = ConfigKind::ProjectQ;
    const FIELDS: &'static [&'static str] = &[];
}

fn default_result_type() -> String {
    "state_vector".into()
}

/// Qulacs simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QulacsConfig {
    /// Qulacs result type.
    #[serde(default = "default_result_type")]
    pub result_type: String,
    /// Run on GPU.
    #[serde(default)]
    pub gpu_sim: bool,
    /// Simulator seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

impl Default for QulacsConfig {
    fn default() -> Self {
        Self {
            result_type: default_result_type(),
            gpu_sim: false,
            seed: None,
        }
    }
}

impl Validate for QulacsConfig {
    fn validate(&self, _issues: &mut Issues) {}
}

impl ConfigRecord for QulacsConfig {
    const KIND: ConfigKind = ConfigKind::Qulacs;
    const FIELDS: &'static [&'static str] = &["result_type", "gpu_sim", "seed"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::options::ResolveOptions;

    #[test]
    fn test_aer_defaults() {
        let config = AerConfig::from_document(json!({})).unwrap();
        assert_eq!(config.n_qubits, 40);
        assert_eq!(config.simulation_method, "automatic");
        assert!(config.noise_model.is_none());
        assert_eq!(config, AerConfig::default());
    }

    #[test]
    fn test_aer_n_qubits_must_be_positive() {
        let err = AerConfig::from_document(json!({"n_qubits": 0})).unwrap_err();
        assert!(err.mentions_field("n_qubits"));

        let err = AerUnitaryConfig::from_document(json!({"n_qubits": -3})).unwrap_err();
        assert!(err.mentions_field("n_qubits"));
    }

    #[test]
    fn test_aer_noise_model_validated() {
        let err = AerConfig::from_document(json!({
            "noise_model": {
                "errors": [{"type": "roerror", "probabilities": [], "gate_qubits": [[0]]}]
            }
        }))
        .unwrap_err();
        assert!(err.mentions_field("noise_model.errors[0].probabilities"), "{err}");
    }

    #[test]
    fn test_aer_wrong_type_identifies_field() {
        let err = AerConfig::from_document(json!({"seed": "abc"})).unwrap_err();
        assert!(err.mentions_field("seed"), "{err}");

        let err = AerConfig::from_document(json!({
            "noise_model": {
                "errors": [{"type": "roerror", "probabilities": "x", "gate_qubits": [[0]]}]
            }
        }))
        .unwrap_err();
        assert!(err.mentions_field("noise_model.errors[0].probabilities"), "{err}");
    }

    #[test]
    fn test_aer_crosstalk_time_slices_unconstrained() {
        let config = AerConfig::from_document(json!({
            "crosstalk_params": {
                "zz_crosstalks": [],
                "single_q_phase_errors": [],
                "two_q_induced_phase_errors": [],
                "non_markovian_noise": [],
                "virtual_z": false,
                "N": 0.0,
                "gate_times": [],
                "phase_damping_error": [],
                "amplitude_damping_error": []
            }
        }))
        .unwrap();
        assert_eq!(config.crosstalk_params.map(|p| p.n), Some(0.0));
    }

    #[test]
    fn test_aer_strict_rejects_nested_unknown_keys() {
        let doc = json!({
            "noise_model": {
                "errors": [{
                    "type": "roerror",
                    "probabilities": [[1.0, 0.0]],
                    "gate_qubits": [[0]],
                    "label": "ro"
                }]
            }
        });
        assert!(AerConfig::from_document(doc.clone()).is_ok());

        let err = AerConfig::from_document_with(doc, &ResolveOptions::strict()).unwrap_err();
        assert!(err.mentions_field("noise_model.errors[0].label"), "{err}");
    }

    #[test]
    fn test_projectq_has_no_fields() {
        let config = ProjectQConfig::from_document(json!({"anything": 1})).unwrap();
        assert_eq!(config, ProjectQConfig {});
        assert_eq!(
            config.to_serializable().unwrap(),
            json!({"type": "ProjectQConfig"})
        );
    }

    #[test]
    fn test_qulacs_overrides() {
        let config = QulacsConfig::from_document(json!({"gpu_sim": true, "seed": 7})).unwrap();
        assert!(config.gpu_sim);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.result_type, "state_vector");
    }
}
