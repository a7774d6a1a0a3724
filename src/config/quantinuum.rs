//! Quantinuum system configurations: hardware, hosted emulators, and the
//! standard emulator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ConfigRecord, json_type_name};
use crate::kind::ConfigKind;
use crate::noise::UserErrorParams;
use crate::validate::{Issues, Validate};

/// Default HQC budget for a batch of programs.
pub const DEFAULT_MAX_BATCH_COST: u64 = 2000;

fn default_max_batch_cost() -> u64 {
    DEFAULT_MAX_BATCH_COST
}

fn default_true() -> bool {
    true
}

/// Extra flags for the Quantinuum compiler.
///
/// Unknown flags are allowed. Values must be strings, integers, booleans,
/// floats, or lists of floats.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuantinuumCompilerOptions(BTreeMap<String, Value>);

impl QuantinuumCompilerOptions {
    /// Empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a flag.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a flag.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate over flags in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of flags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no flag is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for QuantinuumCompilerOptions {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Validate for QuantinuumCompilerOptions {
    fn validate(&self, issues: &mut Issues) {
        for (key, value) in &self.0 {
            match value {
                Value::String(_) | Value::Number(_) | Value::Bool(_) => {}
                Value::Array(items) => {
                    if let Some(i) = items.iter().position(|x| !x.is_f64()) {
                        issues.push(
                            &format!("{key}[{i}]"),
                            "lists must only contain floats",
                        );
                    }
                }
                other => issues.push(
                    key,
                    format!(
                        "compiler options must be str, bool, int, float or a list of floats, got {}",
                        json_type_name(other)
                    ),
                ),
            }
        }
    }
}

/// Runs circuits on Quantinuum hardware and hosted emulators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantinuumConfig {
    /// The quantum computer or emulator to target.
    pub device_name: String,
    /// Simulator type when `device_name` is an emulator.
    #[serde(default = "default_simulator_name")]
    pub simulator: String,
    /// Submit in debug mode.
    #[serde(default)]
    pub machine_debug: bool,
    /// Group submissions into batches.
    #[serde(default)]
    pub attempt_batching: bool,
    /// Let the compiler relabel qubits instead of inserting swaps.
    #[serde(default = "default_true")]
    pub allow_implicit_swaps: bool,
    /// Apply end-of-circuit simplifications and classical postprocessing.
    #[serde(default)]
    pub postprocess: bool,
    /// Simulate with the device error model.
    #[serde(default)]
    pub noisy_simulation: bool,
    /// Native two-qubit gate to compile to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_2qb_gate: Option<String>,
    /// Group charged for the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_group: Option<String>,
    /// Maximum HQC cost for a batch of programs.
    #[serde(default = "default_max_batch_cost")]
    pub max_batch_cost: u64,
    /// Extra compiler flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_options: Option<QuantinuumCompilerOptions>,
    /// Skip server-side optimisation.
    #[serde(default = "default_true")]
    pub no_opt: bool,
    /// Allow rebasing two-qubit gates on the server.
    #[serde(default)]
    pub allow_2q_gate_rebase: bool,
    /// Add an extra qubit and bit to detect leakage errors.
    #[serde(default)]
    pub leakage_detection: bool,
    /// Apply initial-state simplification before submission.
    #[serde(default)]
    pub simplify_initial: bool,
    /// Maximum HQC cost for a single program.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<u64>,
    /// Error rate overrides for emulators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_params: Option<UserErrorParams>,
}

fn default_simulator_name() -> String {
    "state-vector".into()
}

impl QuantinuumConfig {
    /// Configuration for `device_name` with default options.
    pub fn new(device_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            simulator: default_simulator_name(),
            machine_debug: false,
            attempt_batching: false,
            allow_implicit_swaps: true,
            postprocess: false,
            noisy_simulation: false,
            target_2qb_gate: None,
            user_group: None,
            max_batch_cost: DEFAULT_MAX_BATCH_COST,
            compiler_options: None,
            no_opt: true,
            allow_2q_gate_rebase: false,
            leakage_detection: false,
            simplify_initial: false,
            max_cost: None,
            error_params: None,
        }
    }
}

impl Validate for QuantinuumConfig {
    fn validate(&self, issues: &mut Issues) {
        if self.device_name.is_empty() {
            issues.push("device_name", "must not be empty");
        }
        issues.child("compiler_options", &self.compiler_options);
    }
}

impl ConfigRecord for QuantinuumConfig {
    const KIND: ConfigKind = ConfigKind::Quantinuum;
    const FIELDS: &'static [&'static str] = &[
        "device_name",
        "simulator",
        "machine_debug",
        "attempt_batching",
        "allow_implicit_swaps",
        "postprocess",
        "noisy_simulation",
        "target_2qb_gate",
        "user_group",
        "max_batch_cost",
        "compiler_options",
        "no_opt",
        "allow_2q_gate_rebase",
        "leakage_detection",
        "simplify_initial",
        "max_cost",
        "error_params",
    ];
}

/// Simulation method of the standard emulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulatorType {
    #[default]
    StateVector,
    Stabilizer,
    MatrixProductState,
}

/// Default qubit count of the standard emulator.
pub const STANDARD_EMULATOR_QUBITS: u32 = 20;

fn default_standard_qubits() -> u32 {
    STANDARD_EMULATOR_QUBITS
}

/// General-purpose emulator with a noise toggle and optional cost limits.
/// Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardEmulatorConfig {
    /// Simulation method.
    #[serde(default)]
    pub simulator: SimulatorType,
    /// Simulate with an error model.
    #[serde(default)]
    pub noisy_simulation: bool,
    /// Error rate overrides; only used when `noisy_simulation` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_params: Option<UserErrorParams>,
    /// Number of qubits to emulate.
    #[serde(default = "default_standard_qubits")]
    pub n_qubits: u32,
    /// Group submissions into batches.
    #[serde(default)]
    pub attempt_batching: bool,
    /// Maximum cost for a batch of programs.
    #[serde(default = "default_max_batch_cost")]
    pub max_batch_cost: u64,
    /// Maximum cost for a single program; at most `max_batch_cost`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<u64>,
    /// Add an extra qubit and bit to detect leakage errors.
    #[serde(default)]
    pub leakage_detection: bool,
    /// Emulator seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

impl Default for StandardEmulatorConfig {
    fn default() -> Self {
        Self {
            simulator: SimulatorType::default(),
            noisy_simulation: false,
            error_params: None,
            n_qubits: STANDARD_EMULATOR_QUBITS,
            attempt_batching: false,
            max_batch_cost: DEFAULT_MAX_BATCH_COST,
            max_cost: None,
            leakage_detection: false,
            seed: None,
        }
    }
}

impl Validate for StandardEmulatorConfig {
    fn validate(&self, issues: &mut Issues) {
        issues.at_least("n_qubits", self.n_qubits, 1);
        if let Some(max_cost) = self.max_cost {
            issues.at_most("max_cost", max_cost, self.max_batch_cost);
        }
        if self.error_params.is_some() && !self.noisy_simulation {
            tracing::warn!("error_params is ignored when noisy_simulation is false");
        }
    }
}

impl ConfigRecord for StandardEmulatorConfig {
    const KIND: ConfigKind = ConfigKind::StandardEmulator;
    const FIELDS: &'static [&'static str] = &[
        "simulator",
        "noisy_simulation",
        "error_params",
        "n_qubits",
        "attempt_batching",
        "max_batch_cost",
        "max_cost",
        "leakage_detection",
        "seed",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_compiler_options() {
        let config = QuantinuumConfig::from_document(json!({
            "device_name": "H1-1E",
            "compiler_options": {
                "expect_threshold": 0.5,
                "DD_threshold_times": [0.1, 0.2, 0.3],
                "CF": "non linear",
                "test_cz": false,
                "max_planning": 601
            }
        }))
        .unwrap();
        let options = config.compiler_options.unwrap();
        assert_eq!(options.len(), 5);
        assert_eq!(options.get("max_planning"), Some(&json!(601)));
    }

    #[test]
    fn test_compiler_option_list_must_hold_floats() {
        let err = QuantinuumConfig::from_document(json!({
            "device_name": "H1-1E",
            "compiler_options": {"DD_threshold_times": [0.1, 3, 0.3]}
        }))
        .unwrap_err();
        assert!(err.mentions_field("compiler_options.DD_threshold_times[1]"), "{err}");
    }

    #[test]
    fn test_compiler_option_rejects_mapping() {
        let mut options = QuantinuumCompilerOptions::new();
        options.insert("nested", json!({"a": 1}));
        let err = Issues::check("QuantinuumCompilerOptions", &options).unwrap_err();
        assert!(err.mentions_field("nested"));
    }

    #[test]
    fn test_quantinuum_defaults() {
        let config = QuantinuumConfig::from_document(json!({"device_name": "H2-1"})).unwrap();
        assert_eq!(config, QuantinuumConfig::new("H2-1"));
        assert!(config.no_opt);
        assert!(config.allow_implicit_swaps);
        assert_eq!(config.max_batch_cost, 2000);
    }

    #[test]
    fn test_quantinuum_device_name_required() {
        let err = QuantinuumConfig::from_document(json!({"noisy_simulation": true})).unwrap_err();
        assert!(err.mentions_field("device_name"));
    }

    #[test]
    fn test_standard_emulator_noisy_simulation_only() {
        let config =
            StandardEmulatorConfig::from_document(json!({"noisy_simulation": true})).unwrap();
        assert_eq!(
            config,
            StandardEmulatorConfig {
                noisy_simulation: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_standard_emulator_invalid_simulator() {
        let err = StandardEmulatorConfig::from_document(json!({"simulator": "quantum-magic"}))
            .unwrap_err();
        assert!(err.mentions_field("simulator"), "{err}");

        let config =
            StandardEmulatorConfig::from_document(json!({"simulator": "matrix-product-state"}))
                .unwrap();
        assert_eq!(config.simulator, SimulatorType::MatrixProductState);
    }

    #[test]
    fn test_standard_emulator_cost_limits() {
        let err = StandardEmulatorConfig::from_document(json!({
            "max_batch_cost": 100,
            "max_cost": 500
        }))
        .unwrap_err();
        assert!(err.mentions_field("max_cost"));

        let config =
            StandardEmulatorConfig::from_document(json!({"max_cost": 500})).unwrap();
        assert_eq!(config.max_cost, Some(500));
    }
}
