//! Helios hardware, syntax checker and emulator configurations.

use serde::{Deserialize, Serialize};

use crate::config::quantinuum::{DEFAULT_MAX_BATCH_COST, QuantinuumCompilerOptions};
use crate::config::ConfigRecord;
use crate::emulator::{ErrorModel, QSystemErrorModel, Simulator};
use crate::kind::ConfigKind;
use crate::validate::{Issues, Validate};

/// Emulators that accept the full set of simulator, error model and run
/// constraint options.
pub const KNOWN_EMULATORS: &[&str] = &["Helios-1E-lite"];

fn default_max_batch_cost() -> u64 {
    DEFAULT_MAX_BATCH_COST
}

fn default_max_cost() -> u64 {
    100
}

fn default_priority() -> String {
    "normal".into()
}

/// Administrative limits for running on Quantinuum systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConstraints {
    /// Group submissions into batches.
    #[serde(default)]
    pub attempt_batching: bool,
    /// Maximum cost for a batch of programs.
    #[serde(default = "default_max_batch_cost")]
    pub max_batch_cost: u64,
    /// Maximum cost for a single program.
    #[serde(default = "default_max_cost")]
    pub max_cost: u64,
    /// Queue priority.
    #[serde(default = "default_priority")]
    pub priority: String,
}

impl Default for RunConstraints {
    fn default() -> Self {
        Self {
            attempt_batching: false,
            max_batch_cost: DEFAULT_MAX_BATCH_COST,
            max_cost: default_max_cost(),
            priority: default_priority(),
        }
    }
}

/// Helios hardware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeliosConfig {
    /// Target device.
    pub device_name: String,
    /// Administrative run limits.
    #[serde(default)]
    pub run_constraints: RunConstraints,
    /// Compiler flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QuantinuumCompilerOptions>,
}

impl HeliosConfig {
    /// Configuration for `device_name` with default run constraints.
    pub fn new(device_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            run_constraints: RunConstraints::default(),
            options: None,
        }
    }
}

impl Validate for HeliosConfig {
    fn validate(&self, issues: &mut Issues) {
        issues.child("options", &self.options);
    }
}

impl ConfigRecord for HeliosConfig {
    const KIND: ConfigKind = ConfigKind::Helios;
    const FIELDS: &'static [&'static str] = &["device_name", "run_constraints", "options"];
}

/// Helios syntax checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeliosCheckerConfig {
    /// Target device.
    pub device_name: String,
    /// Compiler flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QuantinuumCompilerOptions>,
}

impl Validate for HeliosCheckerConfig {
    fn validate(&self, issues: &mut Issues) {
        issues.child("options", &self.options);
    }
}

impl ConfigRecord for HeliosCheckerConfig {
    const KIND: ConfigKind = ConfigKind::HeliosChecker;
    const FIELDS: &'static [&'static str] = &["device_name", "options"];
}

fn default_error_model() -> ErrorModel {
    ErrorModel::QSystem(QSystemErrorModel::default())
}

/// Helios emulator systems.
///
/// Only the emulators in [`KNOWN_EMULATORS`] accept a classical replay
/// simulator, a depolarizing error model or run constraints; other emulators
/// ignore every seed. Batching is never available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeliosEmulatorConfig {
    /// Emulator system name.
    pub name: String,
    /// Emulator seed; honored only by known emulators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Number of qubits to emulate.
    pub n_qubits: u32,
    /// Simulation engine.
    #[serde(default)]
    pub simulator: Simulator,
    /// Noise applied during emulation.
    #[serde(default = "default_error_model")]
    pub error_model: ErrorModel,
    /// Administrative run limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_constraints: Option<RunConstraints>,
    /// Compiler flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QuantinuumCompilerOptions>,
}

impl HeliosEmulatorConfig {
    /// Emulator `name` with `n_qubits`, a statevector simulator and the
    /// system error model.
    pub fn new(name: impl Into<String>, n_qubits: u32) -> Self {
        Self {
            name: name.into(),
            seed: None,
            n_qubits,
            simulator: Simulator::default(),
            error_model: default_error_model(),
            run_constraints: None,
            options: None,
        }
    }

    /// Returns `true` if `name` is one of [`KNOWN_EMULATORS`].
    pub fn is_known_emulator(&self) -> bool {
        KNOWN_EMULATORS.contains(&self.name.as_str())
    }
}

impl Validate for HeliosEmulatorConfig {
    fn validate(&self, issues: &mut Issues) {
        issues.at_least("n_qubits", self.n_qubits, 1);
        issues.child("simulator", &self.simulator);
        issues.child("error_model", &self.error_model);
        issues.child("options", &self.options);

        if !self.is_known_emulator() {
            let known = KNOWN_EMULATORS.join(", ");
            if matches!(self.simulator, Simulator::ClassicalReplay(_)) {
                issues.push(
                    "simulator",
                    format!("ClassicalReplaySimulator is only available for emulators in: {known}"),
                );
            }
            if matches!(self.error_model, ErrorModel::Depolarizing(_)) {
                issues.push(
                    "error_model",
                    format!("DepolarizingErrorModel is only available for emulators in: {known}"),
                );
            }
            if self.run_constraints.is_some() {
                issues.push(
                    "run_constraints",
                    format!("only available for emulators in: {known}"),
                );
            }
            for (field, seed) in [
                ("seed", self.seed),
                ("simulator.seed", self.simulator.seed()),
                ("error_model.seed", self.error_model.seed()),
            ] {
                if seed.is_some() {
                    tracing::warn!(emulator = %self.name, field, "seed is ignored for this emulator");
                }
            }
        }

        if self.run_constraints.as_ref().is_some_and(|rc| rc.attempt_batching) {
            issues.push(
                "run_constraints.attempt_batching",
                "batching is not available for Helios emulators",
            );
        }
    }
}

impl ConfigRecord for HeliosEmulatorConfig {
    const KIND: ConfigKind = ConfigKind::HeliosEmulator;
    const FIELDS: &'static [&'static str] = &[
        "name",
        "seed",
        "n_qubits",
        "simulator",
        "error_model",
        "run_constraints",
        "options",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::{ClassicalReplaySimulator, DepolarizingErrorModel};
    use crate::options::ResolveOptions;
    use serde_json::json;

    #[test]
    fn test_helios_defaults() {
        let config = HeliosConfig::from_document(json!({"device_name": "Helios-1"})).unwrap();
        assert_eq!(config, HeliosConfig::new("Helios-1"));
        assert_eq!(config.run_constraints.max_cost, 100);
        assert_eq!(config.run_constraints.max_batch_cost, 2000);
        assert_eq!(config.run_constraints.priority, "normal");
    }

    #[test]
    fn test_helios_checker_options_validated() {
        let err = HeliosCheckerConfig::from_document(json!({
            "device_name": "Helios-1SC",
            "options": {"bad": null}
        }))
        .unwrap_err();
        assert!(err.mentions_field("options.bad"), "{err}");
    }

    #[test]
    fn test_emulator_defaults() {
        let config = HeliosEmulatorConfig::from_document(json!({
            "name": "Helios-1E",
            "n_qubits": 98
        }))
        .unwrap();
        assert_eq!(config, HeliosEmulatorConfig::new("Helios-1E", 98));
        assert_eq!(config.simulator.type_name(), "StatevectorSimulator");
        assert_eq!(config.error_model.type_name(), "QSystemErrorModel");
    }

    #[test]
    fn test_emulator_n_qubits_required() {
        let err = HeliosEmulatorConfig::from_document(json!({"name": "Helios-1E"})).unwrap_err();
        assert!(err.mentions_field("n_qubits"));
    }

    #[test]
    fn test_unknown_emulator_restrictions() {
        let mut config = HeliosEmulatorConfig::new("Helios-1E", 10);
        config.simulator = Simulator::ClassicalReplay(ClassicalReplaySimulator::default());
        config.error_model = ErrorModel::Depolarizing(DepolarizingErrorModel::default());
        config.run_constraints = Some(RunConstraints::default());

        let err = config.validated().unwrap_err();
        assert!(err.mentions_field("simulator"));
        assert!(err.mentions_field("error_model"));
        assert!(err.mentions_field("run_constraints"));
        assert_eq!(err.issues().len(), 3);
    }

    #[test]
    fn test_known_emulator_accepts_everything() {
        let config = HeliosEmulatorConfig::from_document(json!({
            "name": "Helios-1E-lite",
            "n_qubits": 10,
            "seed": 3,
            "simulator": {"type": "ClassicalReplaySimulator", "measurements": [[true]]},
            "error_model": {"type": "DepolarizingErrorModel", "p_2q": 0.02},
            "run_constraints": {"priority": "high"}
        }))
        .unwrap();
        assert!(config.is_known_emulator());
        assert_eq!(config.run_constraints.unwrap().priority, "high");
    }

    #[test]
    fn test_seeds_on_unknown_emulator_only_warn() {
        let config = HeliosEmulatorConfig::from_document(json!({
            "name": "Helios-1E",
            "n_qubits": 10,
            "seed": 1,
            "simulator": {"type": "StabilizerSimulator", "seed": 2}
        }))
        .unwrap();
        assert_eq!(config.simulator.seed(), Some(2));
    }

    #[test]
    fn test_batching_never_allowed() {
        let err = HeliosEmulatorConfig::from_document(json!({
            "name": "Helios-1E-lite",
            "n_qubits": 10,
            "run_constraints": {"attempt_batching": true}
        }))
        .unwrap_err();
        assert!(err.mentions_field("run_constraints.attempt_batching"));
    }

    #[test]
    fn test_strict_checks_nested_models() {
        let doc = json!({
            "name": "Helios-1E-lite",
            "n_qubits": 10,
            "simulator": {"type": "CoinflipSimulator", "bias": 0.3, "skew": 1},
            "run_constraints": {"priority": "high", "max_shots": 5}
        });
        assert!(HeliosEmulatorConfig::from_document(doc.clone()).is_ok());

        let err = HeliosEmulatorConfig::from_document_with(doc, &ResolveOptions::strict())
            .unwrap_err();
        assert!(err.mentions_field("simulator.skew"), "{err}");
        assert!(err.mentions_field("run_constraints.max_shots"), "{err}");
    }

    #[test]
    fn test_simulator_wrong_type_identifies_field() {
        let err = HeliosEmulatorConfig::from_document(json!({
            "name": "Helios-1E",
            "n_qubits": 10,
            "simulator": {"type": "MatrixProductStateSimulator", "chi": "wide"}
        }))
        .unwrap_err();
        assert!(err.mentions_field("simulator.chi"), "{err}");
    }
}
