//! Emulator building blocks shared by the Selene and Helios configurations.
//!
//! Runtimes, error models and simulators are each tagged unions discriminated
//! by a `type` field, so a serialized configuration always records which
//! variant it holds:
//!
//! ```text
//! {"type": "DepolarizingErrorModel", "p_1q": 0.001}
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::validate::{Issues, Validate, take_tag, unknown_variant, variant};

/// Body of a variant that carries only a seed.
#[derive(Deserialize)]
struct SeedOnly {
    #[serde(default)]
    seed: Option<i64>,
}

// ── Runtimes ─────────────────────────────────────────────────────────

/// Runtime model for the Selene emulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Runtime {
    /// Does not emulate the runtime of any specific system.
    #[serde(rename = "SimpleRuntime")]
    Simple {
        /// Random seed for the runtime.
        #[serde(skip_serializing_if = "Option::is_none")]
        seed: Option<i64>,
    },
    /// Emulates the Helios system, including ion transport.
    #[serde(rename = "HeliosRuntime")]
    Helios {
        /// Random seed for the runtime.
        #[serde(skip_serializing_if = "Option::is_none")]
        seed: Option<i64>,
    },
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (tag, body) = take_tag::<D::Error>(Value::deserialize(deserializer)?, "type")?;
        match tag.as_str() {
            "SimpleRuntime" => variant(body).map(|s: SeedOnly| Self::Simple { seed: s.seed }),
            "HeliosRuntime" => variant(body).map(|s: SeedOnly| Self::Helios { seed: s.seed }),
            other => Err(unknown_variant("type", other, &["SimpleRuntime", "HeliosRuntime"])),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::Simple { seed: None }
    }
}

// ── Error models ─────────────────────────────────────────────────────

/// Depolarizing noise on every operation class.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DepolarizingErrorModel {
    /// Random seed for the error model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Error probability for single-qubit gates.
    pub p_1q: f64,
    /// Error probability for two-qubit gates.
    pub p_2q: f64,
    /// Error probability for measurement.
    pub p_meas: f64,
    /// Error probability for initialization.
    pub p_init: f64,
}

impl Validate for DepolarizingErrorModel {
    fn validate(&self, issues: &mut Issues) {
        issues.probability("p_1q", self.p_1q);
        issues.probability("p_2q", self.p_2q);
        issues.probability("p_meas", self.p_meas);
        issues.probability("p_init", self.p_init);
    }
}

fn default_qsystem_name() -> String {
    "alpha".into()
}

/// Error model of a specific Quantinuum system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QSystemErrorModel {
    /// Random seed for the error model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Name of the system error model.
    #[serde(default = "default_qsystem_name")]
    pub name: String,
}

impl Default for QSystemErrorModel {
    fn default() -> Self {
        Self {
            seed: None,
            name: default_qsystem_name(),
        }
    }
}

/// Error model applied by the emulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ErrorModel {
    /// Ideal execution, no errors.
    #[serde(rename = "NoErrorModel")]
    NoError {
        /// Random seed for the error model.
        #[serde(skip_serializing_if = "Option::is_none")]
        seed: Option<i64>,
    },
    /// Depolarizing noise.
    #[serde(rename = "DepolarizingErrorModel")]
    Depolarizing(DepolarizingErrorModel),
    /// System-specific noise.
    #[serde(rename = "QSystemErrorModel")]
    QSystem(QSystemErrorModel),
}

impl ErrorModel {
    /// Ideal model with no seed.
    pub fn none() -> Self {
        Self::NoError { seed: None }
    }

    /// Discriminator string of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::NoError { .. } => "NoErrorModel",
            Self::Depolarizing(_) => "DepolarizingErrorModel",
            Self::QSystem(_) => "QSystemErrorModel",
        }
    }

    /// Seed, whichever variant holds it.
    pub fn seed(&self) -> Option<i64> {
        match self {
            Self::NoError { seed } => *seed,
            Self::Depolarizing(m) => m.seed,
            Self::QSystem(m) => m.seed,
        }
    }
}

impl<'de> Deserialize<'de> for ErrorModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (tag, body) = take_tag::<D::Error>(Value::deserialize(deserializer)?, "type")?;
        match tag.as_str() {
            "NoErrorModel" => variant(body).map(|s: SeedOnly| Self::NoError { seed: s.seed }),
            "DepolarizingErrorModel" => variant(body).map(Self::Depolarizing),
            "QSystemErrorModel" => variant(body).map(Self::QSystem),
            other => Err(unknown_variant(
                "type",
                other,
                &["NoErrorModel", "DepolarizingErrorModel", "QSystemErrorModel"],
            )),
        }
    }
}

impl Default for ErrorModel {
    fn default() -> Self {
        Self::none()
    }
}

impl Validate for ErrorModel {
    fn validate(&self, issues: &mut Issues) {
        if let Self::Depolarizing(model) = self {
            model.validate(issues);
        }
    }
}

// ── Tensor-network settings ──────────────────────────────────────────

/// Classical compute backend for tensor-network simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeBackend {
    #[default]
    Cpu,
    Cuda,
}

/// Floating point precision of tensor calculations. Serialized as `32` or `64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Precision {
    #[default]
    Single,
    Double,
}

impl TryFrom<u8> for Precision {
    type Error = String;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            32 => Ok(Self::Single),
            64 => Ok(Self::Double),
            other => Err(format!("precision must be 32 or 64, got {other}")),
        }
    }
}

impl From<Precision> for u8 {
    fn from(precision: Precision) -> Self {
        match precision {
            Precision::Single => 32,
            Precision::Double => 64,
        }
    }
}

/// Largest bond dimension the CPU backend supports.
pub const CPU_MAX_CHI: u32 = 256;

/// Checks shared by every tensor-network configuration.
pub(crate) fn validate_tensor_network(
    issues: &mut Issues,
    backend: ComputeBackend,
    chi: Option<u32>,
    truncation_fidelity: Option<f64>,
    zero_threshold: Option<f64>,
) {
    if let Some(chi) = chi {
        issues.greater_than("chi", chi, 0);
    }
    if let Some(fidelity) = truncation_fidelity {
        issues.greater_than("truncation_fidelity", fidelity, 0.0);
        issues.at_most("truncation_fidelity", fidelity, 1.0);
    }
    if let Some(threshold) = zero_threshold {
        issues.greater_than("zero_threshold", threshold, 0.0);
        issues.at_most("zero_threshold", threshold, 1.0);
    }
    if backend == ComputeBackend::Cpu && chi.is_some_and(|c| c > CPU_MAX_CHI) {
        issues.model(format!("CPU backend does not support chi > {CPU_MAX_CHI}"));
    }
    if chi.is_some_and(|c| c != 0) && truncation_fidelity.is_some_and(|f| f != 0.0) {
        issues.model("cannot set both chi and truncation_fidelity");
    }
}

fn default_angle_threshold() -> f64 {
    1e-8
}

fn default_bias() -> f64 {
    0.5
}

// ── Simulators ───────────────────────────────────────────────────────

/// Stabilizer simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilizerSimulator {
    /// Random seed for the simulation engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// How far angles may stray from multiples of pi/2 before they are rejected.
    #[serde(default = "default_angle_threshold")]
    pub angle_threshold: f64,
}

impl Default for StabilizerSimulator {
    fn default() -> Self {
        Self {
            seed: None,
            angle_threshold: default_angle_threshold(),
        }
    }
}

impl Validate for StabilizerSimulator {
    fn validate(&self, issues: &mut Issues) {
        issues.greater_than("angle_threshold", self.angle_threshold, 0.0);
    }
}

/// Matrix product state simulation settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixProductStateSimulator {
    /// Random seed for the simulation engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Classical compute backend.
    pub backend: ComputeBackend,
    /// Floating point precision.
    pub precision: Precision,
    /// Maximum virtual bond dimension; unbounded when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chi: Option<u32>,
    /// Minimum fidelity kept when truncating bonds after two-qubit gates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation_fidelity: Option<f64>,
    /// Singular values below this are truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_threshold: Option<f64>,
}

impl Validate for MatrixProductStateSimulator {
    fn validate(&self, issues: &mut Issues) {
        validate_tensor_network(
            issues,
            self.backend,
            self.chi,
            self.truncation_fidelity,
            self.zero_threshold,
        );
    }
}

/// Coin-flip simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinflipSimulator {
    /// Random seed for the simulation engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Probability that any measurement returns true.
    #[serde(default = "default_bias")]
    pub bias: f64,
}

impl Default for CoinflipSimulator {
    fn default() -> Self {
        Self {
            seed: None,
            bias: default_bias(),
        }
    }
}

impl Validate for CoinflipSimulator {
    fn validate(&self, issues: &mut Issues) {
        issues.probability("bias", self.bias);
    }
}

/// Classical replay settings: predefined measurement results per shot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassicalReplaySimulator {
    /// Random seed for the simulation engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// One list of measurement outcomes per shot.
    pub measurements: Vec<Vec<bool>>,
}

/// Simulation engine for a Helios emulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Simulator {
    /// Statevector simulation.
    #[serde(rename = "StatevectorSimulator")]
    Statevector {
        /// Random seed for the simulation engine.
        #[serde(skip_serializing_if = "Option::is_none")]
        seed: Option<i64>,
    },
    /// Stabilizer simulation.
    #[serde(rename = "StabilizerSimulator")]
    Stabilizer(StabilizerSimulator),
    /// Matrix product state simulation.
    #[serde(rename = "MatrixProductStateSimulator")]
    MatrixProductState(MatrixProductStateSimulator),
    /// Random measurement outcomes.
    #[serde(rename = "CoinflipSimulator")]
    Coinflip(CoinflipSimulator),
    /// Predefined measurement outcomes.
    #[serde(rename = "ClassicalReplaySimulator")]
    ClassicalReplay(ClassicalReplaySimulator),
}

impl Simulator {
    /// Discriminator string of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Statevector { .. } => "StatevectorSimulator",
            Self::Stabilizer(_) => "StabilizerSimulator",
            Self::MatrixProductState(_) => "MatrixProductStateSimulator",
            Self::Coinflip(_) => "CoinflipSimulator",
            Self::ClassicalReplay(_) => "ClassicalReplaySimulator",
        }
    }

    /// Seed, whichever variant holds it.
    pub fn seed(&self) -> Option<i64> {
        match self {
            Self::Statevector { seed } => *seed,
            Self::Stabilizer(s) => s.seed,
            Self::MatrixProductState(s) => s.seed,
            Self::Coinflip(s) => s.seed,
            Self::ClassicalReplay(s) => s.seed,
        }
    }
}

const SIMULATOR_TYPES: &[&str] = &[
    "StatevectorSimulator",
    "StabilizerSimulator",
    "MatrixProductStateSimulator",
    "CoinflipSimulator",
    "ClassicalReplaySimulator",
];

impl<'de> Deserialize<'de> for Simulator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (tag, body) = take_tag::<D::Error>(Value::deserialize(deserializer)?, "type")?;
        match tag.as_str() {
            "StatevectorSimulator" => {
                variant(body).map(|s: SeedOnly| Self::Statevector { seed: s.seed })
            }
            "StabilizerSimulator" => variant(body).map(Self::Stabilizer),
            "MatrixProductStateSimulator" => variant(body).map(Self::MatrixProductState),
            "CoinflipSimulator" => variant(body).map(Self::Coinflip),
            "ClassicalReplaySimulator" => variant(body).map(Self::ClassicalReplay),
            other => Err(unknown_variant("type", other, SIMULATOR_TYPES)),
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::Statevector { seed: None }
    }
}

impl Validate for Simulator {
    fn validate(&self, issues: &mut Issues) {
        match self {
            Self::Stabilizer(s) => s.validate(issues),
            Self::MatrixProductState(s) => s.validate(issues),
            Self::Coinflip(s) => s.validate(issues),
            Self::Statevector { .. } | Self::ClassicalReplay(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_runtime_discriminated_by_type() {
        let runtime: Runtime = serde_json::from_value(json!({"type": "HeliosRuntime"})).unwrap();
        assert_eq!(runtime, Runtime::Helios { seed: None });
        assert_eq!(
            serde_json::to_value(Runtime::default()).unwrap(),
            json!({"type": "SimpleRuntime"})
        );
    }

    #[test]
    fn test_error_model_defaults() {
        let model: ErrorModel =
            serde_json::from_value(json!({"type": "QSystemErrorModel"})).unwrap();
        assert_eq!(model, ErrorModel::QSystem(QSystemErrorModel::default()));
        assert_eq!(model.type_name(), "QSystemErrorModel");

        let model: ErrorModel =
            serde_json::from_value(json!({"type": "DepolarizingErrorModel", "p_2q": 0.01, "seed": 3}))
                .unwrap();
        assert_eq!(model.seed(), Some(3));
        match model {
            ErrorModel::Depolarizing(m) => {
                assert_eq!(m.p_1q, 0.0);
                assert_eq!(m.p_2q, 0.01);
            }
            other => panic!("expected depolarizing model, got {other:?}"),
        }
    }

    #[test]
    fn test_depolarizing_probabilities_bounded() {
        let model = ErrorModel::Depolarizing(DepolarizingErrorModel {
            p_meas: 1.5,
            ..Default::default()
        });
        let err = Issues::check("ErrorModel", &model).unwrap_err();
        assert!(err.mentions_field("p_meas"));
        assert_eq!(err.issues().len(), 1);
    }

    #[test]
    fn test_precision_serialized_as_bits() {
        assert_eq!(serde_json::to_value(Precision::Double).unwrap(), json!(64));
        assert_eq!(serde_json::from_value::<Precision>(json!(32)).unwrap(), Precision::Single);
        assert!(serde_json::from_value::<Precision>(json!(16)).is_err());
    }

    #[test]
    fn test_tensor_network_rules() {
        let sim = MatrixProductStateSimulator {
            chi: Some(512),
            ..Default::default()
        };
        let err = Issues::check("MatrixProductStateSimulator", &sim).unwrap_err();
        assert!(err.to_string().contains("CPU backend does not support chi > 256"));

        let sim = MatrixProductStateSimulator {
            backend: ComputeBackend::Cuda,
            chi: Some(512),
            ..Default::default()
        };
        assert!(Issues::check("MatrixProductStateSimulator", &sim).is_ok());

        let sim = MatrixProductStateSimulator {
            chi: Some(16),
            truncation_fidelity: Some(0.99),
            ..Default::default()
        };
        let err = Issues::check("MatrixProductStateSimulator", &sim).unwrap_err();
        assert!(err.to_string().contains("cannot set both chi and truncation_fidelity"));

        let sim = MatrixProductStateSimulator {
            zero_threshold: Some(0.0),
            ..Default::default()
        };
        let err = Issues::check("MatrixProductStateSimulator", &sim).unwrap_err();
        assert!(err.mentions_field("zero_threshold"));
    }

    #[test]
    fn test_simulator_variants() {
        let sim: Simulator =
            serde_json::from_value(json!({"type": "CoinflipSimulator", "bias": 2.0})).unwrap();
        assert_eq!(sim.type_name(), "CoinflipSimulator");
        assert!(Issues::check("Simulator", &sim).unwrap_err().mentions_field("bias"));

        let sim: Simulator = serde_json::from_value(json!({"type": "StabilizerSimulator"})).unwrap();
        assert_eq!(sim, Simulator::Stabilizer(StabilizerSimulator::default()));

        assert!(serde_json::from_value::<Simulator>(json!({"type": "Quantum"})).is_err());
    }

    #[test]
    fn test_union_errors_point_at_inner_field() {
        let err = crate::validate::deserialize_tracked::<ErrorModel>(
            "ErrorModel",
            json!({"type": "DepolarizingErrorModel", "p_1q": "abc"}),
        )
        .unwrap_err();
        assert!(err.mentions_field("p_1q"), "{err}");

        let err = crate::validate::deserialize_tracked::<Simulator>(
            "Simulator",
            json!({"type": "MatrixProductStateSimulator", "precision": 16}),
        )
        .unwrap_err();
        assert!(err.mentions_field("precision"), "{err}");

        let err = crate::validate::deserialize_tracked::<Runtime>("Runtime", json!({"seed": 1}))
            .unwrap_err();
        assert!(err.mentions_field("type"), "{err}");
    }
}
