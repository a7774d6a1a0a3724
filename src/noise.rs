//! Noise model schemas.
//!
//! - [`AerNoiseModel`]: a serialized qiskit-aer noise model (quantum and readout errors).
//! - [`CrosstalkParams`]: Aer crosstalk noise parameters.
//! - [`UserErrorParams`]: user overrides of hardware error rates for emulation.
//!
//! Maps keyed by tuples have no JSON object form, so they are encoded as
//! lists of `[key, value]` entries.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::backend_info::Register;
use crate::validate::{Issues, Validate, take_tag, unknown_variant, variant};

/// A single qiskit instruction inside a quantum error, tagged by `name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum QiskitInstruction {
    /// Identity.
    Id { qubits: Vec<u32> },
    /// Pauli X.
    X { qubits: Vec<u32> },
    /// Pauli Y.
    Y { qubits: Vec<u32> },
    /// Pauli Z.
    Z { qubits: Vec<u32> },
    /// Reset to |0>.
    Reset { qubits: Vec<u32> },
    /// Pauli string, e.g. `["XZ"]`.
    Pauli { params: Vec<String>, qubits: Vec<u32> },
    /// Kraus operators: a list of complex matrices, each entry a `[re, im]` pair.
    Kraus {
        params: Vec<Vec<Vec<Vec<f64>>>>,
        qubits: Vec<u32>,
    },
}

impl QiskitInstruction {
    /// Qubits this instruction acts on.
    pub fn qubits(&self) -> &[u32] {
        match self {
            Self::Id { qubits }
            | Self::X { qubits }
            | Self::Y { qubits }
            | Self::Z { qubits }
            | Self::Reset { qubits }
            | Self::Pauli { qubits, .. }
            | Self::Kraus { qubits, .. } => qubits,
        }
    }
}

#[derive(Deserialize)]
struct QubitsOnly {
    qubits: Vec<u32>,
}

#[derive(Deserialize)]
struct WithParams<P> {
    params: P,
    qubits: Vec<u32>,
}

const INSTRUCTION_NAMES: &[&str] = &["id", "x", "y", "z", "reset", "pauli", "kraus"];

impl<'de> Deserialize<'de> for QiskitInstruction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (name, body) = take_tag::<D::Error>(Value::deserialize(deserializer)?, "name")?;
        match name.as_str() {
            "id" => variant(body).map(|q: QubitsOnly| Self::Id { qubits: q.qubits }),
            "x" => variant(body).map(|q: QubitsOnly| Self::X { qubits: q.qubits }),
            "y" => variant(body).map(|q: QubitsOnly| Self::Y { qubits: q.qubits }),
            "z" => variant(body).map(|q: QubitsOnly| Self::Z { qubits: q.qubits }),
            "reset" => variant(body).map(|q: QubitsOnly| Self::Reset { qubits: q.qubits }),
            "pauli" => variant(body).map(|p: WithParams<Vec<String>>| Self::Pauli {
                params: p.params,
                qubits: p.qubits,
            }),
            "kraus" => variant(body).map(|p: WithParams<Vec<Vec<Vec<Vec<f64>>>>>| Self::Kraus {
                params: p.params,
                qubits: p.qubits,
            }),
            other => Err(unknown_variant("name", other, INSTRUCTION_NAMES)),
        }
    }
}

/// A noise-model error, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AerError {
    /// Quantum error channel.
    #[serde(rename = "qerror")]
    Quantum(AerQuantumError),
    /// Classical readout error.
    #[serde(rename = "roerror")]
    Readout(AerReadoutError),
}

impl<'de> Deserialize<'de> for AerError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (tag, body) = take_tag::<D::Error>(Value::deserialize(deserializer)?, "type")?;
        match tag.as_str() {
            "qerror" => variant(body).map(Self::Quantum),
            "roerror" => variant(body).map(Self::Readout),
            other => Err(unknown_variant("type", other, &["qerror", "roerror"])),
        }
    }
}

impl Validate for AerError {
    fn validate(&self, issues: &mut Issues) {
        match self {
            Self::Quantum(e) => e.validate(issues),
            Self::Readout(e) => e.validate(issues),
        }
    }
}

fn new_error_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Accept any UUID spelling and normalise it to a version-4 UUID in hex form.
fn normalize_error_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let parsed = Uuid::try_parse(&raw)
        .map_err(|e| serde::de::Error::custom(format!("id must be a UUID: {e}")))?;
    let v4 = uuid::Builder::from_random_bytes(*parsed.as_bytes()).into_uuid();
    Ok(v4.simple().to_string())
}

fn default_quantum_operations() -> Option<Vec<String>> {
    Some(Vec::new())
}

fn default_readout_operations() -> Option<Vec<String>> {
    Some(vec!["measure".into()])
}

/// qiskit-aer `QuantumError`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AerQuantumError {
    /// Version-4 UUID in hex form; generated when absent.
    #[serde(default = "new_error_id", deserialize_with = "normalize_error_id")]
    pub id: String,
    /// Gate names the error applies to.
    #[serde(default = "default_quantum_operations")]
    pub operations: Option<Vec<String>>,
    /// One instruction sequence per probability.
    pub instructions: Vec<Vec<QiskitInstruction>>,
    /// Probability of each instruction sequence.
    pub probabilities: Vec<f64>,
    /// Qubit sets the error applies to.
    pub gate_qubits: Vec<Vec<u32>>,
}

impl Validate for AerQuantumError {
    fn validate(&self, issues: &mut Issues) {
        issues.non_empty("probabilities", &self.probabilities);
    }
}

/// qiskit-aer `ReadoutError`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AerReadoutError {
    /// Operations the error applies to.
    #[serde(default = "default_readout_operations")]
    pub operations: Option<Vec<String>>,
    /// Assignment probability matrix.
    pub probabilities: Vec<Vec<f64>>,
    /// Qubit sets the error applies to.
    pub gate_qubits: Vec<Vec<u32>>,
}

impl Validate for AerReadoutError {
    fn validate(&self, issues: &mut Issues) {
        issues.non_empty("probabilities", &self.probabilities);
    }
}

/// qiskit-aer `NoiseModel`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AerNoiseModel {
    /// Errors making up the model.
    pub errors: Vec<AerError>,
}

impl Validate for AerNoiseModel {
    fn validate(&self, issues: &mut Issues) {
        issues.each("errors", &self.errors);
    }
}

/// Crosstalk noise parameters for Aer simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosstalkParams {
    /// ZZ crosstalk strength per qubit pair.
    pub zz_crosstalks: Vec<((Register, Register), f64)>,
    /// Single-qubit phase error per qubit.
    pub single_q_phase_errors: Vec<(Register, f64)>,
    /// Phase error induced on a spectator qubit by a two-qubit gate.
    pub two_q_induced_phase_errors: Vec<((Register, Register), (Register, f64))>,
    /// `(qubit, amplitude, frequency)` of non-Markovian noise.
    pub non_markovian_noise: Vec<(Register, f64, f64)>,
    /// Whether Z rotations are virtual.
    pub virtual_z: bool,
    /// Time-slice resolution.
    #[serde(rename = "N")]
    pub n: f64,
    /// Gate duration per `(gate name, qubits)`.
    pub gate_times: Vec<((String, Vec<Register>), f64)>,
    /// Phase damping per qubit.
    pub phase_damping_error: Vec<(Register, f64)>,
    /// Amplitude damping per qubit.
    pub amplitude_damping_error: Vec<(Register, f64)>,
}

/// Measurement error: one rate for both outcomes, or `(p(0->1), p(1->0))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasurementError {
    /// Same bit-flip probability for both outcomes.
    Symmetric(f64),
    /// Flip probability after measuring 0, then after measuring 1.
    Asymmetric(f64, f64),
}

/// User supplied error rates that override machine values when emulating
/// Quantinuum hardware. Unset fields keep the machine value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserErrorParams {
    // Physical noise
    /// Fault probability during a 1-qubit gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p1: Option<f64>,
    /// Fault probability during a 2-qubit gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p2: Option<f64>,
    /// Measurement bit-flip probability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_meas: Option<MeasurementError>,
    /// Fault probability during qubit initialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_init: Option<f64>,
    /// Crosstalk fault probability during measurement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_crosstalk_meas: Option<f64>,
    /// Crosstalk fault probability during initialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_crosstalk_init: Option<f64>,
    /// Fraction of `p1` that is spontaneous emission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p1_emission_ratio: Option<f64>,
    /// Fraction of `p2` that is spontaneous emission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p2_emission_ratio: Option<f64>,

    // Dephasing
    /// Quadratic dephasing rate for idling and transport.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quadratic_dephasing_rate: Option<f64>,
    /// Linear dephasing rate for idling and transport.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linear_dephasing_rate: Option<f64>,
    /// Scale applied when converting coherent to incoherent dephasing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coherent_to_incoherent_factor: Option<f64>,
    /// Model dephasing coherently.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coherent_dephasing: Option<bool>,
    /// Apply dephasing during transport.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_dephasing: Option<bool>,
    /// Apply dephasing while idling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_dephasing: Option<bool>,

    // Arbitrary-angle noise scaling
    /// Arbitrary-angle ZZ noise coefficient `a`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub przz_a: Option<f64>,
    /// Arbitrary-angle ZZ noise coefficient `b`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub przz_b: Option<f64>,
    /// Arbitrary-angle ZZ noise coefficient `c`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub przz_c: Option<f64>,
    /// Arbitrary-angle ZZ noise coefficient `d`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub przz_d: Option<f64>,
    /// Exponent of the arbitrary-angle noise curve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub przz_power: Option<f64>,

    // Scaling
    /// Scales every error rate linearly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Scale on 1-qubit gate errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p1_scale: Option<f64>,
    /// Scale on 2-qubit gate errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p2_scale: Option<f64>,
    /// Scale on measurement errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meas_scale: Option<f64>,
    /// Scale on initialization errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_scale: Option<f64>,
    /// Scale on memory errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_scale: Option<f64>,
    /// Scale on spontaneous emission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emission_scale: Option<f64>,
    /// Scale on crosstalk errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crosstalk_scale: Option<f64>,
    /// Scale on leakage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leakage_scale: Option<f64>,
}
