//! Configuration kind identifiers.
//!
//! A [`ConfigKind`] names one family of backend or simulator configuration.
//! Its string form is the discriminator carried in a serialized record's
//! `type` field, e.g. `"AerConfig"` or `"SeleneQuestConfig"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SchemaError;

/// Named family of backend/simulator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum ConfigKind {
    // ── Qiskit Aer ───────────────────────────────────────────────────
    /// Aer QASM simulator.
    Aer,
    /// Aer statevector simulator.
    AerState,
    /// Aer unitary simulator.
    AerUnitary,

    // ── Cloud providers ──────────────────────────────────────────────
    /// Amazon Braket devices and simulators.
    Braket,
    /// IBM quantum devices.
    Ibmq,
    /// Hosted emulator using an IBM device noise model.
    IbmqEmulator,

    // ── Other simulators ─────────────────────────────────────────────
    /// ProjectQ statevector simulator.
    ProjectQ,
    /// Qulacs simulator.
    Qulacs,

    // ── Quantinuum systems ───────────────────────────────────────────
    /// Quantinuum hardware and hosted emulators.
    Quantinuum,
    /// General-purpose emulator with noise toggles and cost limits.
    StandardEmulator,
    /// Helios hardware.
    Helios,
    /// Helios syntax checker.
    HeliosChecker,
    /// Helios emulator.
    HeliosEmulator,

    // ── Selene emulator ──────────────────────────────────────────────
    /// Selene with the QuEST statevector engine.
    SeleneQuest,
    /// Selene with the Stim stabilizer engine.
    SeleneStim,
    /// Selene with the Lean tensor-network engine.
    SeleneLean,
    /// Selene coin-flip engine.
    SeleneCoinflip,
    /// Selene classical replay engine.
    SeleneClassicalReplay,
}

impl ConfigKind {
    /// Every kind, in registry order.
    pub const ALL: [ConfigKind; 18] = [
        Self::Aer,
        Self::AerState,
        Self::AerUnitary,
        Self::Braket,
        Self::Ibmq,
        Self::IbmqEmulator,
        Self::ProjectQ,
        Self::Qulacs,
        Self::Quantinuum,
        Self::StandardEmulator,
        Self::Helios,
        Self::HeliosChecker,
        Self::HeliosEmulator,
        Self::SeleneQuest,
        Self::SeleneStim,
        Self::SeleneLean,
        Self::SeleneCoinflip,
        Self::SeleneClassicalReplay,
    ];

    /// The discriminator string for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aer => "AerConfig",
            Self::AerState => "AerStateConfig",
            Self::AerUnitary => "AerUnitaryConfig",
            Self::Braket => "BraketConfig",
            Self::Ibmq => "IBMQConfig",
            Self::IbmqEmulator => "IBMQEmulatorConfig",
            Self::ProjectQ => "ProjectQConfig",
            Self::Qulacs => "QulacsConfig",
            Self::Quantinuum => "QuantinuumConfig",
            Self::StandardEmulator => "StandardEmulatorConfig",
            Self::Helios => "HeliosConfig",
            Self::HeliosChecker => "HeliosCheckerConfig",
            Self::HeliosEmulator => "HeliosEmulatorConfig",
            Self::SeleneQuest => "SeleneQuestConfig",
            Self::SeleneStim => "SeleneStimConfig",
            Self::SeleneLean => "SeleneLeanConfig",
            Self::SeleneCoinflip => "SeleneCoinflipConfig",
            Self::SeleneClassicalReplay => "SeleneClassicalReplayConfig",
        }
    }

    /// Returns `true` for kinds that run on the Selene emulator.
    pub fn is_selene(self) -> bool {
        matches!(
            self,
            Self::SeleneQuest
                | Self::SeleneStim
                | Self::SeleneLean
                | Self::SeleneCoinflip
                | Self::SeleneClassicalReplay
        )
    }

    /// Closest kind name to `input`, if within a Damerau-Levenshtein distance of 3.
    pub fn suggest(input: &str) -> Option<&'static str> {
        Self::ALL
            .iter()
            .map(|k| (k.as_str(), strsim::damerau_levenshtein(input, k.as_str())))
            .filter(|(_, dist)| *dist <= 3)
            .min_by_key(|(_, dist)| *dist)
            .map(|(name, _)| name)
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownKind {
                kind: s.to_string(),
                suggestion: Self::suggest(s).map(str::to_string),
            })
    }
}

impl Serialize for ConfigKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConfigKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
