//! Backend configuration records.
//!
//! Every configuration kind has one record type implementing [`ConfigRecord`].
//! [`BackendConfig`] is the tagged union of all of them, discriminated by the
//! `type` field:
//!
//! ```text
//!   {"type": "AerConfig", "n_qubits": 20}
//!        │
//!        ├── Registry::resolve ──→ AerConfig::from_document ──→ BackendConfig::Aer
//!        │                          (deserialize, validate)
//!        └── unknown type ──→ SchemaError::UnknownKind
//! ```
//!
//! Records are plain values. A record built through [`ConfigRecord::from_document`]
//! or the registry always satisfies its field constraints; a record built in
//! code can be checked with [`ConfigRecord::validated`].

pub mod cloud;
pub mod helios;
pub mod local;
pub mod quantinuum;
pub mod selene;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};
use crate::kind::ConfigKind;
use crate::options::{ResolveOptions, UnknownFields};
use crate::registry::Registry;
use crate::validate::{Issues, Validate, deserialize_tracked, undeclared_keys};

pub use cloud::{BraketConfig, IbmqConfig, IbmqEmulatorConfig};
pub use helios::{HeliosCheckerConfig, HeliosConfig, HeliosEmulatorConfig, RunConstraints};
pub use local::{AerConfig, AerStateConfig, AerUnitaryConfig, ProjectQConfig, QulacsConfig};
pub use quantinuum::{QuantinuumCompilerOptions, QuantinuumConfig, SimulatorType, StandardEmulatorConfig};
pub use selene::{
    SeleneClassicalReplayConfig, SeleneCoinflipConfig, SeleneLeanConfig, SeleneQuestConfig,
    SeleneStimConfig,
};

/// Name of the discriminator field.
pub const TYPE_FIELD: &str = "type";

/// A validated configuration record for one [`ConfigKind`].
pub trait ConfigRecord: Serialize + DeserializeOwned + Validate + Into<BackendConfig> {
    /// Kind this record belongs to.
    const KIND: ConfigKind;

    /// Declared field names, excluding `type`.
    const FIELDS: &'static [&'static str];

    /// Build a record from an untyped document with default options.
    fn from_document(document: Value) -> SchemaResult<Self> {
        Self::from_document_with(document, &ResolveOptions::default())
    }

    /// Build a record from an untyped document.
    ///
    /// The document must be a mapping. A `type` key, if present, must name
    /// this record's kind. Absent optional fields take their defaults.
    /// Undeclared keys, at any depth, are handled per `options`.
    fn from_document_with(document: Value, options: &ResolveOptions) -> SchemaResult<Self> {
        let kind = Self::KIND.as_str();
        let Value::Object(map) = document else {
            return Err(SchemaError::invalid(
                kind,
                "",
                format!("expected a mapping, got {}", json_type_name(&document)),
            ));
        };

        if let Some(tag) = map.get(TYPE_FIELD) {
            if tag.as_str() != Some(kind) {
                return Err(SchemaError::invalid(
                    kind,
                    TYPE_FIELD,
                    format!("expected '{kind}', got {tag}"),
                ));
            }
        }

        let document = Value::Object(map);
        let given = (options.unknown_fields != UnknownFields::Ignore).then(|| document.clone());
        let record: Self = deserialize_tracked(kind, document)?;

        if let Some(given) = given {
            let unknown = undeclared_keys(&given, &record.to_serializable()?);
            if !unknown.is_empty() {
                if options.unknown_fields == UnknownFields::Reject {
                    return Err(SchemaError::UnknownFields {
                        kind: kind.to_string(),
                        fields: unknown,
                    });
                }
                tracing::warn!(kind, fields = ?unknown, "ignoring unknown configuration fields");
            }
        }

        Issues::check(kind, &record)?;
        Ok(record)
    }

    /// Check field constraints on a record built in code.
    fn validated(self) -> SchemaResult<Self> {
        Issues::check(Self::KIND.as_str(), &self)?;
        Ok(self)
    }

    /// Serializable form including the `type` discriminator; unset optional
    /// fields are omitted.
    fn to_serializable(&self) -> SchemaResult<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.insert(TYPE_FIELD.into(), Value::String(Self::KIND.as_str().into()));
        }
        Ok(value)
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Any backend configuration, discriminated by `type`.
///
/// Deserializing a `BackendConfig` goes through the global [`Registry`], so
/// the result is always validated. Undeclared keys are handled by the global
/// registry's policy, which is read from `BACKEND_SCHEMAS_UNKNOWN_FIELDS`
/// (see [`ResolveOptions::from_env`]). Use [`Registry::resolve_tagged`] on a
/// registry built with explicit options to pin the policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
#[non_exhaustive]
pub enum BackendConfig {
    #[serde(rename = "AerConfig")]
    Aer(AerConfig),
    #[serde(rename = "AerStateConfig")]
    AerState(AerStateConfig),
    #[serde(rename = "AerUnitaryConfig")]
    AerUnitary(AerUnitaryConfig),
    #[serde(rename = "BraketConfig")]
    Braket(BraketConfig),
    #[serde(rename = "IBMQConfig")]
    Ibmq(IbmqConfig),
    #[serde(rename = "IBMQEmulatorConfig")]
    IbmqEmulator(IbmqEmulatorConfig),
    #[serde(rename = "ProjectQConfig")]
    ProjectQ(ProjectQConfig),
    #[serde(rename = "QulacsConfig")]
    Qulacs(QulacsConfig),
    #[serde(rename = "QuantinuumConfig")]
    Quantinuum(QuantinuumConfig),
    #[serde(rename = "StandardEmulatorConfig")]
    StandardEmulator(StandardEmulatorConfig),
    #[serde(rename = "HeliosConfig")]
    Helios(HeliosConfig),
    #[serde(rename = "HeliosCheckerConfig")]
    HeliosChecker(HeliosCheckerConfig),
    #[serde(rename = "HeliosEmulatorConfig")]
    HeliosEmulator(HeliosEmulatorConfig),
    #[serde(rename = "SeleneQuestConfig")]
    SeleneQuest(SeleneQuestConfig),
    #[serde(rename = "SeleneStimConfig")]
    SeleneStim(SeleneStimConfig),
    #[serde(rename = "SeleneLeanConfig")]
    SeleneLean(SeleneLeanConfig),
    #[serde(rename = "SeleneCoinflipConfig")]
    SeleneCoinflip(SeleneCoinflipConfig),
    #[serde(rename = "SeleneClassicalReplayConfig")]
    SeleneClassicalReplay(SeleneClassicalReplayConfig),
}

impl BackendConfig {
    /// Kind of the contained record.
    pub fn kind(&self) -> ConfigKind {
        match self {
            Self::Aer(_) => ConfigKind::Aer,
            Self::AerState(_) => ConfigKind::AerState,
            Self::AerUnitary(_) => ConfigKind::AerUnitary,
            Self::Braket(_) => ConfigKind::Braket,
            Self::Ibmq(_) => ConfigKind::Ibmq,
            Self::IbmqEmulator(_) => ConfigKind::IbmqEmulator,
            Self::ProjectQ(_) => ConfigKind::ProjectQ,
            Self::Qulacs(_) => ConfigKind::Qulacs,
            Self::Quantinuum(_) => ConfigKind::Quantinuum,
            Self::StandardEmulator(_) => ConfigKind::StandardEmulator,
            Self::Helios(_) => ConfigKind::Helios,
            Self::HeliosChecker(_) => ConfigKind::HeliosChecker,
            Self::HeliosEmulator(_) => ConfigKind::HeliosEmulator,
            Self::SeleneQuest(_) => ConfigKind::SeleneQuest,
            Self::SeleneStim(_) => ConfigKind::SeleneStim,
            Self::SeleneLean(_) => ConfigKind::SeleneLean,
            Self::SeleneCoinflip(_) => ConfigKind::SeleneCoinflip,
            Self::SeleneClassicalReplay(_) => ConfigKind::SeleneClassicalReplay,
        }
    }

    /// Resolve a document by its own `type` field using the global registry
    /// and its environment-derived options.
    pub fn from_value(document: Value) -> SchemaResult<Self> {
        Registry::global().resolve_tagged(document)
    }

    /// Parse JSON text and resolve it by its `type` field.
    pub fn from_json(text: &str) -> SchemaResult<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Parse YAML text and resolve it by its `type` field.
    pub fn from_yaml(text: &str) -> SchemaResult<Self> {
        Self::from_value(serde_yaml::from_str(text)?)
    }

    /// Serializable form including `type`; unset optional fields are omitted.
    pub fn to_serializable(&self) -> SchemaResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// JSON text of [`to_serializable`](Self::to_serializable).
    pub fn to_json(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<'de> Deserialize<'de> for BackendConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = Value::deserialize(deserializer)?;
        Self::from_value(document).map_err(serde::de::Error::custom)
    }
}

macro_rules! impl_into_backend_config {
    ($($record:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$record> for BackendConfig {
                fn from(record: $record) -> Self {
                    Self::$variant(record)
                }
            }
        )*
    };
}

impl_into_backend_config! {
    AerConfig => Aer,
    AerStateConfig => AerState,
    AerUnitaryConfig => AerUnitary,
    BraketConfig => Braket,
    IbmqConfig => Ibmq,
    IbmqEmulatorConfig => IbmqEmulator,
    ProjectQConfig => ProjectQ,
    QulacsConfig => Qulacs,
    QuantinuumConfig => Quantinuum,
    StandardEmulatorConfig => StandardEmulator,
    HeliosConfig => Helios,
    HeliosCheckerConfig => HeliosChecker,
    HeliosEmulatorConfig => HeliosEmulator,
    SeleneQuestConfig => SeleneQuest,
    SeleneStimConfig => SeleneStim,
    SeleneLeanConfig => SeleneLean,
    SeleneCoinflipConfig => SeleneCoinflip,
    SeleneClassicalReplayConfig => SeleneClassicalReplay,
}
