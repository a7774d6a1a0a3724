//! Backend Config Schemas — typed, validated configuration records for
//! quantum backends and simulators.
//!
//! A quantum execution platform receives configurations as untyped documents
//! (JSON or YAML) carrying a `type` discriminator. This crate turns such a
//! document into a strongly typed record, checking every field constraint on
//! the way, and serializes records back into the same wire form.
//!
//! # Overview
//!
//! The crate defines:
//! - [`ConfigKind`], the closed set of configuration families
//! - One record type per kind ([`AerConfig`], [`QuantinuumConfig`],
//!   [`SeleneQuestConfig`], ...) implementing [`ConfigRecord`]
//! - [`BackendConfig`], the tagged union of every record
//! - [`Registry`], the name-to-type lookup used for discriminated construction
//! - [`SchemaError`], with per-field issues for validation failures
//! - Standalone schemas: [`HyperTketConfig`], [`StoredBackendInfo`], [`QSysResult`]
//!
//! # Resolution
//!
//! ```text
//!   resolve(kind, document) ──→ Registry::lookup ──→ deserialize ──→ validate ──→ BackendConfig
//!                                     │                  │              │
//!                                     └ UnknownKind      └ Validation ──┘
//! ```
//!
//! ```
//! use backend_config_schemas::{BackendConfig, resolve};
//! use serde_json::json;
//!
//! let config = resolve("AerConfig", json!({"n_qubits": 12})).unwrap();
//! assert!(matches!(config, BackendConfig::Aer(ref aer) if aer.n_qubits == 12));
//!
//! let err = resolve("NotAConfig", json!({})).unwrap_err();
//! assert!(err.is_unknown_kind());
//! ```
//!
//! # Compatibility
//!
//! Serialized records are versioned by [`SCHEMA_VERSION`]. Adding an optional
//! field is a compatible change; renaming or removing a field, or changing a
//! default, is breaking. Unknown fields are ignored by default so older
//! readers accept newer documents (see [`ResolveOptions`]).

pub mod backend_info;
pub mod config;
pub mod emulator;
pub mod error;
pub mod hypertket;
pub mod kind;
pub mod noise;
pub mod options;
pub mod registry;
pub mod result;
pub mod validate;

pub use backend_info::{Register, StoredBackendInfo, StoredDevice, StoredEdge, StoredNode};
pub use config::{
    AerConfig, AerStateConfig, AerUnitaryConfig, BackendConfig, BraketConfig, ConfigRecord,
    HeliosCheckerConfig, HeliosConfig, HeliosEmulatorConfig, IbmqConfig, IbmqEmulatorConfig,
    ProjectQConfig, QuantinuumCompilerOptions, QuantinuumConfig, QulacsConfig, RunConstraints,
    SeleneClassicalReplayConfig, SeleneCoinflipConfig, SeleneLeanConfig, SeleneQuestConfig,
    SeleneStimConfig, SimulatorType, StandardEmulatorConfig,
};
pub use emulator::{ErrorModel, Runtime, Simulator};
pub use error::{FieldIssue, SchemaError, SchemaResult};
pub use hypertket::HyperTketConfig;
pub use kind::ConfigKind;
pub use options::{ResolveOptions, UnknownFields};
pub use registry::{Registry, resolve};
pub use result::QSysResult;
pub use validate::{Issues, Validate};

/// Version of the serialized schema, equal to the crate version.
pub const SCHEMA_VERSION: &str = env!("CARGO_PKG_VERSION");
