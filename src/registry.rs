//! Name-to-type lookup for configuration kinds.
//!
//! The registry turns an untyped document plus a kind name into a typed,
//! validated [`BackendConfig`]:
//!
//! ```text
//!   resolve("AerConfig", doc) ──→ lookup ──→ AerConfig::from_document_with ──→ BackendConfig::Aer
//!                                   │
//!                                   └── unknown ──→ SchemaError::UnknownKind
//! ```
//!
//! [`Registry::global`] is built once, on first use, with options taken from
//! the environment (see [`ResolveOptions::from_env`]).

use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::config::*;
use crate::error::{SchemaError, SchemaResult};
use crate::kind::ConfigKind;
use crate::options::ResolveOptions;

type BuildFn = fn(Value, &ResolveOptions) -> SchemaResult<BackendConfig>;

#[derive(Clone, Copy)]
struct Entry {
    kind: ConfigKind,
    fields: &'static [&'static str],
    build: BuildFn,
}

fn build<R: ConfigRecord>(document: Value, options: &ResolveOptions) -> SchemaResult<BackendConfig> {
    R::from_document_with(document, options).map(Into::into)
}

fn entry<R: ConfigRecord>() -> Entry {
    Entry {
        kind: R::KIND,
        fields: R::FIELDS,
        build: build::<R>,
    }
}

fn unknown_kind(name: &str) -> SchemaError {
    SchemaError::UnknownKind {
        kind: name.to_string(),
        suggestion: ConfigKind::suggest(name).map(str::to_string),
    }
}

/// Lookup table from kind name to record type.
pub struct Registry {
    entries: FxHashMap<&'static str, Entry>,
    options: ResolveOptions,
}

static GLOBAL: LazyLock<Registry> =
    LazyLock::new(|| Registry::standard().with_options(ResolveOptions::from_env()));

impl Registry {
    /// Every known configuration kind, with default options.
    pub fn standard() -> Self {
        let entries = [
            entry::<AerConfig>(),
            entry::<AerStateConfig>(),
            entry::<AerUnitaryConfig>(),
            entry::<BraketConfig>(),
            entry::<IbmqConfig>(),
            entry::<IbmqEmulatorConfig>(),
            entry::<ProjectQConfig>(),
            entry::<QulacsConfig>(),
            entry::<QuantinuumConfig>(),
            entry::<StandardEmulatorConfig>(),
            entry::<HeliosConfig>(),
            entry::<HeliosCheckerConfig>(),
            entry::<HeliosEmulatorConfig>(),
            entry::<SeleneQuestConfig>(),
            entry::<SeleneStimConfig>(),
            entry::<SeleneLeanConfig>(),
            entry::<SeleneCoinflipConfig>(),
            entry::<SeleneClassicalReplayConfig>(),
        ];

        Self {
            entries: entries.into_iter().map(|e| (e.kind.as_str(), e)).collect(),
            options: ResolveOptions::default(),
        }
    }

    /// Shared registry, initialized on first use.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Replace the resolution options.
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Options applied to every resolution.
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Look up a kind by name.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownKind`] if no record type is registered under
    /// `name`, with the closest known name as a suggestion.
    pub fn lookup(&self, name: &str) -> SchemaResult<ConfigKind> {
        self.entries
            .get(name)
            .map(|e| e.kind)
            .ok_or_else(|| unknown_kind(name))
    }

    /// Returns `true` if `name` is a registered kind.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered kinds in declaration order.
    pub fn kinds(&self) -> Vec<ConfigKind> {
        ConfigKind::ALL
            .into_iter()
            .filter(|k| self.entries.contains_key(k.as_str()))
            .collect()
    }

    /// Declared field names of `kind`, excluding `type`.
    pub fn fields(&self, kind: ConfigKind) -> &'static [&'static str] {
        self.entries.get(kind.as_str()).map_or(&[], |e| e.fields)
    }

    /// Build and validate the record for `name` from `document`.
    pub fn resolve(&self, name: &str, document: Value) -> SchemaResult<BackendConfig> {
        let Some(entry) = self.entries.get(name) else {
            tracing::debug!(kind = name, "unknown configuration kind");
            return Err(unknown_kind(name));
        };
        tracing::debug!(kind = name, "resolving configuration");
        (entry.build)(document, &self.options)
    }

    /// Parse JSON text and resolve it as `name`.
    pub fn resolve_json(&self, name: &str, text: &str) -> SchemaResult<BackendConfig> {
        self.resolve(name, serde_json::from_str(text)?)
    }

    /// Parse YAML text and resolve it as `name`.
    pub fn resolve_yaml(&self, name: &str, text: &str) -> SchemaResult<BackendConfig> {
        self.resolve(name, serde_yaml::from_str(text)?)
    }

    /// Resolve a document by its own `type` field.
    pub fn resolve_tagged(&self, document: Value) -> SchemaResult<BackendConfig> {
        let name = match document.get(TYPE_FIELD) {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(SchemaError::invalid(
                    "BackendConfig",
                    TYPE_FIELD,
                    format!("expected a string, got {}", json_type_name(other)),
                ));
            }
            None => {
                return Err(SchemaError::invalid(
                    "BackendConfig",
                    TYPE_FIELD,
                    "field required",
                ));
            }
        };
        self.resolve(&name, document)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds())
            .field("options", &self.options)
            .finish()
    }
}

/// Resolve `document` as `kind` using the global registry.
pub fn resolve(kind: &str, document: Value) -> SchemaResult<BackendConfig> {
    Registry::global().resolve(kind, document)
}
