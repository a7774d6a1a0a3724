//! Schema error types.
//!
//! Errors fall into two groups:
//!
//! | Category | Variants | Caller action |
//! |----------|----------|---------------|
//! | **Lookup** | `UnknownKind` | Fix the kind name |
//! | **Document** | `Validation`, `UnknownFields`, `Json`, `Yaml` | Fix the document |
//!
//! No error is retried or recovered internally; every failure is reported as-is.

use std::fmt;

use thiserror::Error;

/// A single field that failed validation.
///
/// `field` is a dotted path into the document (`noise_model.errors[0].probabilities`).
/// An empty path refers to the document itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Path of the offending field.
    pub field: String,
    /// Why the value was rejected.
    pub reason: String,
}

impl FieldIssue {
    /// Create a new field issue.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "<document>: {}", self.reason)
        } else {
            write!(f, "{}: {}", self.field, self.reason)
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn did_you_mean(suggestion: Option<&str>) -> String {
    suggestion
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default()
}

/// Errors raised while resolving or validating a configuration document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    // ── Lookup ───────────────────────────────────────────────────────
    /// The kind name is not present in the registry.
    #[error("unknown configuration kind '{kind}'{}", did_you_mean(.suggestion.as_deref()))]
    UnknownKind {
        /// The name that was looked up.
        kind: String,
        /// Closest registered kind, if any is near enough.
        suggestion: Option<String>,
    },

    // ── Document ─────────────────────────────────────────────────────
    /// One or more fields are missing, mistyped, or out of range.
    #[error("validation error for {kind}: {}", join_issues(.issues))]
    Validation {
        /// Kind (or model) being constructed.
        kind: String,
        /// Every issue found, in document order where possible.
        issues: Vec<FieldIssue>,
    },

    /// The document has fields the record does not declare and the
    /// resolve options reject them.
    #[error("unknown fields for {kind}: {}", .fields.join(", "))]
    UnknownFields {
        /// Kind being constructed.
        kind: String,
        /// Dotted paths of the undeclared keys, sorted.
        fields: Vec<String>,
    },

    /// Input text is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input text is not valid YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SchemaError {
    /// Build a validation error from a single issue.
    pub fn invalid(
        kind: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            kind: kind.into(),
            issues: vec![FieldIssue::new(field, reason)],
        }
    }

    /// Returns `true` if the kind name itself was not recognized.
    pub fn is_unknown_kind(&self) -> bool {
        matches!(self, Self::UnknownKind { .. })
    }

    /// Field issues carried by a validation error; empty for other variants.
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            Self::Validation { issues, .. } => issues,
            _ => &[],
        }
    }

    /// Returns `true` if any reported issue is located at `field`.
    pub fn mentions_field(&self, field: &str) -> bool {
        match self {
            Self::Validation { issues, .. } => issues.iter().any(|i| i.field == field),
            Self::UnknownFields { fields, .. } => fields.iter().any(|f| f == field),
            _ => false,
        }
    }
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_display() {
        let err = SchemaError::UnknownKind {
            kind: "AerConfg".into(),
            suggestion: Some("AerConfig".into()),
        };
        assert_eq!(
            err.to_string(),
            "unknown configuration kind 'AerConfg' (did you mean 'AerConfig'?)"
        );
        assert!(err.is_unknown_kind());

        let err = SchemaError::UnknownKind {
            kind: "unknown_kind".into(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "unknown configuration kind 'unknown_kind'");
    }

    #[test]
    fn test_validation_display_lists_every_issue() {
        let err = SchemaError::Validation {
            kind: "SeleneLeanConfig".into(),
            issues: vec![
                FieldIssue::new("chi", "must be greater than 0"),
                FieldIssue::new("", "cannot set both chi and truncation_fidelity"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "validation error for SeleneLeanConfig: chi: must be greater than 0; \
             <document>: cannot set both chi and truncation_fidelity"
        );
        assert!(err.mentions_field("chi"));
        assert!(!err.mentions_field("precision"));
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn test_non_validation_errors_have_no_issues() {
        let err = SchemaError::UnknownFields {
            kind: "AerConfig".into(),
            fields: vec!["colour".into()],
        };
        assert!(err.issues().is_empty());
        assert!(err.mentions_field("colour"));
        assert_eq!(err.to_string(), "unknown fields for AerConfig: colour");
    }
}
