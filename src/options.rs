//! Resolution options.

use std::str::FromStr;

/// Environment variable read by [`ResolveOptions::from_env`].
pub const UNKNOWN_FIELDS_ENV: &str = "BACKEND_SCHEMAS_UNKNOWN_FIELDS";

/// What to do with document keys a record does not declare, at any depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFields {
    /// Drop them silently. Older readers accept newer documents this way.
    #[default]
    Ignore,
    /// Drop them and log a warning.
    Warn,
    /// Fail with [`SchemaError::UnknownFields`](crate::SchemaError::UnknownFields).
    Reject,
}

impl FromStr for UnknownFields {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            "reject" | "forbid" => Ok(Self::Reject),
            other => Err(format!(
                "invalid unknown-fields policy '{other}' (expected ignore, warn or reject)"
            )),
        }
    }
}

/// Options controlling how documents are turned into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOptions {
    /// Policy for undeclared keys.
    pub unknown_fields: UnknownFields,
}

impl ResolveOptions {
    /// Default options: unknown fields are ignored.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject undeclared keys.
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFields::Reject,
        }
    }

    /// Set the unknown-field policy.
    pub fn with_unknown_fields(mut self, policy: UnknownFields) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Read options from the environment, falling back to defaults.
    ///
    /// An unparsable value is logged and ignored.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(raw) = std::env::var(UNKNOWN_FIELDS_ENV) {
            match raw.parse() {
                Ok(policy) => options.unknown_fields = policy,
                Err(message) => tracing::warn!(env = UNKNOWN_FIELDS_ENV, "{message}"),
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ignores_unknown_fields() {
        assert_eq!(ResolveOptions::default().unknown_fields, UnknownFields::Ignore);
        assert_eq!(ResolveOptions::strict().unknown_fields, UnknownFields::Reject);
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("warn".parse::<UnknownFields>(), Ok(UnknownFields::Warn));
        assert_eq!(" Reject ".parse::<UnknownFields>(), Ok(UnknownFields::Reject));
        assert_eq!("forbid".parse::<UnknownFields>(), Ok(UnknownFields::Reject));
        assert!("sometimes".parse::<UnknownFields>().is_err());
    }

    #[test]
    fn test_builder() {
        let options = ResolveOptions::new().with_unknown_fields(UnknownFields::Warn);
        assert_eq!(options.unknown_fields, UnknownFields::Warn);
    }
}
