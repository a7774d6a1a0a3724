//! Field constraint checks.
//!
//! Type, presence and enumerated-value checks are enforced by deserialization.
//! Everything serde cannot express (numeric ranges, list lengths, cross-field
//! rules) is checked by a [`Validate`] implementation that records problems
//! into an [`Issues`] collector. All problems are collected before failing so
//! a caller sees every offending field at once.

use serde::de::{self, DeserializeOwned};
use serde_json::Value;

use crate::config::json_type_name;
use crate::error::{FieldIssue, SchemaError, SchemaResult};

/// Constraint checks for a deserialized model.
pub trait Validate {
    /// Record every constraint violation into `issues`.
    fn validate(&self, issues: &mut Issues);
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self, issues: &mut Issues) {
        if let Some(inner) = self {
            inner.validate(issues);
        }
    }
}

/// Collects field issues under a path prefix.
#[derive(Debug, Default)]
pub struct Issues {
    prefix: Vec<String>,
    found: Vec<FieldIssue>,
}

impl Issues {
    /// Create an empty collector rooted at the document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `model` and fail with every issue found.
    pub fn check(kind: &str, model: &impl Validate) -> SchemaResult<()> {
        let mut issues = Self::new();
        model.validate(&mut issues);
        issues.into_result(kind)
    }

    fn path(&self, field: &str) -> String {
        let mut path = String::new();
        for segment in self.prefix.iter().map(String::as_str).chain([field]) {
            if segment.is_empty() {
                continue;
            }
            if !path.is_empty() && !segment.starts_with('[') {
                path.push('.');
            }
            path.push_str(segment);
        }
        path
    }

    /// Record an issue at `field` (relative to the current prefix).
    pub fn push(&mut self, field: &str, reason: impl Into<String>) {
        let field = self.path(field);
        self.found.push(FieldIssue::new(field, reason));
    }

    /// Record an issue against the current model as a whole.
    pub fn model(&mut self, reason: impl Into<String>) {
        self.push("", reason);
    }

    /// Run `f` with `field` appended to the path prefix.
    pub fn nested(&mut self, field: &str, f: impl FnOnce(&mut Self)) {
        self.prefix.push(field.to_string());
        f(self);
        self.prefix.pop();
    }

    /// Validate a nested model under `field`.
    pub fn child(&mut self, field: &str, model: &impl Validate) {
        self.nested(field, |issues| model.validate(issues));
    }

    /// Validate every element of a list, indexing the path.
    pub fn each<'a, T: Validate + 'a>(
        &mut self,
        field: &str,
        items: impl IntoIterator<Item = &'a T>,
    ) {
        self.nested(field, |issues| {
            for (i, item) in items.into_iter().enumerate() {
                issues.child(&format!("[{i}]"), item);
            }
        });
    }

    /// `value >= min`.
    pub fn at_least<N>(&mut self, field: &str, value: N, min: N)
    where
        N: PartialOrd + std::fmt::Display,
    {
        if value < min {
            self.push(field, format!("must be greater than or equal to {min}, got {value}"));
        }
    }

    /// `value <= max`.
    pub fn at_most<N>(&mut self, field: &str, value: N, max: N)
    where
        N: PartialOrd + std::fmt::Display,
    {
        if value > max {
            self.push(field, format!("must be less than or equal to {max}, got {value}"));
        }
    }

    /// `value > bound`.
    pub fn greater_than<N>(&mut self, field: &str, value: N, bound: N)
    where
        N: PartialOrd + std::fmt::Display,
    {
        // Written as a negated `>` so NaN is rejected too.
        if !(value > bound) {
            self.push(field, format!("must be greater than {bound}, got {value}"));
        }
    }

    /// `min <= value <= max`.
    pub fn within<N>(&mut self, field: &str, value: N, min: N, max: N)
    where
        N: PartialOrd + std::fmt::Display,
    {
        if !(value >= min && value <= max) {
            self.push(field, format!("must be between {min} and {max}, got {value}"));
        }
    }

    /// A probability in `[0, 1]`.
    pub fn probability(&mut self, field: &str, value: f64) {
        self.within(field, value, 0.0, 1.0);
    }

    /// A list with at least one element.
    pub fn non_empty<T>(&mut self, field: &str, items: &[T]) {
        if items.is_empty() {
            self.push(field, "must contain at least 1 item");
        }
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    /// Consume the collector, returning the recorded issues.
    pub fn into_vec(self) -> Vec<FieldIssue> {
        self.found
    }

    /// `Ok(())` if nothing was recorded, otherwise a validation error for `kind`.
    pub fn into_result(self, kind: &str) -> SchemaResult<()> {
        if self.found.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::Validation {
                kind: kind.to_string(),
                issues: self.found,
            })
        }
    }
}

/// Deserialize `document` as `T` and check its constraints, reporting
/// failures against `kind`.
pub(crate) fn deserialize_validated<T>(kind: &str, document: Value) -> SchemaResult<T>
where
    T: DeserializeOwned + Validate,
{
    let model = deserialize_tracked(kind, document)?;
    Issues::check(kind, &model)?;
    Ok(model)
}

/// Deserialize `document` as `T`, reporting a failure at the offending
/// field's path.
pub(crate) fn deserialize_tracked<T: DeserializeOwned>(kind: &str, document: Value) -> SchemaResult<T> {
    serde_path_to_error::deserialize(document).map_err(|e| SchemaError::Validation {
        kind: kind.to_string(),
        issues: vec![issue_from_deserialize(e)],
    })
}

/// Turn a path-tracking deserialize error into a field issue.
///
/// `missing field` errors are reported at the missing field's own path rather
/// than at its parent. Errors raised inside a tagged union carry the inner
/// path in their message, which is appended to the tracked path.
pub(crate) fn issue_from_deserialize(err: serde_path_to_error::Error<serde_json::Error>) -> FieldIssue {
    let path = err.path().to_string();
    let parent = if path == "." { String::new() } else { path };
    let message = err.into_inner().to_string();

    if let Some(name) = missing_field_name(&message) {
        return FieldIssue::new(join_path(&parent, name), "field required");
    }
    if let Some((inner, reason)) = split_inner_path(&message) {
        return FieldIssue::new(join_path(&parent, inner), reason);
    }
    FieldIssue::new(parent, message)
}

/// Append `child` to a dotted path. Index segments (`[0]`) attach without a dot.
pub(crate) fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else if child.is_empty() {
        parent.to_string()
    } else if child.starts_with('[') {
        format!("{parent}{child}")
    } else {
        format!("{parent}.{child}")
    }
}

// ── Tagged unions ────────────────────────────────────────────────────
//
// serde buffers the body of an internally tagged enum before decoding it,
// which hides the inner field path from `serde_path_to_error`. The unions in
// this crate split the tag off by hand and decode the variant body with
// `variant`, which reports the inner path as `field `<path>`: <reason>`.

const INNER_PATH_PREFIX: &str = "field `";

fn inner_path_error<E: de::Error>(field: &str, reason: impl std::fmt::Display) -> E {
    E::custom(format!("{INNER_PATH_PREFIX}{field}`: {reason}"))
}

fn split_inner_path(message: &str) -> Option<(&str, &str)> {
    message.strip_prefix(INNER_PATH_PREFIX)?.split_once("`: ")
}

/// Split the `tag` key off a tagged union's document.
pub(crate) fn take_tag<E: de::Error>(document: Value, tag: &str) -> Result<(String, Value), E> {
    let Value::Object(mut map) = document else {
        return Err(E::custom(format!(
            "expected a mapping, got {}",
            json_type_name(&document)
        )));
    };
    match map.remove(tag) {
        Some(Value::String(name)) => Ok((name, Value::Object(map))),
        Some(other) => Err(inner_path_error(
            tag,
            format!("expected a string, got {}", json_type_name(&other)),
        )),
        None => Err(inner_path_error(tag, "field required")),
    }
}

/// Decode the body of one union variant, keeping the path of any failure.
pub(crate) fn variant<T: DeserializeOwned, E: de::Error>(body: Value) -> Result<T, E> {
    serde_path_to_error::deserialize(body).map_err(|e| {
        let issue = issue_from_deserialize(e);
        inner_path_error(&issue.field, issue.reason)
    })
}

/// Error for a tag value naming no variant.
pub(crate) fn unknown_variant<E: de::Error>(tag: &str, name: &str, expected: &[&str]) -> E {
    inner_path_error(
        tag,
        format!("unknown variant `{name}`, expected one of {}", expected.join(", ")),
    )
}

// ── Undeclared keys ──────────────────────────────────────────────────

/// Paths of keys in `document` that a typed model dropped.
///
/// `normalized` is the model serialized back to a document. A key present in
/// the input but absent from the output was not declared anywhere along its
/// path. Keys holding `null` are skipped, since unset optionals are omitted
/// on output.
pub(crate) fn undeclared_keys(document: &Value, normalized: &Value) -> Vec<String> {
    let mut found = Vec::new();
    collect_undeclared(document, normalized, "", &mut found);
    found.sort();
    found
}

fn collect_undeclared(document: &Value, normalized: &Value, path: &str, found: &mut Vec<String>) {
    match (document, normalized) {
        (Value::Object(given), Value::Object(kept)) => {
            for (key, value) in given {
                let child = join_path(path, key);
                match kept.get(key) {
                    Some(inner) => collect_undeclared(value, inner, &child, found),
                    None if value.is_null() => {}
                    None => found.push(child),
                }
            }
        }
        (Value::Array(given), Value::Array(kept)) => {
            for (i, (value, inner)) in given.iter().zip(kept).enumerate() {
                collect_undeclared(value, inner, &join_path(path, &format!("[{i}]")), found);
            }
        }
        _ => {}
    }
}

fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}
