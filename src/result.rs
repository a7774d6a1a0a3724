//! Quantinuum system results.
//!
//! A result is a list of shots. Each shot is a list of `[tag, value]` pairs
//! in the order the program emitted them:
//!
//! ```text
//! [
//!   [["c", 1], ["angles", [0.25, 1.5]]],
//!   [["c", 0], ["angles", [0.5, 1.0]]]
//! ]
//! ```
//!
//! Values are integers, booleans, floats, or flat lists of those. Tags are at
//! most [`MAX_TAG_LEN`] characters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaResult;
use crate::validate::{Issues, Validate, deserialize_validated};

/// Longest permitted tag, in characters.
pub const MAX_TAG_LEN: usize = 256;

/// A single emitted scalar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QShotValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl From<bool> for QShotValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for QShotValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for QShotValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Value of one shot item: a scalar or a flat list of scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QSysShotItemValue {
    Scalar(QShotValue),
    List(Vec<QShotValue>),
}

macro_rules! impl_scalar_item {
    ($($t:ty),*) => {
        $(
            impl From<$t> for QSysShotItemValue {
                fn from(value: $t) -> Self {
                    Self::Scalar(value.into())
                }
            }
        )*
    };
}

impl_scalar_item!(QShotValue, bool, i64, f64);

impl From<Vec<QShotValue>> for QSysShotItemValue {
    fn from(values: Vec<QShotValue>) -> Self {
        Self::List(values)
    }
}

/// A `[tag, value]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QSysShotItem(pub String, pub QSysShotItemValue);

impl QSysShotItem {
    /// Pair `tag` with `value`.
    pub fn new(tag: impl Into<String>, value: impl Into<QSysShotItemValue>) -> Self {
        Self(tag.into(), value.into())
    }

    /// Tag the value was emitted under.
    pub fn tag(&self) -> &str {
        &self.0
    }

    /// Emitted value.
    pub fn value(&self) -> &QSysShotItemValue {
        &self.1
    }
}

impl Validate for QSysShotItem {
    fn validate(&self, issues: &mut Issues) {
        let len = self.0.chars().count();
        if len > MAX_TAG_LEN {
            issues.push(
                "tag",
                format!("must be at most {MAX_TAG_LEN} characters, got {len}"),
            );
        }
    }
}

/// Items emitted during one shot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QSysShot(Vec<QSysShotItem>);

impl QSysShot {
    /// Shot with no items.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item.
    pub fn push(&mut self, tag: impl Into<String>, value: impl Into<QSysShotItemValue>) {
        self.0.push(QSysShotItem::new(tag, value));
    }

    /// First value emitted under `tag`.
    pub fn get(&self, tag: &str) -> Option<&QSysShotItemValue> {
        self.0.iter().find(|item| item.0 == tag).map(|item| &item.1)
    }

    /// Iterate over items in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &QSysShotItem> {
        self.0.iter()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the shot emitted nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<QSysShotItem> for QSysShot {
    fn from_iter<I: IntoIterator<Item = QSysShotItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Validate for QSysShot {
    fn validate(&self, issues: &mut Issues) {
        issues.each("", &self.0);
    }
}

/// All shots of one execution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QSysResult(Vec<QSysShot>);

impl QSysResult {
    /// Result holding `shots`.
    pub fn new(shots: Vec<QSysShot>) -> Self {
        Self(shots)
    }

    /// Build from an untyped document and check tag lengths.
    pub fn from_value(document: Value) -> SchemaResult<Self> {
        deserialize_validated("QSysResult", document)
    }

    /// Parse JSON text.
    pub fn from_json(text: &str) -> SchemaResult<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Shots in execution order.
    pub fn shots(&self) -> &[QSysShot] {
        &self.0
    }

    /// Value of `tag` in each shot, `None` where the shot did not emit it.
    pub fn values<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = Option<&'a QSysShotItemValue>> {
        self.0.iter().map(move |shot| shot.get(tag))
    }

    /// Number of shots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no shots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<QSysShot> for QSysResult {
    fn from_iter<I: IntoIterator<Item = QSysShot>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Validate for QSysResult {
    fn validate(&self, issues: &mut Issues) {
        issues.each("", &self.0);
    }
}
