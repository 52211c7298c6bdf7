//! Read-only view of the catalog the engine filters.
//!
//! The engine never mutates a dataset; every lookup it needs goes through the
//! [`Dataset`] trait. [`MemoryDataset`] is the bundled implementation used by
//! embedders that keep their catalog in memory and by the test suite.

mod memory;

use std::{cmp::Ordering, fmt};

pub use memory::{DatasetDocument, EntityRecord, MemoryDataset, MemoryDatasetBuilder};
use serde::{Deserialize, Serialize};

use crate::set::{EntityId, EntitySet};

/// Iterator over `(entity, value)` pairs of one column.
pub type ColumnScan<'a> = Box<dyn Iterator<Item = (EntityId, ValueRef<'a>)> + 'a>;

/// Iterator over `(entity, name)` relation rows.
pub type RelationScan<'a> = Box<dyn Iterator<Item = (EntityId, &'a str)> + 'a>;

/// Many-to-many relations every entity may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Free-form user tags.
    Tag,
    /// Named colors.
    Color,
}

impl Relation {
    /// Returns the lowercase name used in filter documents and errors.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Tag => "tag",
            Relation::Color => "color",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owned scalar stored in an entity field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing or explicit null.
    Null,
    /// Boolean field.
    Boolean(bool),
    /// Numeric field; all numbers are compared as `f64`.
    Number(f64),
    /// UTF-8 text field.
    Text(String),
}

impl Value {
    /// Returns a borrowed view over this value.
    #[must_use]
    pub fn as_ref(&self) -> ValueRef<'_> {
        match self {
            Value::Null => ValueRef::Null,
            Value::Boolean(value) => ValueRef::Boolean(*value),
            Value::Number(value) => ValueRef::Number(*value),
            Value::Text(value) => ValueRef::Text(value.as_str()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Borrowed view over a field value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ValueRef<'a> {
    /// Missing or explicit null.
    Null,
    /// Boolean field.
    Boolean(bool),
    /// Numeric field.
    Number(f64),
    /// Text field.
    Text(&'a str),
}

impl ValueRef<'_> {
    /// Returns true when the field is null or absent.
    #[must_use]
    pub fn is_null(self) -> bool {
        matches!(self, ValueRef::Null)
    }

    /// Compares a numeric field against `rhs`.
    ///
    /// Non-numeric fields and NaN are incomparable.
    #[must_use]
    pub fn compare_number(self, rhs: f64) -> Option<Ordering> {
        match self {
            ValueRef::Number(lhs) => lhs.partial_cmp(&rhs),
            _ => None,
        }
    }
}

/// Read-only catalog consumed by predicates.
///
/// Implementations must present a snapshot-consistent view for the duration
/// of one evaluation.
pub trait Dataset: Send + Sync {
    /// Returns every entity identifier.
    fn universe(&self) -> EntitySet;

    /// Returns true when `column` is part of the dataset schema.
    fn has_column(&self, column: &str) -> bool;

    /// Yields every entity together with its value for `column`.
    ///
    /// Entities without the field must be yielded with [`ValueRef::Null`].
    /// Returns `None` for columns outside the schema.
    fn scan_column(&self, column: &str) -> Option<ColumnScan<'_>>;

    /// Yields every relation row of the given kind.
    fn relation_rows(&self, relation: Relation) -> RelationScan<'_>;

    /// Returns true when at least one entity is related to `name`.
    fn has_relation_value(&self, relation: Relation, name: &str) -> bool {
        self.relation_rows(relation)
            .any(|(_, candidate)| candidate == name)
    }
}
