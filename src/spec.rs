//! Wire model of a user-authored filter specification.
//!
//! A specification is an ordered list of [`FilterNode`]s. Every node except
//! the first in a sibling list carries the [`LinkOperator`] joining it to the
//! previous sibling; groups nest further lists.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SpecError;

/// Boolean operator joining a node to its previous sibling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkOperator {
    And,
    Or,
    Xor,
}

impl fmt::Display for LinkOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkOperator::And => "AND",
            LinkOperator::Or => "OR",
            LinkOperator::Xor => "XOR",
        })
    }
}

/// Scalar literal supplied as a leaf's `value`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl Literal {
    /// Renders the literal the way a text or membership filter compares it.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Literal::Boolean(value) => value.to_string(),
            Literal::Number(value) => value.to_string(),
            Literal::Text(value) => value.clone(),
        }
    }

    /// Parses the literal as a number; text is trimmed before parsing.
    #[must_use]
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Literal::Number(value) => Some(*value),
            Literal::Text(value) => value.trim().parse().ok(),
            Literal::Boolean(_) => None,
        }
    }

    /// Interprets the literal as a truth value.
    ///
    /// Empty text, `"false"`, `"0"` and zero are false.
    #[must_use]
    pub fn to_bool(&self) -> bool {
        match self {
            Literal::Boolean(value) => *value,
            Literal::Number(value) => *value != 0.0,
            Literal::Text(value) => {
                let value = value.trim();
                !(value.is_empty() || value.eq_ignore_ascii_case("false") || value == "0")
            }
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_owned())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Number(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Leaf comparing a scalar column (`text`, `number`, `boolean`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLeaf {
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub value: Option<Literal>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub inverted: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub show_null: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub case_sensitive: bool,
}

/// Leaf testing tag or color membership.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipLeaf {
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub value: Option<Literal>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub inverted: bool,
}

/// Parenthesized sub-expression.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    #[serde(default, deserialize_with = "null_as_false")]
    pub inverted: bool,
    #[serde(default)]
    pub filters: Vec<FilterNode>,
}

/// Node payload, discriminated by the document's `type` key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Text(ColumnLeaf),
    Number(ColumnLeaf),
    Boolean(ColumnLeaf),
    Tag(MembershipLeaf),
    Color(MembershipLeaf),
    Group(GroupNode),
}

/// One entry of a sibling list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<LinkOperator>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl FilterNode {
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            operator: None,
            kind,
        }
    }

    /// Sets the operator linking this node to its previous sibling.
    #[must_use]
    pub fn linked(mut self, operator: LinkOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Returns the number of leaves in this subtree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            NodeKind::Group(group) => group.filters.iter().map(FilterNode::leaf_count).sum(),
            _ => 1,
        }
    }
}

/// Top-level filter request: the root sibling list plus global inversion.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub filters: Vec<FilterNode>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub inverted: bool,
}

fn malformed(err: serde_json::Error) -> SpecError {
    SpecError::Json(err.to_string())
}

impl FilterQuery {
    #[must_use]
    pub fn new(filters: Vec<FilterNode>, inverted: bool) -> Self {
        Self { filters, inverted }
    }

    /// Parses a query document, or a bare array of nodes as a non-inverted query.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let document: serde_json::Value = serde_json::from_str(json).map_err(malformed)?;
        if document.is_array() {
            let filters = serde_json::from_value(document).map_err(malformed)?;
            Ok(FilterQuery::new(filters, false))
        } else {
            serde_json::from_value(document).map_err(malformed)
        }
    }

    /// Returns the number of leaves across the whole tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.filters.iter().map(FilterNode::leaf_count).sum()
    }
}
