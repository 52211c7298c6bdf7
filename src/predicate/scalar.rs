use std::{borrow::Cow, cmp::Ordering, fmt, str::FromStr};

use regex::{Regex, RegexBuilder};

use crate::{
    dataset::{Dataset, ValueRef},
    error::{PredicateError, SpecError},
    set::EntitySet,
};

/// Comparison operator used by number predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equals (`==`).
    Equal,
    /// Not equals (`!=`).
    NotEqual,
    /// Less than (`<`).
    LessThan,
    /// Less than or equal to (`<=`).
    LessThanOrEqual,
    /// Greater than (`>`).
    GreaterThan,
    /// Greater than or equal to (`>=`).
    GreaterThanOrEqual,
}

impl ComparisonOp {
    /// Returns a textual representation of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Equal => "==",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqual => ">=",
        }
    }

    /// Evaluates the operator against a comparison ordering.
    #[must_use]
    pub fn test_ordering(self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Equal => ordering == Ordering::Equal,
            ComparisonOp::NotEqual => ordering != Ordering::Equal,
            ComparisonOp::LessThan => ordering == Ordering::Less,
            ComparisonOp::LessThanOrEqual => ordering != Ordering::Greater,
            ComparisonOp::GreaterThan => ordering == Ordering::Greater,
            ComparisonOp::GreaterThanOrEqual => ordering != Ordering::Less,
        }
    }
}

impl FromStr for ComparisonOp {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" | "=" => Ok(ComparisonOp::Equal),
            "!=" => Ok(ComparisonOp::NotEqual),
            "<" => Ok(ComparisonOp::LessThan),
            "<=" => Ok(ComparisonOp::LessThanOrEqual),
            ">" => Ok(ComparisonOp::GreaterThan),
            ">=" => Ok(ComparisonOp::GreaterThanOrEqual),
            other => Err(SpecError::UnknownOperation {
                kind: "number",
                operation: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String comparison performed by a text predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextOp {
    Exact,
    StartsWith,
    EndsWith,
    Contains,
}

impl TextOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TextOp::Exact => "exact",
            TextOp::StartsWith => "startswith",
            TextOp::EndsWith => "endswith",
            TextOp::Contains => "contains",
        }
    }
}

impl FromStr for TextOp {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" | "is" => Ok(TextOp::Exact),
            "startswith" => Ok(TextOp::StartsWith),
            "endswith" => Ok(TextOp::EndsWith),
            "contains" => Ok(TextOp::Contains),
            _ => Err(SpecError::UnknownOperation {
                kind: "text",
                operation: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for TextOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn scan<'a, D>(
    dataset: &'a D,
    column: &str,
) -> Result<crate::dataset::ColumnScan<'a>, PredicateError>
where
    D: Dataset + ?Sized,
{
    dataset
        .scan_column(column)
        .ok_or_else(|| PredicateError::UnknownColumn(column.to_owned()))
}

/// Text predicate; case-insensitive comparisons go through an escaped regex.
#[derive(Clone, Debug)]
pub struct TextPredicate {
    pub(crate) column: String,
    pub(crate) op: TextOp,
    pub(crate) value: String,
    pub(crate) inverted: bool,
    pub(crate) show_null: bool,
    pub(crate) case_sensitive: bool,
    pattern: Option<Regex>,
}

impl TextPredicate {
    /// Builds a text predicate.
    ///
    /// Case-insensitive predicates store their value lowercased.
    pub fn new(
        column: impl Into<String>,
        op: TextOp,
        value: impl Into<String>,
        case_sensitive: bool,
    ) -> Result<Self, SpecError> {
        let value: String = value.into();
        let (value, pattern) = if case_sensitive {
            (value, None)
        } else {
            let value = value.to_lowercase();
            let pattern = Self::compile(op, &value)?;
            (value, Some(pattern))
        };
        Ok(Self {
            column: column.into(),
            op,
            value,
            inverted: false,
            show_null: false,
            case_sensitive,
            pattern,
        })
    }

    #[must_use]
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    #[must_use]
    pub fn show_null(mut self, show_null: bool) -> Self {
        self.show_null = show_null;
        self
    }

    fn compile(op: TextOp, value: &str) -> Result<Regex, SpecError> {
        let escaped = regex::escape(value);
        let source = match op {
            TextOp::Exact => format!("^{escaped}$"),
            TextOp::StartsWith => format!("^{escaped}"),
            TextOp::EndsWith => format!("{escaped}$"),
            TextOp::Contains => escaped,
        };
        RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|err| SpecError::InvalidValue {
                kind: "text",
                value: err.to_string(),
            })
    }

    fn matches(&self, text: &str) -> bool {
        if let Some(pattern) = &self.pattern {
            return pattern.is_match(text);
        }
        match self.op {
            TextOp::Exact => text == self.value,
            TextOp::StartsWith => text.starts_with(&self.value),
            TextOp::EndsWith => text.ends_with(&self.value),
            TextOp::Contains => text.contains(&self.value),
        }
    }

    pub(crate) fn evaluate<D>(&self, dataset: &D) -> Result<EntitySet, PredicateError>
    where
        D: Dataset + ?Sized,
    {
        let mut matched = EntitySet::new();
        for (entity, value) in scan(dataset, &self.column)? {
            let text = match value {
                ValueRef::Null => {
                    if self.show_null {
                        matched.insert(entity);
                    }
                    continue;
                }
                ValueRef::Text(text) => Cow::Borrowed(text),
                ValueRef::Number(number) => Cow::Owned(number.to_string()),
                ValueRef::Boolean(flag) => Cow::Owned(flag.to_string()),
            };
            if self.matches(&text) != self.inverted {
                matched.insert(entity);
            }
        }
        Ok(matched)
    }
}

impl PartialEq for TextPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.column == other.column
            && self.op == other.op
            && self.value == other.value
            && self.inverted == other.inverted
            && self.show_null == other.show_null
            && self.case_sensitive == other.case_sensitive
    }
}

/// Numeric comparison against a float literal.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberPredicate {
    pub(crate) column: String,
    pub(crate) op: ComparisonOp,
    pub(crate) value: f64,
    pub(crate) inverted: bool,
    pub(crate) show_null: bool,
}

impl NumberPredicate {
    #[must_use]
    pub fn new(column: impl Into<String>, op: ComparisonOp, value: f64) -> Self {
        Self {
            column: column.into(),
            op,
            value,
            inverted: false,
            show_null: false,
        }
    }

    #[must_use]
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    #[must_use]
    pub fn show_null(mut self, show_null: bool) -> Self {
        self.show_null = show_null;
        self
    }

    pub(crate) fn evaluate<D>(&self, dataset: &D) -> Result<EntitySet, PredicateError>
    where
        D: Dataset + ?Sized,
    {
        let mut matched = EntitySet::new();
        for (entity, value) in scan(dataset, &self.column)? {
            if value.is_null() {
                if self.show_null {
                    matched.insert(entity);
                }
                continue;
            }
            // Non-numeric fields and NaN never match, inverted or not.
            if let Some(ordering) = value.compare_number(self.value) {
                if self.op.test_ordering(ordering) != self.inverted {
                    matched.insert(entity);
                }
            }
        }
        Ok(matched)
    }
}

/// Truth test on a boolean column.
///
/// The literal `value` is carried for round-tripping only: matching looks at
/// the column and the inversion flag alone.
#[derive(Clone, Debug, PartialEq)]
pub struct BooleanPredicate {
    pub(crate) column: String,
    pub(crate) value: bool,
    pub(crate) inverted: bool,
    pub(crate) show_null: bool,
}

impl BooleanPredicate {
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: true,
            inverted: false,
            show_null: false,
        }
    }

    #[must_use]
    pub fn value(mut self, value: bool) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    #[must_use]
    pub fn show_null(mut self, show_null: bool) -> Self {
        self.show_null = show_null;
        self
    }

    pub(crate) fn evaluate<D>(&self, dataset: &D) -> Result<EntitySet, PredicateError>
    where
        D: Dataset + ?Sized,
    {
        let mut matched = EntitySet::new();
        for (entity, value) in scan(dataset, &self.column)? {
            match value {
                ValueRef::Null if self.show_null => matched.insert(entity),
                ValueRef::Boolean(flag) if flag != self.inverted => matched.insert(entity),
                _ => {}
            }
        }
        Ok(matched)
    }
}
