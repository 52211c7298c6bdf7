//! Leaf predicates evaluated directly against a [`Dataset`].
//!
//! [`Predicate`] is a closed set of five variants. Each variant is an
//! immutable value: [`Predicate::invert`] returns a fresh predicate with the
//! inversion flag flipped and never touches the receiver, so the same
//! predicate can appear several times in one program.

mod membership;
mod scalar;

use std::fmt;

pub use membership::{MembershipOp, MembershipPredicate};
pub use scalar::{BooleanPredicate, ComparisonOp, NumberPredicate, TextOp, TextPredicate};

use crate::{
    dataset::{Dataset, Relation},
    error::PredicateError,
    set::EntitySet,
};

/// Predicate over one column or relation of the dataset.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// String comparison on a text column.
    Text(TextPredicate),
    /// Numeric comparison on a number column.
    Number(NumberPredicate),
    /// Truth test on a boolean column.
    Boolean(BooleanPredicate),
    /// Membership test on the tag relation.
    Tag(MembershipPredicate),
    /// Membership test on the color relation.
    Color(MembershipPredicate),
}

impl Predicate {
    /// Returns the set of entities matching this predicate.
    ///
    /// Fails with [`PredicateError::UnknownColumn`] when the column is not in
    /// the dataset schema and with [`PredicateError::LookupMiss`] when a
    /// membership predicate names a tag or color no entity carries.
    pub fn evaluate<D>(&self, dataset: &D) -> Result<EntitySet, PredicateError>
    where
        D: Dataset + ?Sized,
    {
        match self {
            Predicate::Text(predicate) => predicate.evaluate(dataset),
            Predicate::Number(predicate) => predicate.evaluate(dataset),
            Predicate::Boolean(predicate) => predicate.evaluate(dataset),
            Predicate::Tag(predicate) => predicate.evaluate(dataset, Relation::Tag),
            Predicate::Color(predicate) => predicate.evaluate(dataset, Relation::Color),
        }
    }

    /// Returns a copy of this predicate with its inversion flag flipped.
    #[must_use]
    pub fn invert(&self) -> Predicate {
        let mut inverted = self.clone();
        match &mut inverted {
            Predicate::Text(predicate) => predicate.inverted = !predicate.inverted,
            Predicate::Number(predicate) => predicate.inverted = !predicate.inverted,
            Predicate::Boolean(predicate) => predicate.inverted = !predicate.inverted,
            Predicate::Tag(predicate) | Predicate::Color(predicate) => {
                predicate.inverted = !predicate.inverted
            }
        }
        inverted
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        match self {
            Predicate::Text(predicate) => predicate.inverted,
            Predicate::Number(predicate) => predicate.inverted,
            Predicate::Boolean(predicate) => predicate.inverted,
            Predicate::Tag(predicate) | Predicate::Color(predicate) => predicate.inverted,
        }
    }

    /// Returns the dataset column read by this predicate; relations have none.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Predicate::Text(predicate) => Some(&predicate.column),
            Predicate::Number(predicate) => Some(&predicate.column),
            Predicate::Boolean(predicate) => Some(&predicate.column),
            Predicate::Tag(_) | Predicate::Color(_) => None,
        }
    }

    /// Returns the lowercase kind name used in filter documents.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Predicate::Text(_) => "text",
            Predicate::Number(_) => "number",
            Predicate::Boolean(_) => "boolean",
            Predicate::Tag(_) => "tag",
            Predicate::Color(_) => "color",
        }
    }
}

impl From<TextPredicate> for Predicate {
    fn from(value: TextPredicate) -> Self {
        Predicate::Text(value)
    }
}

impl From<NumberPredicate> for Predicate {
    fn from(value: NumberPredicate) -> Self {
        Predicate::Number(value)
    }
}

impl From<BooleanPredicate> for Predicate {
    fn from(value: BooleanPredicate) -> Self {
        Predicate::Boolean(value)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inverted() {
            f.write_str("~")?;
        }
        write!(f, "{}(", self.kind())?;
        match self {
            Predicate::Text(predicate) => write!(
                f,
                "{} {} {:?}{}",
                predicate.column,
                predicate.op,
                predicate.value,
                if predicate.case_sensitive { " cs" } else { "" }
            )?,
            Predicate::Number(predicate) => {
                write!(f, "{} {} {}", predicate.column, predicate.op, predicate.value)?
            }
            Predicate::Boolean(predicate) => f.write_str(&predicate.column)?,
            Predicate::Tag(predicate) | Predicate::Color(predicate) => {
                write!(f, "{} {:?}", predicate.op, predicate.value)?
            }
        }
        let show_null = match self {
            Predicate::Text(predicate) => predicate.show_null,
            Predicate::Number(predicate) => predicate.show_null,
            Predicate::Boolean(predicate) => predicate.show_null,
            Predicate::Tag(_) | Predicate::Color(_) => false,
        };
        if show_null {
            f.write_str(" +null")?;
        }
        f.write_str(")")
    }
}
