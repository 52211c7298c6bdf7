//! Compilation pipeline from filter specification to executable program.
//!
//! tokenize → parse (shunting-yard) → desugar (XOR elimination). The result
//! is a [`Plan`]: an immutable postfix program over AND/OR/NOT that can be
//! executed against any number of datasets, from any number of threads.

pub(crate) mod desugar;
pub(crate) mod parser;
pub(crate) mod precedence;
pub(crate) mod token;
pub(crate) mod tokenizer;

use std::{collections::BTreeSet, fmt};

pub use desugar::desugar;
pub use parser::parse;
pub use precedence::{compare_precedence, Precedence};
pub use token::{Instruction, Operator, Paren, Token};
pub use tokenizer::tokenize;

use crate::{
    dataset::Dataset,
    error::{FilterError, PredicateError},
    evaluator,
    observability::log_warn,
    set::EntitySet,
};

/// Compiled filter, ready to run.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    program: Vec<Instruction>,
    inverted: bool,
}

impl Plan {
    /// Plan selecting every entity; used for specifications without leaves.
    pub(crate) fn all() -> Self {
        Self {
            program: Vec::new(),
            inverted: false,
        }
    }

    pub(crate) fn new(program: Vec<Instruction>, inverted: bool) -> Self {
        Self { program, inverted }
    }

    /// Returns the desugared postfix program, without the global inversion.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.program
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Returns true when the plan selects every entity without evaluating anything.
    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.program.is_empty()
    }

    /// Returns the dataset columns referenced by the plan's predicates.
    #[must_use]
    pub fn columns(&self) -> BTreeSet<&str> {
        self.program
            .iter()
            .filter_map(|instruction| match instruction {
                Instruction::Predicate(predicate) => predicate.column(),
                Instruction::Operator(_) => None,
            })
            .collect()
    }

    /// Checks that every referenced column exists in `dataset`.
    pub fn validate<D>(&self, dataset: &D) -> Result<(), PredicateError>
    where
        D: Dataset + ?Sized,
    {
        match self.columns().into_iter().find(|column| !dataset.has_column(column)) {
            Some(column) => {
                log_warn!(
                    component = "engine",
                    event = "unknown_column",
                    column,
                );
                Err(PredicateError::UnknownColumn(column.to_owned()))
            }
            None => Ok(()),
        }
    }

    /// Validates the plan against `dataset`, then evaluates it.
    ///
    /// Nothing is evaluated when validation fails, so no partial result is
    /// ever produced.
    pub fn execute<D>(&self, dataset: &D) -> Result<EntitySet, FilterError>
    where
        D: Dataset + ?Sized,
    {
        self.validate(dataset)?;
        evaluator::evaluate(&self.program, dataset, self.inverted)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.program.is_empty() {
            return f.write_str("ALL");
        }
        f.write_str(&token::join(&self.program))?;
        if self.inverted {
            f.write_str(" NOT")?;
        }
        Ok(())
    }
}
