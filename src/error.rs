use thiserror::Error;

use crate::plan::token::Token;

/// Problems with a user-authored filter specification.
///
/// Every variant is reported before the dataset is touched.
#[derive(Debug, Error, PartialEq)]
pub enum SpecError {
    #[error("Malformed filter document: {0}")]
    Json(String),
    #[error("Filter of type {kind} requires a column name")]
    MissingColumn { kind: &'static str },
    #[error("Unknown {kind} operation: {operation}")]
    UnknownOperation {
        kind: &'static str,
        operation: String,
    },
    #[error("Filter of type {kind} requires an operation")]
    MissingOperation { kind: &'static str },
    #[error("Invalid {kind} value: {value}")]
    InvalidValue { kind: &'static str, value: String },
    #[error("Missing operator before token {position}")]
    MissingOperator { position: usize },
    #[error("XOR at instruction {position} expands past the {limit} instruction limit")]
    ProgramTooLarge { limit: usize, position: usize },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Structural failures while converting infix tokens to postfix.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Unmatched closing parenthesis at token {position}")]
    UnmatchedClose { position: usize },
    #[error("Unclosed group opened at token {position}")]
    UnclosedGroup { position: usize },
    #[error("Empty group at token {position}")]
    EmptyGroup { position: usize },
    #[error("Operator {operator} at token {position} is missing an operand")]
    MissingOperand { operator: String, position: usize },
    #[error("Unexpected {found} at token {position}")]
    UnexpectedToken { found: String, position: usize },
    #[error("Empty expression")]
    Empty,
}

impl ParseError {
    pub(crate) fn unexpected(token: &Token, position: usize) -> Self {
        ParseError::UnexpectedToken {
            found: token.to_string(),
            position,
        }
    }
}

/// Failures raised by a single predicate against a dataset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredicateError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("No {relation} named {name:?}")]
    LookupMiss { relation: &'static str, name: String },
}

/// Invariant violations of the postfix stack machine.
///
/// These indicate a defect in the parser or desugarer, never bad user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("Operator {operator} at instruction {position} found too few operands")]
    StackUnderflow {
        operator: &'static str,
        position: usize,
    },
    #[error("Program left {remaining} result sets on the stack, expected exactly one")]
    StackImbalance { remaining: usize },
    #[error("XOR instruction at {position} reached the evaluator")]
    UnexpandedXor { position: usize },
}

/// Top-level error returned by [`crate::FilterEngine`] and [`crate::Plan`].
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Predicate(#[from] PredicateError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl From<ParseError> for FilterError {
    fn from(err: ParseError) -> Self {
        FilterError::Spec(SpecError::Parse(err))
    }
}
