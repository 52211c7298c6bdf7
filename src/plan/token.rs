use std::fmt;

use crate::{predicate::Predicate, spec::LinkOperator};

/// Boolean operator appearing in token streams and programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Xor,
    /// Unary prefix negation.
    Not,
}

impl Operator {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::Not => "NOT",
        }
    }
}

impl From<LinkOperator> for Operator {
    fn from(value: LinkOperator) -> Self {
        match value {
            LinkOperator::And => Operator::And,
            LinkOperator::Or => Operator::Or,
            LinkOperator::Xor => Operator::Xor,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paren {
    Open,
    Close,
}

/// Element of the infix stream produced by the tokenizer.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Predicate(Predicate),
    Operator(Operator),
    Paren(Paren),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Predicate(predicate) => predicate.fmt(f),
            Token::Operator(operator) => operator.fmt(f),
            Token::Paren(Paren::Open) => f.write_str("("),
            Token::Paren(Paren::Close) => f.write_str(")"),
        }
    }
}

/// Element of a postfix program.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Predicate(Predicate),
    Operator(Operator),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Predicate(predicate) => predicate.fmt(f),
            Instruction::Operator(operator) => operator.fmt(f),
        }
    }
}

/// Renders a token or instruction sequence separated by single spaces.
pub(crate) fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
