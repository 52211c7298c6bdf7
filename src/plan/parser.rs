use std::cmp::Ordering;

use super::{
    precedence::{compare_precedence, is_right_associative},
    token::{Instruction, Operator, Paren, Token},
};
use crate::{error::ParseError, observability::log_debug};

#[derive(Clone, Copy, Debug)]
enum Pending {
    Operator(Operator),
    Open { position: usize },
}

/// Converts an infix token stream into a postfix program (shunting-yard).
///
/// Besides reordering, the parser checks that operands and operators
/// alternate and that groups are balanced and non-empty, so every program it
/// returns is well-formed for the evaluator.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Instruction>, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let token_count = tokens.len();
    let mut output = Vec::with_capacity(token_count);
    let mut pending: Vec<Pending> = Vec::new();
    let mut expect_operand = true;

    for (position, token) in tokens.into_iter().enumerate() {
        match token {
            Token::Predicate(predicate) => {
                if !expect_operand {
                    return Err(ParseError::unexpected(&Token::Predicate(predicate), position));
                }
                output.push(Instruction::Predicate(predicate));
                expect_operand = false;
            }
            Token::Operator(Operator::Not) => {
                if !expect_operand {
                    return Err(ParseError::unexpected(&Token::Operator(Operator::Not), position));
                }
                pending.push(Pending::Operator(Operator::Not));
            }
            Token::Operator(operator) => {
                if expect_operand {
                    return Err(ParseError::MissingOperand {
                        operator: operator.to_string(),
                        position,
                    });
                }
                while let Some(Pending::Operator(top)) = pending.last().copied() {
                    let binds_tighter = match compare_precedence(top, operator) {
                        Ordering::Greater => true,
                        Ordering::Equal => !is_right_associative(operator),
                        Ordering::Less => false,
                    };
                    if !binds_tighter {
                        break;
                    }
                    pending.pop();
                    output.push(Instruction::Operator(top));
                }
                pending.push(Pending::Operator(operator));
                expect_operand = true;
            }
            Token::Paren(Paren::Open) => {
                if !expect_operand {
                    return Err(ParseError::unexpected(&Token::Paren(Paren::Open), position));
                }
                pending.push(Pending::Open { position });
            }
            Token::Paren(Paren::Close) => {
                if expect_operand {
                    return Err(match pending.last() {
                        Some(Pending::Open { position }) => ParseError::EmptyGroup {
                            position: *position,
                        },
                        Some(Pending::Operator(operator)) => ParseError::MissingOperand {
                            operator: operator.to_string(),
                            position,
                        },
                        None => ParseError::UnmatchedClose { position },
                    });
                }
                loop {
                    match pending.pop() {
                        Some(Pending::Operator(operator)) => {
                            output.push(Instruction::Operator(operator))
                        }
                        Some(Pending::Open { .. }) => break,
                        None => return Err(ParseError::UnmatchedClose { position }),
                    }
                }
            }
        }
    }

    if expect_operand {
        if let Some(Pending::Operator(operator)) = pending.last() {
            return Err(ParseError::MissingOperand {
                operator: operator.to_string(),
                position: token_count,
            });
        }
    }
    while let Some(entry) = pending.pop() {
        match entry {
            Pending::Operator(operator) => output.push(Instruction::Operator(operator)),
            Pending::Open { position } => return Err(ParseError::UnclosedGroup { position }),
        }
    }

    log_debug!(
        component = "parser",
        event = "postfix_built",
        tokens = token_count,
        instructions = output.len(),
    );
    Ok(output)
}
