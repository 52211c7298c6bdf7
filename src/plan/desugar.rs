//! XOR elimination over postfix programs.
//!
//! `A XOR B` is rewritten to `(A AND NOT B) OR (NOT A AND B)`, which in
//! postfix reads `A ¬B AND ¬A B AND OR`. Operands are whole subprograms and
//! both are duplicated by value.

use super::token::{Instruction, Operator};
use crate::{
    error::{EvalError, FilterError, SpecError},
    observability::{log_debug, log_warn},
    option::{EngineOption, XorExpansion},
};

/// Rewrites every XOR in `program` into AND/OR/NOT.
///
/// Fails with [`SpecError::ProgramTooLarge`] when an expansion would exceed
/// the configured instruction limit, and with an [`EvalError`] when
/// `program` is not a well-formed postfix sequence.
pub fn desugar(
    program: Vec<Instruction>,
    option: &EngineOption,
) -> Result<Vec<Instruction>, FilterError> {
    let expansion = option.xor_expansion;
    let input_len = program.len();
    let mut operands: Vec<Vec<Instruction>> = Vec::new();
    let mut expanded = 0usize;

    for (position, instruction) in program.into_iter().enumerate() {
        match instruction {
            Instruction::Predicate(_) => operands.push(vec![instruction]),
            Instruction::Operator(Operator::Not) => {
                let mut operand = pop(&mut operands, Operator::Not, position)?;
                operand.push(Instruction::Operator(Operator::Not));
                operands.push(operand);
            }
            Instruction::Operator(Operator::Xor) => {
                let rhs = pop(&mut operands, Operator::Xor, position)?;
                let lhs = pop(&mut operands, Operator::Xor, position)?;
                let projected = 2 * (lhs.len() + rhs.len()) + 5;
                if projected > option.max_instructions {
                    log_warn!(
                        component = "desugar",
                        event = "expansion_limit_exceeded",
                        position,
                        projected,
                        limit = option.max_instructions,
                    );
                    return Err(SpecError::ProgramTooLarge {
                        limit: option.max_instructions,
                        position,
                    }
                    .into());
                }
                let not_rhs = negate(&rhs, expansion);
                let not_lhs = negate(&lhs, expansion);

                let mut rewritten = Vec::with_capacity(projected);
                rewritten.extend(lhs);
                rewritten.extend(not_rhs);
                rewritten.push(Instruction::Operator(Operator::And));
                rewritten.extend(not_lhs);
                rewritten.extend(rhs);
                rewritten.push(Instruction::Operator(Operator::And));
                rewritten.push(Instruction::Operator(Operator::Or));
                operands.push(rewritten);
                expanded += 1;
            }
            Instruction::Operator(operator) => {
                let rhs = pop(&mut operands, operator, position)?;
                let mut lhs = pop(&mut operands, operator, position)?;
                lhs.extend(rhs);
                lhs.push(Instruction::Operator(operator));
                operands.push(lhs);
            }
        }
    }

    let output = match operands.len() {
        1 => operands.pop().unwrap_or_default(),
        remaining => return Err(EvalError::StackImbalance { remaining }.into()),
    };
    log_debug!(
        component = "desugar",
        event = "xor_expanded",
        xor_count = expanded,
        input = input_len,
        output = output.len(),
    );
    Ok(output)
}

fn pop(
    operands: &mut Vec<Vec<Instruction>>,
    operator: Operator,
    position: usize,
) -> Result<Vec<Instruction>, FilterError> {
    operands.pop().ok_or_else(|| {
        FilterError::Eval(EvalError::StackUnderflow {
            operator: operator.as_str(),
            position,
        })
    })
}

fn negate(operand: &[Instruction], expansion: XorExpansion) -> Vec<Instruction> {
    match (expansion, operand) {
        (XorExpansion::InvertLeaves, [Instruction::Predicate(predicate)]) => {
            vec![Instruction::Predicate(predicate.invert())]
        }
        _ => {
            let mut negated = operand.to_vec();
            negated.push(Instruction::Operator(Operator::Not));
            negated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        option::DEFAULT_MAX_INSTRUCTIONS,
        plan::token::join,
        predicate::{BooleanPredicate, Predicate},
    };

    fn expand(
        program: Vec<Instruction>,
        expansion: XorExpansion,
    ) -> Result<Vec<Instruction>, FilterError> {
        desugar(program, &EngineOption::default().xor_expansion(expansion))
    }

    /// `a0 a1 XOR a2 XOR ...` with `count` XORs.
    fn xor_chain(count: usize) -> Vec<Instruction> {
        let mut program = vec![p("a0")];
        for index in 1..=count {
            program.push(p(&format!("a{index}")));
            program.push(op(Operator::Xor));
        }
        program
    }

    fn p(name: &str) -> Instruction {
        Instruction::Predicate(Predicate::from(BooleanPredicate::new(name)))
    }

    fn op(operator: Operator) -> Instruction {
        Instruction::Operator(operator)
    }

    #[test]
    fn xor_of_predicates_expands_with_not() {
        let program = vec![p("a"), p("b"), op(Operator::Xor)];
        let output = expand(program, XorExpansion::Complement).unwrap();
        assert_eq!(
            join(&output),
            "boolean(a) boolean(b) NOT AND boolean(a) NOT boolean(b) AND OR"
        );
    }

    #[test]
    fn invert_leaves_flips_single_predicates() {
        let program = vec![p("a"), p("b"), op(Operator::Xor)];
        let output = expand(program, XorExpansion::InvertLeaves).unwrap();
        assert_eq!(
            join(&output),
            "boolean(a) ~boolean(b) AND ~boolean(a) boolean(b) AND OR"
        );
    }

    #[test]
    fn compound_operands_are_duplicated_whole() {
        // (a OR b) XOR c
        let program = vec![p("a"), p("b"), op(Operator::Or), p("c"), op(Operator::Xor)];
        let output = expand(program, XorExpansion::InvertLeaves).unwrap();
        assert_eq!(
            join(&output),
            concat!(
                "boolean(a) boolean(b) OR ~boolean(c) AND ",
                "boolean(a) boolean(b) OR NOT boolean(c) AND OR"
            )
        );
    }

    #[test]
    fn nested_xor_leaves_no_xor_behind() {
        let program = vec![
            p("a"),
            p("b"),
            op(Operator::Xor),
            p("c"),
            op(Operator::Xor),
            op(Operator::Not),
        ];
        let output = expand(program, XorExpansion::Complement).unwrap();
        assert!(!output.contains(&op(Operator::Xor)));
        assert_eq!(output.last(), Some(&op(Operator::Not)));
    }

    #[test]
    fn programs_without_xor_pass_through() {
        let program = vec![p("a"), op(Operator::Not), p("b"), op(Operator::And)];
        let output = expand(program.clone(), XorExpansion::Complement).unwrap();
        assert_eq!(output, program);
    }

    #[test]
    fn malformed_programs_are_rejected() {
        assert_eq!(
            expand(vec![p("a"), op(Operator::Xor)], XorExpansion::Complement).unwrap_err(),
            FilterError::Eval(EvalError::StackUnderflow {
                operator: "XOR",
                position: 1
            })
        );
        assert_eq!(
            expand(vec![p("a"), p("b")], XorExpansion::Complement).unwrap_err(),
            FilterError::Eval(EvalError::StackImbalance { remaining: 2 })
        );
    }

    #[test]
    fn xor_chains_grow_until_the_limit() {
        let lengths: Vec<usize> = [4, 8, 12]
            .into_iter()
            .map(|count| {
                expand(xor_chain(count), XorExpansion::Complement)
                    .unwrap()
                    .len()
            })
            .collect();
        assert_eq!(lengths, vec![121, 2041, 32761]);

        // The 14th XOR would produce 131065 instructions.
        let err = expand(xor_chain(16), XorExpansion::Complement).unwrap_err();
        assert_eq!(
            err,
            FilterError::Spec(SpecError::ProgramTooLarge {
                limit: DEFAULT_MAX_INSTRUCTIONS,
                position: 28,
            })
        );
    }

    #[test]
    fn instruction_limit_is_configurable() {
        let tight = EngineOption::default().max_instructions(20);
        assert_eq!(desugar(xor_chain(1), &tight).unwrap().len(), 9);
        assert_eq!(
            desugar(xor_chain(2), &tight).unwrap_err(),
            FilterError::Spec(SpecError::ProgramTooLarge {
                limit: 20,
                position: 4
            })
        );
        let roomy = tight.max_instructions(25);
        assert_eq!(desugar(xor_chain(2), &roomy).unwrap().len(), 25);
    }
}
