//! Stack machine executing desugared postfix programs.

use crate::{
    dataset::Dataset,
    error::{EvalError, FilterError, PredicateError},
    observability::{log_debug, log_warn},
    plan::token::{Instruction, Operator},
    set::EntitySet,
};

/// Executes `program` against `dataset`.
///
/// `NOT` complements against the dataset's full universe. When `inverted`
/// is set, one trailing `NOT` is applied to the whole program. An empty
/// program selects every entity, inverted or not.
///
/// A predicate naming an absent tag or color contributes an empty set; an
/// unknown column aborts the evaluation.
pub fn evaluate<D>(
    program: &[Instruction],
    dataset: &D,
    inverted: bool,
) -> Result<EntitySet, FilterError>
where
    D: Dataset + ?Sized,
{
    if program.is_empty() {
        return Ok(dataset.universe());
    }

    let trailing_not = Instruction::Operator(Operator::Not);
    let instructions = program
        .iter()
        .chain(inverted.then_some(&trailing_not));

    let mut universe: Option<EntitySet> = None;
    let mut stack: Vec<EntitySet> = Vec::new();

    for (position, instruction) in instructions.enumerate() {
        match instruction {
            Instruction::Predicate(predicate) => {
                let matched = match predicate.evaluate(dataset) {
                    Ok(matched) => matched,
                    Err(PredicateError::LookupMiss { relation, name }) => {
                        log_debug!(
                            component = "evaluator",
                            event = "lookup_miss",
                            relation,
                            name = %name,
                        );
                        EntitySet::new()
                    }
                    Err(err) => return Err(err.into()),
                };
                stack.push(matched);
            }
            Instruction::Operator(Operator::Not) => {
                let operand = pop(&mut stack, Operator::Not, position)?;
                let universe = universe.get_or_insert_with(|| dataset.universe());
                stack.push(operand.complement(universe));
            }
            Instruction::Operator(Operator::And) => {
                let rhs = pop(&mut stack, Operator::And, position)?;
                let lhs = pop(&mut stack, Operator::And, position)?;
                stack.push(lhs.intersect(&rhs));
            }
            Instruction::Operator(Operator::Or) => {
                let rhs = pop(&mut stack, Operator::Or, position)?;
                let lhs = pop(&mut stack, Operator::Or, position)?;
                stack.push(lhs.union(&rhs));
            }
            Instruction::Operator(Operator::Xor) => {
                return Err(invariant(EvalError::UnexpandedXor { position }));
            }
        }
    }

    if stack.len() != 1 {
        return Err(invariant(EvalError::StackImbalance {
            remaining: stack.len(),
        }));
    }
    let matched = stack.pop().unwrap_or_default();
    log_debug!(
        component = "evaluator",
        event = "program_evaluated",
        instructions = program.len(),
        inverted,
        matched = matched.len(),
    );
    Ok(matched)
}

fn pop(
    stack: &mut Vec<EntitySet>,
    operator: Operator,
    position: usize,
) -> Result<EntitySet, FilterError> {
    stack.pop().ok_or_else(|| {
        invariant(EvalError::StackUnderflow {
            operator: operator.as_str(),
            position,
        })
    })
}

fn invariant(err: EvalError) -> FilterError {
    log_warn!(
        component = "evaluator",
        event = "invariant_violated",
        error = %err,
    );
    FilterError::Eval(err)
}
