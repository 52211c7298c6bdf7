use crate::{
    error::SpecError,
    observability::log_debug,
    option::EngineOption,
    predicate::{
        BooleanPredicate, MembershipOp, MembershipPredicate, NumberPredicate, Predicate,
        TextPredicate,
    },
    spec::{ColumnLeaf, FilterNode, Literal, MembershipLeaf, NodeKind},
};

use super::token::{Operator, Paren, Token};

/// Flattens a sibling list into an infix token stream, depth-first.
///
/// A group's own inversion becomes a `NOT` token right before its `(`.
pub fn tokenize(filters: &[FilterNode], option: &EngineOption) -> Result<Vec<Token>, SpecError> {
    let mut tokens = Vec::new();
    tokenize_into(filters, option, &mut tokens)?;
    log_debug!(
        component = "tokenizer",
        event = "tokens_emitted",
        siblings = filters.len(),
        tokens = tokens.len(),
    );
    Ok(tokens)
}

fn tokenize_into(
    filters: &[FilterNode],
    option: &EngineOption,
    tokens: &mut Vec<Token>,
) -> Result<(), SpecError> {
    for (index, node) in filters.iter().enumerate() {
        // The first sibling's operator, if any, links to nothing.
        if index > 0 {
            let operator = node.operator.ok_or(SpecError::MissingOperator {
                position: tokens.len(),
            })?;
            tokens.push(Token::Operator(operator.into()));
        }
        let predicate = match &node.kind {
            NodeKind::Group(group) => {
                if group.inverted {
                    tokens.push(Token::Operator(Operator::Not));
                }
                tokens.push(Token::Paren(Paren::Open));
                tokenize_into(&group.filters, option, tokens)?;
                tokens.push(Token::Paren(Paren::Close));
                continue;
            }
            NodeKind::Text(leaf) => text(leaf, option)?,
            NodeKind::Number(leaf) => number(leaf, option)?,
            NodeKind::Boolean(leaf) => boolean(leaf, option)?,
            NodeKind::Tag(leaf) => Predicate::Tag(membership(leaf, "tag")?),
            NodeKind::Color(leaf) => Predicate::Color(membership(leaf, "color")?),
        };
        tokens.push(Token::Predicate(predicate));
    }
    Ok(())
}

fn text(leaf: &ColumnLeaf, option: &EngineOption) -> Result<Predicate, SpecError> {
    let column = column(leaf, "text", option)?;
    let op = operation(leaf.operation.as_deref(), "text")?.parse()?;
    let value = value(leaf.value.as_ref(), "text")?.to_text();
    Ok(TextPredicate::new(column, op, value, leaf.case_sensitive)?
        .inverted(leaf.inverted)
        .show_null(leaf.show_null)
        .into())
}

fn number(leaf: &ColumnLeaf, option: &EngineOption) -> Result<Predicate, SpecError> {
    let column = column(leaf, "number", option)?;
    let op = operation(leaf.operation.as_deref(), "number")?.parse()?;
    let literal = value(leaf.value.as_ref(), "number")?;
    let number = literal.to_number().ok_or_else(|| SpecError::InvalidValue {
        kind: "number",
        value: literal.to_text(),
    })?;
    Ok(NumberPredicate::new(column, op, number)
        .inverted(leaf.inverted)
        .show_null(leaf.show_null)
        .into())
}

/// The literal value is kept on the predicate but never consulted.
fn boolean(leaf: &ColumnLeaf, option: &EngineOption) -> Result<Predicate, SpecError> {
    let column = column(leaf, "boolean", option)?;
    match leaf.operation.as_deref().map(str::trim) {
        None | Some("is") | Some("==") => {}
        Some(other) => {
            return Err(SpecError::UnknownOperation {
                kind: "boolean",
                operation: other.to_owned(),
            })
        }
    }
    Ok(BooleanPredicate::new(column)
        .value(leaf.value.as_ref().is_some_and(Literal::to_bool))
        .inverted(leaf.inverted)
        .show_null(leaf.show_null)
        .into())
}

fn column(
    leaf: &ColumnLeaf,
    kind: &'static str,
    option: &EngineOption,
) -> Result<String, SpecError> {
    leaf.column_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(|name| option.resolve_column(name).to_owned())
        .ok_or(SpecError::MissingColumn { kind })
}

fn operation<'a>(operation: Option<&'a str>, kind: &'static str) -> Result<&'a str, SpecError> {
    operation.ok_or(SpecError::MissingOperation { kind })
}

fn value<'a>(value: Option<&'a Literal>, kind: &'static str) -> Result<&'a Literal, SpecError> {
    value.ok_or_else(|| SpecError::InvalidValue {
        kind,
        value: "null".to_owned(),
    })
}

fn membership(leaf: &MembershipLeaf, kind: &'static str) -> Result<MembershipPredicate, SpecError> {
    let op: MembershipOp = operation(leaf.operation.as_deref(), kind)?
        .parse()
        .map_err(|_| SpecError::UnknownOperation {
            kind,
            operation: leaf.operation.clone().unwrap_or_default(),
        })?;
    let value = value(leaf.value.as_ref(), kind)?.to_text();
    Ok(MembershipPredicate::new(op, value).inverted(leaf.inverted))
}
