//! Common test utilities for integration tests.
#![allow(dead_code)]

use catalog_filter::{
    spec::{ColumnLeaf, GroupNode, Literal, MembershipLeaf},
    EntityRecord, FilterNode, LinkOperator, MemoryDataset, NodeKind,
};

/// Number leaf `column op value`.
pub fn number(column: &str, op: &str, value: f64) -> FilterNode {
    FilterNode::new(NodeKind::Number(ColumnLeaf {
        column_name: Some(column.into()),
        operation: Some(op.into()),
        value: Some(Literal::Number(value)),
        ..ColumnLeaf::default()
    }))
}

/// Boolean leaf on `column`.
pub fn boolean(column: &str) -> FilterNode {
    FilterNode::new(NodeKind::Boolean(ColumnLeaf {
        column_name: Some(column.into()),
        value: Some(Literal::Boolean(true)),
        ..ColumnLeaf::default()
    }))
}

/// Case-insensitive text leaf.
pub fn text(column: &str, op: &str, value: &str) -> FilterNode {
    FilterNode::new(NodeKind::Text(ColumnLeaf {
        column_name: Some(column.into()),
        operation: Some(op.into()),
        value: Some(Literal::Text(value.into())),
        ..ColumnLeaf::default()
    }))
}

pub fn tag(op: &str, value: &str) -> FilterNode {
    FilterNode::new(NodeKind::Tag(MembershipLeaf {
        operation: Some(op.into()),
        value: Some(Literal::Text(value.into())),
        inverted: false,
    }))
}

pub fn color(op: &str, value: &str) -> FilterNode {
    FilterNode::new(NodeKind::Color(MembershipLeaf {
        operation: Some(op.into()),
        value: Some(Literal::Text(value.into())),
        inverted: false,
    }))
}

/// Flips the leaf's or group's own inversion flag.
pub fn inverted(mut node: FilterNode) -> FilterNode {
    match &mut node.kind {
        NodeKind::Text(leaf) | NodeKind::Number(leaf) | NodeKind::Boolean(leaf) => {
            leaf.inverted = !leaf.inverted
        }
        NodeKind::Tag(leaf) | NodeKind::Color(leaf) => leaf.inverted = !leaf.inverted,
        NodeKind::Group(group) => group.inverted = !group.inverted,
    }
    node
}

/// Sets `showNull` on a column leaf.
pub fn show_null(mut node: FilterNode) -> FilterNode {
    if let NodeKind::Text(leaf) | NodeKind::Number(leaf) | NodeKind::Boolean(leaf) =
        &mut node.kind
    {
        leaf.show_null = true;
    }
    node
}

pub fn group(filters: Vec<FilterNode>) -> FilterNode {
    FilterNode::new(NodeKind::Group(GroupNode {
        inverted: false,
        filters,
    }))
}

/// Joins `first` and each `(operator, node)` pair into a sibling list.
pub fn chain(first: FilterNode, rest: Vec<(LinkOperator, FilterNode)>) -> Vec<FilterNode> {
    std::iter::once(first)
        .chain(rest.into_iter().map(|(operator, node)| node.linked(operator)))
        .collect()
}

/// Deterministic catalog with nulls, mixed tags and colors.
pub fn random_catalog(seed: u64, size: u32) -> MemoryDataset {
    let mut rng = fastrand::Rng::with_seed(seed);
    let names = ["Golden Rain", "silver rain", "Rainbow", "Comet", "comet tail"];
    let tags = ["x", "y", "z"];
    let colors = ["red", "green", "blue"];

    let mut builder = MemoryDataset::builder().columns(["price", "weight", "fan", "name"]);
    for id in 0..size {
        let mut record = EntityRecord::new(id);
        if rng.u8(0..10) > 0 {
            record = record.field("price", f64::from(rng.u32(0..2000)));
        }
        if rng.u8(0..10) > 1 {
            record = record.field("weight", f64::from(rng.u32(0..1000)));
        }
        if rng.u8(0..10) > 1 {
            record = record.field("fan", rng.bool());
        }
        if rng.u8(0..10) > 2 {
            record = record.field("name", names[rng.usize(0..names.len())]);
        }
        for _ in 0..rng.usize(0..4) {
            record = record.tag(tags[rng.usize(0..tags.len())]);
        }
        for _ in 0..rng.usize(0..3) {
            record = record.color(colors[rng.usize(0..colors.len())]);
        }
        builder = builder.entity(record);
    }
    // Guarantees every tag and color exists, so membership leaves never miss.
    let mut anchor = EntityRecord::new(size);
    for name in tags {
        anchor = anchor.tag(name);
    }
    for name in colors {
        anchor = anchor.color(name);
    }
    builder.entity(anchor).build()
}

/// Pool of leaves exercising every predicate kind.
pub fn leaf_pool() -> Vec<FilterNode> {
    vec![
        number("price", "<", 1000.0),
        show_null(number("price", ">=", 500.0)),
        inverted(number("weight", ">", 500.0)),
        boolean("fan"),
        show_null(inverted(boolean("fan"))),
        text("name", "contains", "RAIN"),
        show_null(text("name", "startswith", "com")),
        tag("has", "x"),
        inverted(tag("has", "y")),
        tag("has_only", "z"),
        inverted(color("has_only", "red")),
        color("has", "blue"),
    ]
}
