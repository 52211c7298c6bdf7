mod common;

use catalog_filter::{
    plan::{parse, Paren},
    predicate::BooleanPredicate,
    EngineOption, EntityRecord, FilterEngine, FilterError, FilterQuery, LinkOperator,
    MemoryDataset, ParseError, Predicate, PredicateError, SpecError, Token,
    DEFAULT_MAX_INSTRUCTIONS,
};
use common::{boolean, chain, color, group, inverted, number, tag, text};

fn gadgets() -> MemoryDataset {
    MemoryDataset::builder()
        .entity(
            EntityRecord::new(1)
                .field("price", 400.0)
                .field("weight", 100.0)
                .field("fan", false)
                .field("name", "Desk Lamp"),
        )
        .entity(
            EntityRecord::new(2)
                .field("price", 1500.0)
                .field("weight", 800.0)
                .field("fan", false)
                .field("name", "Cabinet"),
        )
        .entity(
            EntityRecord::new(3)
                .field("price", 900.0)
                .field("weight", 50.0)
                .field("fan", true)
                .field("name", "Desk Fan"),
        )
        .entity(
            EntityRecord::new(4)
                .field("price", 2500.0)
                .field("weight", 200.0)
                .field("fan", false)
                .field("name", "Server"),
        )
        .entity(EntityRecord::new(5).field("weight", 900.0).field("fan", true))
        .build()
}

#[test]
fn price_or_weight_and_not_fan() {
    let nodes = vec![
        group(chain(
            number("price", "<", 1000.0),
            vec![(LinkOperator::Or, number("weight", ">", 500.0))],
        )),
        inverted(boolean("fan")).linked(LinkOperator::And),
    ];
    let matched = FilterEngine::default()
        .run(&FilterQuery::new(nodes, false), &gadgets())
        .unwrap();
    assert_eq!(matched.to_vec(), vec![1, 2]);
}

#[test]
fn availability_and_rating_from_json() {
    let dataset = MemoryDataset::from_json(
        r#"{"columns": ["availability", "rating"], "entities": [
            {"id": 1, "fields": {"availability": true, "rating": false}},
            {"id": 2, "fields": {"availability": true, "rating": true}},
            {"id": 3, "fields": {"availability": false, "rating": true}}
        ]}"#,
    )
    .unwrap();
    let query = FilterQuery::from_json(
        r#"{"inverted": false, "filters": [
            {"type": "boolean", "columnName": "availability", "operator": "and", "showNull": null},
            {"type": "boolean", "columnName": "rating", "operator": "and", "showNull": null}
        ]}"#,
    )
    .unwrap();
    let engine = FilterEngine::default();
    assert_eq!(engine.run(&query, &dataset).unwrap().to_vec(), vec![2]);

    let negated = FilterQuery::new(query.filters, true);
    assert_eq!(engine.run(&negated, &dataset).unwrap().to_vec(), vec![1, 3]);
}

#[test]
fn has_only_requires_a_single_row() {
    let dataset = MemoryDataset::builder()
        .entity(EntityRecord::new(1).tag("x"))
        .entity(EntityRecord::new(2).tag("x").tag("y"))
        .entity(EntityRecord::new(3).tag("y"))
        .build();
    let engine = FilterEngine::default();

    let only = FilterQuery::new(vec![tag("has_only", "x")], false);
    assert_eq!(engine.run(&only, &dataset).unwrap().to_vec(), vec![1]);

    let has = FilterQuery::new(vec![tag("has", "x")], false);
    assert_eq!(engine.run(&has, &dataset).unwrap().to_vec(), vec![1, 2]);

    let more_than_one = FilterQuery::new(vec![inverted(tag("has_only", "x"))], false);
    assert_eq!(engine.run(&more_than_one, &dataset).unwrap().to_vec(), vec![2]);
}

#[test]
fn missing_relation_values_match_nothing() {
    let dataset = MemoryDataset::builder()
        .entity(EntityRecord::new(1).field("price", 10.0).color("red"))
        .entity(EntityRecord::new(2).field("price", 20.0))
        .build();
    let query = FilterQuery::new(
        chain(
            color("has", "ultraviolet"),
            vec![(LinkOperator::Or, number("price", ">", 15.0))],
        ),
        false,
    );
    let matched = FilterEngine::default().run(&query, &dataset).unwrap();
    assert_eq!(matched.to_vec(), vec![2]);
}

#[test]
fn text_matching_respects_case_option() {
    let dataset = gadgets();
    let engine = FilterEngine::default();

    let loose = FilterQuery::new(vec![text("name", "startswith", "desk")], false);
    assert_eq!(engine.run(&loose, &dataset).unwrap().to_vec(), vec![1, 3]);

    let query = FilterQuery::from_json(
        r#"[{"type": "text", "columnName": "name", "operation": "startswith",
             "value": "desk", "caseSensitive": true}]"#,
    )
    .unwrap();
    assert!(engine.run(&query, &dataset).unwrap().is_empty());
}

#[test]
fn column_aliases_resolve_before_validation() {
    let engine = FilterEngine::new(EngineOption::default().column_alias("cost", "price"));
    let query = FilterQuery::new(vec![number("cost", "<=", 900.0)], false);
    assert_eq!(engine.run(&query, &gadgets()).unwrap().to_vec(), vec![1, 3]);
}

#[test]
fn unknown_column_aborts_the_run() {
    let query = FilterQuery::new(
        chain(
            boolean("fan"),
            vec![(LinkOperator::And, number("voltage", ">", 5.0))],
        ),
        false,
    );
    let err = FilterEngine::default().run(&query, &gadgets()).unwrap_err();
    assert_eq!(
        err,
        FilterError::Predicate(PredicateError::UnknownColumn("voltage".into()))
    );
}

#[test]
fn unclosed_group_is_reported() {
    let fan = Token::Predicate(Predicate::from(BooleanPredicate::new("fan")));
    let err = parse(vec![Token::Paren(Paren::Open), fan]).unwrap_err();
    assert_eq!(err, ParseError::UnclosedGroup { position: 0 });
}

#[test]
fn long_xor_chains_hit_the_instruction_limit() {
    let xor_chain = || {
        let rest = vec![(LinkOperator::Xor, boolean("fan")); 16];
        FilterQuery::new(chain(boolean("fan"), rest), false)
    };
    let err = FilterEngine::default().compile(&xor_chain()).unwrap_err();
    assert!(matches!(
        err,
        FilterError::Spec(SpecError::ProgramTooLarge {
            limit: DEFAULT_MAX_INSTRUCTIONS,
            ..
        })
    ));

    let roomy = FilterEngine::new(EngineOption::default().max_instructions(1 << 20));
    let plan = roomy.compile(&xor_chain()).unwrap();
    assert_eq!(plan.instructions().len(), 524_281);
}

#[test]
fn sibling_without_operator_is_rejected() {
    let query = FilterQuery::new(vec![boolean("fan"), boolean("fan")], false);
    let err = FilterEngine::default().compile(&query).unwrap_err();
    assert_eq!(
        err,
        FilterError::Spec(SpecError::MissingOperator { position: 1 })
    );
}
