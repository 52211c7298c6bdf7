//! Boolean filter expression engine for catalog datasets.
//!
//! A user-authored [`FilterQuery`] (nested groups of per-field predicates
//! joined by AND/OR/XOR, each node optionally inverted) is compiled into a
//! [`Plan`] and executed against any [`Dataset`], yielding the exact
//! [`EntitySet`] of matching entities.
//!
//! ```
//! use catalog_filter::{EntityRecord, FilterEngine, FilterQuery, MemoryDataset};
//!
//! let dataset = MemoryDataset::builder()
//!     .entity(EntityRecord::new(1).field("price", 400.0).field("fan", false))
//!     .entity(EntityRecord::new(2).field("price", 2000.0).field("fan", false))
//!     .build();
//! let query = FilterQuery::from_json(
//!     r#"[
//!         {"type": "number", "columnName": "price", "operation": "<", "value": 1000},
//!         {"type": "boolean", "columnName": "fan", "operator": "and", "inverted": true}
//!     ]"#,
//! )?;
//! let matched = FilterEngine::default().run(&query, &dataset)?;
//! assert_eq!(matched.to_vec(), vec![1]);
//! # Ok::<(), catalog_filter::FilterError>(())
//! ```

pub mod dataset;
mod engine;
/// Error types for every stage of the pipeline.
pub mod error;
pub mod evaluator;
mod observability;
mod option;
pub mod plan;
pub mod predicate;
mod set;
pub mod spec;

pub use dataset::{Dataset, EntityRecord, MemoryDataset, Relation, Value, ValueRef};
pub use engine::FilterEngine;
pub use error::{EvalError, FilterError, ParseError, PredicateError, SpecError};
pub use option::{EngineOption, XorExpansion, DEFAULT_MAX_INSTRUCTIONS};
pub use plan::{Instruction, Operator, Plan, Token};
pub use predicate::Predicate;
pub use set::{EntityId, EntityIdIter, EntitySet};
pub use spec::{FilterNode, FilterQuery, LinkOperator, NodeKind};
