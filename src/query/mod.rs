//! Query compilation
//!
//! Turns a Lucene-style query tree into a predicate over a relational model:
//! - Term queries (`name:Spider`, `name:"Spider-Boy"`, `name:*`)
//! - Comparison queries (`age:>40`)
//! - Range queries (`age:[18 TO 30}`)
//! - Boolean queries (AND, OR, NOT, grouping)
//! - Dotted relationship paths (`team.headquarter.name`), compiled to joins
//!
//! # Example
//!
//! ```json
//! {
//!   "query": {
//!     "not": [
//!       { "term": { "name": "Rusty" } },
//!       { "term": { "age": 47 } }
//!     ]
//!   }
//! }
//! ```

pub mod ast;
pub mod cast;
pub mod compiler;
pub mod dsl;
pub mod nodes;
pub mod predicate;
pub mod render;
pub mod resolver;
pub mod select;
pub mod statement;
pub mod types;

pub use ast::{FieldPath, QueryNode};
pub use cast::ValueCaster;
pub use compiler::{CompiledQuery, QueryCompiler};
pub use dsl::QueryParser;
pub use predicate::Predicate;
pub use render::{RenderedSql, SqlRenderer};
pub use resolver::{ColumnRef, FieldResolver, JoinPlan, JoinStep, ResolvedField};
pub use select::{to_select, QueryStringParser, SelectBuilder};
pub use statement::{AggregateFunction, Entity, Selection, StatementAssembler, StatementDescriptor};
pub use types::*;
