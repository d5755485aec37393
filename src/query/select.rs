//! One-call query-to-statement conversion
//!
//! [`SelectBuilder`] bundles a compiler with statement assembly. [`to_select`]
//! adds the parsing step through a caller-supplied [`QueryStringParser`], so
//! raw user input can go straight to a [`StatementDescriptor`].

use crate::config::CompilerConfig;
use crate::query::ast::{FieldPath, QueryNode};
use crate::query::compiler::QueryCompiler;
use crate::query::resolver::{ColumnRef, JoinPlan, JoinStep};
use crate::query::statement::{Entity, Selection, StatementAssembler, StatementDescriptor};
use crate::schema::{Model, RelationshipMap};
use crate::Result;
use std::sync::Arc;
use tracing::debug;

/// Turns raw query text into a [`QueryNode`] tree
///
/// The crate does not ship a Lucene query-string parser; callers plug theirs
/// in here. Any `Fn(&str) -> Result<QueryNode>` qualifies.
pub trait QueryStringParser {
    fn parse_query(&self, input: &str) -> Result<QueryNode>;
}

impl<F> QueryStringParser for F
where
    F: Fn(&str) -> Result<QueryNode>,
{
    fn parse_query(&self, input: &str) -> Result<QueryNode> {
        self(input)
    }
}

/// Compiles trees and assembles statements for one root model
#[derive(Clone, Debug)]
pub struct SelectBuilder {
    compiler: QueryCompiler,
}

impl SelectBuilder {
    pub fn new(root: Arc<Model>) -> Self {
        Self {
            compiler: QueryCompiler::new(root),
        }
    }

    pub fn with_relationships(mut self, relationships: RelationshipMap) -> Self {
        self.compiler = self.compiler.with_relationships(relationships);
        self
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.compiler = self.compiler.with_config(config);
        self
    }

    pub fn compiler(&self) -> &QueryCompiler {
        &self.compiler
    }

    /// Column reached by a dotted field path, qualified by its join alias
    ///
    /// Use it in [`Entity::Column`] or [`Entity::aggregate`]; [`build`](Self::build)
    /// adds whatever joins the path needs.
    pub fn column(&self, path: impl Into<FieldPath>) -> Result<ColumnRef> {
        let mut scratch = JoinPlan::new();
        Ok(self.compiler.resolve_field(&path.into(), &mut scratch)?.column)
    }

    /// Build a statement, constrained by `tree` when one is given
    ///
    /// Selected columns on joined models bring their joins along when the
    /// query itself did not need them.
    pub fn build(&self, tree: Option<&QueryNode>, selection: Selection) -> Result<StatementDescriptor> {
        let root = self.compiler.root().clone();
        let mut joins = JoinPlan::new();
        let predicate = match tree {
            Some(tree) => {
                let compiled = self.compiler.compile(tree)?;
                for step in compiled.joins {
                    joins.push(step);
                }
                Some(compiled.predicate)
            }
            None => None,
        };

        if let Selection::Entities(entities) = &selection {
            for column in entities.iter().filter_map(Entity::column_ref) {
                self.join_selected(column, &mut joins);
            }
        }

        StatementAssembler::assemble(root, joins.into_steps(), predicate, selection)
    }

    /// Plan the joins named by a selected column's alias, if missing
    ///
    /// Columns whose alias is no relationship path of the root are left for
    /// the assembler to reject.
    fn join_selected(&self, column: &ColumnRef, joins: &mut JoinPlan) {
        let planned = column.qualifier == self.compiler.root().table
            || joins.steps().iter().any(|step| step.alias == column.qualifier);
        if planned {
            return;
        }

        let mut segments = JoinStep::path_of(&column.qualifier);
        segments.push(column.column.clone());
        let mut extended = joins.clone();
        match self
            .compiler
            .resolve_field(&FieldPath::from_segments(segments), &mut extended)
        {
            Ok(field) if field.column.model == column.model => *joins = extended,
            _ => debug!(column = %column, "Selected column matches no relationship path"),
        }
    }
}

/// Parse, compile and assemble in one call
///
/// Blank input selects everything without calling the parser.
pub fn to_select<P>(
    input: &str,
    parser: &P,
    builder: &SelectBuilder,
    selection: Selection,
) -> Result<StatementDescriptor>
where
    P: QueryStringParser + ?Sized,
{
    if input.trim().is_empty() {
        debug!("Blank query, selecting without constraint");
        return builder.build(None, selection);
    }
    let tree = parser.parse_query(input)?;
    builder.build(Some(&tree), selection)
}
