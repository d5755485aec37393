//! Query tree compiler
//!
//! Walks a [`QueryNode`] tree depth-first and produces a single predicate plus
//! the joins the predicate's columns need. Field resolution, casting and
//! predicate construction are delegated to the resolver and node builders;
//! this module only orchestrates them.
//!
//! # Example
//!
//! ```
//! use lucene_select::query::{ComparisonOp, QueryCompiler, QueryNode};
//! use lucene_select::testing::fixtures;
//!
//! let compiler = QueryCompiler::new(fixtures::hero())
//!     .with_relationships(fixtures::hero_relationships());
//!
//! let tree = QueryNode::and(
//!     QueryNode::term("team.name", "Preventers"),
//!     QueryNode::compare("age", ComparisonOp::Gt, "40"),
//! );
//! let compiled = compiler.compile(&tree).unwrap();
//!
//! assert_eq!(compiled.joins.len(), 1);
//! assert_eq!(
//!     compiled.predicate.to_string(),
//!     "(team.name LIKE '%Preventers%' AND hero.age > 40)"
//! );
//! ```

use crate::config::CompilerConfig;
use crate::error::FilterError;
use crate::query::ast::{FieldPath, QueryNode};
use crate::query::nodes::{
    BoolCombinator, ComparisonPredicate, RangeBound, RangePredicate, TermPredicate,
};
use crate::query::predicate::Predicate;
use crate::query::resolver::{FieldResolver, JoinPlan, JoinStep, ResolvedField};
use crate::schema::{Model, RelationshipMap};
use crate::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of compiling one query tree
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub predicate: Predicate,
    /// Deduplicated joins in first-encountered order
    pub joins: Vec<JoinStep>,
}

/// Per-call compilation state
struct CompileContext {
    joins: JoinPlan,
    depth: usize,
    max_depth: Option<usize>,
}

impl CompileContext {
    fn new(max_depth: Option<usize>) -> Self {
        Self {
            joins: JoinPlan::new(),
            depth: 0,
            max_depth,
        }
    }

    fn enter(&mut self) -> Result<()> {
        if let Some(limit) = self.max_depth {
            if self.depth >= limit {
                return Err(FilterError::DepthExceeded(limit));
            }
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// Compiles query trees against one root model
///
/// Holds only immutable configuration, so a single compiler can be shared
/// between threads; every [`compile`](Self::compile) call owns its join
/// accumulator.
#[derive(Clone, Debug)]
pub struct QueryCompiler {
    root: Arc<Model>,
    relationships: RelationshipMap,
    config: CompilerConfig,
}

impl QueryCompiler {
    /// Create a compiler for `root` with no traversable relationships
    pub fn new(root: Arc<Model>) -> Self {
        Self {
            root,
            relationships: RelationshipMap::new(),
            config: CompilerConfig::default(),
        }
    }

    /// Set the relationships dotted paths may traverse
    pub fn with_relationships(mut self, relationships: RelationshipMap) -> Self {
        self.relationships = relationships;
        self
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root(&self) -> &Arc<Model> {
        &self.root
    }

    pub fn relationships(&self) -> &RelationshipMap {
        &self.relationships
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a query tree into a predicate and its joins
    pub fn compile(&self, tree: &QueryNode) -> Result<CompiledQuery> {
        debug!(root = %self.root.name, node = tree.kind(), "Compiling query tree");

        let mut ctx = CompileContext::new(self.config.max_depth);
        match self.compile_node(tree, &mut ctx) {
            Ok(predicate) => {
                let joins = ctx.joins.into_steps();
                debug!(
                    root = %self.root.name,
                    joins = joins.len(),
                    predicate = %predicate,
                    "Compiled query tree"
                );
                Ok(CompiledQuery { predicate, joins })
            }
            Err(err) => {
                warn!(root = %self.root.name, kind = err.kind(), error = %err, "Query compilation failed");
                Err(err)
            }
        }
    }

    fn compile_node(&self, node: &QueryNode, ctx: &mut CompileContext) -> Result<Predicate> {
        ctx.enter()?;
        debug!(node = node.kind(), depth = ctx.depth, "Compiling node");
        let result = self.dispatch(node, ctx);
        ctx.leave();
        result
    }

    fn dispatch(&self, node: &QueryNode, ctx: &mut CompileContext) -> Result<Predicate> {
        match node {
            QueryNode::Term {
                field,
                value,
                quoted,
            } => {
                let field = self.resolve(field, ctx)?;
                TermPredicate::build(&field, value, *quoted, &self.config.like)
            }

            QueryNode::Comparison { field, op, value } => {
                let field = self.resolve(field, ctx)?;
                ComparisonPredicate::build(&field, *op, value)
            }

            QueryNode::Range {
                field,
                lo,
                hi,
                lo_inclusive,
                hi_inclusive,
            } => {
                let field = self.resolve(field, ctx)?;
                RangePredicate::build(
                    &field,
                    RangeBound::new(lo, *lo_inclusive),
                    RangeBound::new(hi, *hi_inclusive),
                )
            }

            QueryNode::Boolean { op, children } => {
                let compiled = children
                    .iter()
                    .map(|child| self.compile_node(child, ctx))
                    .collect::<Result<Vec<_>>>()?;
                BoolCombinator::combine(*op, compiled)
            }

            QueryNode::Group { child } => {
                let inner = self.compile_node(child, ctx)?;
                Ok(BoolCombinator::group(inner))
            }

            QueryNode::FieldGroup { .. }
            | QueryNode::Fuzzy { .. }
            | QueryNode::Proximity { .. }
            | QueryNode::Boost { .. }
            | QueryNode::Regex { .. } => Err(FilterError::UnsupportedNode(node.kind().to_string())),
        }
    }

    /// Resolve one field path, planning the joins it needs in `joins`
    pub fn resolve_field(&self, path: &FieldPath, joins: &mut JoinPlan) -> Result<ResolvedField> {
        FieldResolver::new(&self.root, &self.relationships)
            .with_join_kind(self.config.join_kind)
            .resolve(path, joins)
    }

    fn resolve(&self, path: &FieldPath, ctx: &mut CompileContext) -> Result<ResolvedField> {
        self.resolve_field(path, &mut ctx.joins)
    }
}
