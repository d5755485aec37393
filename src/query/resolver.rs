//! Field resolution
//!
//! Resolves dotted field paths against a root model and a relationship map,
//! producing a concrete column and the join steps needed to reach it.

use super::ast::FieldPath;
use crate::config::JoinKind;
use crate::error::FilterError;
use crate::schema::{check_relationship_name, Model, RelationshipKind, RelationshipMap, SemanticType};
use crate::Result;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A column addressed through a table qualifier
///
/// The qualifier is the root table name for root columns and the join alias
/// for columns on joined models.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnRef {
    /// Table name or join alias used in SQL
    pub qualifier: String,
    /// Name of the model the column belongs to
    pub model: String,
    /// Column name
    pub column: String,
    /// Declared semantic type
    pub ty: SemanticType,
}

impl ColumnRef {
    /// Reference a column of a model addressed by its own table name
    pub fn of(model: &Model, column: &str) -> Result<Self> {
        Self::qualified(model, column, &model.table)
    }

    /// Reference a column of the model reached through `join`
    pub fn joined(model: &Model, column: &str, join: &JoinStep) -> Result<Self> {
        if model.name != join.to_model {
            return Err(FilterError::InvalidRequest(format!(
                "join {} reaches {}, not {}",
                join.alias, join.to_model, model.name
            )));
        }
        Self::qualified(model, column, &join.alias)
    }

    fn qualified(model: &Model, column: &str, qualifier: &str) -> Result<Self> {
        let col = model.find_column(column).ok_or_else(|| {
            FilterError::unknown_field(column, format!("no such column on {}", model.name))
        })?;
        Ok(Self {
            qualifier: qualifier.to_string(),
            model: model.name.clone(),
            column: col.name.clone(),
            ty: col.ty,
        })
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.qualifier, self.column)
    }
}

/// One relationship traversal
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JoinStep {
    /// Relationship path from the root, e.g. `["team", "headquarter"]`
    pub path: Vec<String>,
    pub from_model: String,
    pub to_model: String,
    pub to_table: String,
    /// Alias of the joined table, derived from the path
    pub alias: String,
    pub kind: JoinKind,
    /// Join condition: `on.0 = on.1`
    pub on: (ColumnRef, ColumnRef),
}

impl JoinStep {
    /// Alias for a relationship path (`team__headquarter`)
    pub fn alias_for(path: &[String]) -> String {
        path.join(ALIAS_SEPARATOR)
    }

    /// Relationship path encoded in an alias, the inverse of [`alias_for`](Self::alias_for)
    pub fn path_of(alias: &str) -> Vec<String> {
        alias.split(ALIAS_SEPARATOR).map(str::to_string).collect()
    }
}

pub(crate) const ALIAS_SEPARATOR: &str = "__";

/// Ordered, deduplicated join accumulator for one compile call
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JoinPlan {
    steps: Vec<JoinStep>,
}

impl JoinPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step unless one with the same path is already present
    ///
    /// Returns `true` if the step was added.
    pub fn push(&mut self, step: JoinStep) -> bool {
        if self.contains(&step.path) {
            trace!(alias = %step.alias, "join already planned");
            return false;
        }
        trace!(alias = %step.alias, to = %step.to_model, "planning join");
        self.steps.push(step);
        true
    }

    /// Check whether a relationship path is already joined
    pub fn contains(&self, path: &[String]) -> bool {
        self.steps.iter().any(|s| s.path == path)
    }

    pub fn steps(&self) -> &[JoinStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<JoinStep> {
        self.steps
    }
}

/// A field path bound to a concrete column
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedField {
    pub path: FieldPath,
    /// Model that owns the column
    pub model: Arc<Model>,
    pub column: ColumnRef,
    /// Join steps from the root, in traversal order
    pub joins: Vec<JoinStep>,
}

impl ResolvedField {
    pub fn ty(&self) -> SemanticType {
        self.column.ty
    }
}

/// Resolves field paths against a root model
pub struct FieldResolver<'a> {
    root: &'a Arc<Model>,
    relationships: &'a RelationshipMap,
    join_kind: JoinKind,
}

impl<'a> FieldResolver<'a> {
    pub fn new(root: &'a Arc<Model>, relationships: &'a RelationshipMap) -> Self {
        Self {
            root,
            relationships,
            join_kind: JoinKind::default(),
        }
    }

    /// Set the join kind recorded on produced steps
    pub fn with_join_kind(mut self, join_kind: JoinKind) -> Self {
        self.join_kind = join_kind;
        self
    }

    /// Resolve `path`, registering every traversed relationship in `joins`
    pub fn resolve(&self, path: &FieldPath, joins: &mut JoinPlan) -> Result<ResolvedField> {
        let field = path.to_string();
        if path.is_empty() || path.segments().iter().any(|s| s.is_empty()) {
            return Err(FilterError::unknown_field(field, "empty field path segment"));
        }

        let mut current = self.root.clone();
        let mut qualifier = self.root.table.clone();
        let mut traversed: Vec<String> = Vec::new();
        let mut steps = Vec::new();

        for segment in path.relationships() {
            let target = self.relationships.get(segment).ok_or_else(|| {
                FilterError::unknown_field(
                    &field,
                    format!("'{}' is not in the relationship map", segment),
                )
            })?;
            let rel = current.find_relationship(segment).ok_or_else(|| {
                FilterError::unknown_field(
                    &field,
                    format!("{} declares no relationship '{}'", current.name, segment),
                )
            })?;
            if rel.target != target.name {
                return Err(FilterError::unknown_field(
                    &field,
                    format!(
                        "relationship '{}' on {} leads to {}, but the map supplies {}",
                        segment, current.name, rel.target, target.name
                    ),
                ));
            }

            check_relationship_name(segment).map_err(|reason| {
                FilterError::unknown_field(&field, reason)
            })?;
            traversed.push(segment.clone());
            let alias = JoinStep::alias_for(&traversed);
            if alias == self.root.table {
                return Err(FilterError::Schema(format!(
                    "join alias '{}' collides with root table {}",
                    alias, self.root.table
                )));
            }
            let on = match &rel.kind {
                RelationshipKind::ManyToOne { foreign_key } => (
                    join_key(&current, foreign_key, &qualifier, segment)?,
                    join_key(target, &target.primary_key, &alias, segment)?,
                ),
                RelationshipKind::OneToMany { foreign_key } => (
                    join_key(&current, &current.primary_key, &qualifier, segment)?,
                    join_key(target, foreign_key, &alias, segment)?,
                ),
            };

            let step = JoinStep {
                path: traversed.clone(),
                from_model: current.name.clone(),
                to_model: target.name.clone(),
                to_table: target.table.clone(),
                alias: alias.clone(),
                kind: self.join_kind,
                on,
            };
            joins.push(step.clone());
            steps.push(step);

            current = target.clone();
            qualifier = alias;
        }

        // non-empty checked above
        let column_name = path.column().unwrap_or_default();
        let column = ColumnRef::qualified(&current, column_name, &qualifier)
            .map_err(|_| {
                FilterError::unknown_field(
                    &field,
                    format!("no column '{}' on {}", column_name, current.name),
                )
            })?;

        Ok(ResolvedField {
            path: path.clone(),
            model: current,
            column,
            joins: steps,
        })
    }
}

fn join_key(model: &Model, column: &str, qualifier: &str, relationship: &str) -> Result<ColumnRef> {
    ColumnRef::qualified(model, column, qualifier).map_err(|_| {
        FilterError::Schema(format!(
            "join key '{}' of relationship '{}' is not a column of {}",
            column, relationship, model.name
        ))
    })
}
