//! Statement assembly
//!
//! Combines the root model, the compiled joins and predicate, and the entity
//! selection into a [`StatementDescriptor`]: the full description of a SELECT
//! that an execution layer can run or [render](crate::query::render).

use crate::error::FilterError;
use crate::query::predicate::Predicate;
use crate::query::resolver::{ColumnRef, JoinStep};
use crate::schema::{Model, SemanticType};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Aggregate functions available in an explicit selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }

    /// Whether the function only makes sense on numeric columns
    pub fn requires_numeric(&self) -> bool {
        matches!(self, AggregateFunction::Sum | AggregateFunction::Avg)
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One selected expression
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Column(ColumnRef),
    /// `function(column)`, or `COUNT(*)` when `column` is `None`
    Aggregate {
        function: AggregateFunction,
        column: Option<ColumnRef>,
        alias: Option<String>,
    },
}

impl Entity {
    /// Select a column of the root model
    pub fn column(model: &Model, column: &str) -> Result<Self> {
        Ok(Entity::Column(ColumnRef::of(model, column)?))
    }

    /// `COUNT(*)`
    pub fn count_all() -> Self {
        Entity::Aggregate {
            function: AggregateFunction::Count,
            column: None,
            alias: None,
        }
    }

    pub fn aggregate(function: AggregateFunction, column: ColumnRef) -> Self {
        Entity::Aggregate {
            function,
            column: Some(column),
            alias: None,
        }
    }

    /// Name the output of an aggregate; no effect on plain columns
    pub fn with_alias(self, name: impl Into<String>) -> Self {
        match self {
            Entity::Aggregate {
                function, column, ..
            } => Entity::Aggregate {
                function,
                column,
                alias: Some(name.into()),
            },
            column => column,
        }
    }

    /// Column referenced by this entity, if any
    pub fn column_ref(&self) -> Option<&ColumnRef> {
        match self {
            Entity::Column(column) => Some(column),
            Entity::Aggregate { column, .. } => column.as_ref(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Column(column) => write!(f, "{}", column),
            Entity::Aggregate {
                function,
                column,
                alias,
            } => {
                match column {
                    Some(column) => write!(f, "{}({})", function, column)?,
                    None => write!(f, "{}(*)", function)?,
                }
                if let Some(alias) = alias {
                    write!(f, " AS {}", alias)?;
                }
                Ok(())
            }
        }
    }
}

/// What the statement selects
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Selection {
    /// Every column of the root model, in declaration order
    #[default]
    AllColumns,
    /// An explicit, ordered, non-empty list
    Entities(Vec<Entity>),
}

/// A fully assembled SELECT, ready for an execution layer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatementDescriptor {
    pub root: Arc<Model>,
    /// Deduplicated joins in first-encountered order
    pub joins: Vec<JoinStep>,
    /// `None` means no WHERE constraint
    pub predicate: Option<Predicate>,
    pub entities: Vec<Entity>,
}

impl StatementDescriptor {
    /// Whether the statement filters rows at all
    pub fn is_constrained(&self) -> bool {
        self.predicate.is_some()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct StatementAssembler;

impl StatementAssembler {
    /// Assemble a statement descriptor
    ///
    /// Explicit entities must reference the root table or one of `joins`, and
    /// `SUM`/`AVG` need a numeric column.
    pub fn assemble(
        root: Arc<Model>,
        joins: Vec<JoinStep>,
        predicate: Option<Predicate>,
        selection: Selection,
    ) -> Result<StatementDescriptor> {
        let entities = match selection {
            Selection::AllColumns => root
                .columns
                .iter()
                .map(|column| Entity::column(&root, &column.name))
                .collect::<Result<Vec<_>>>()?,
            Selection::Entities(entities) => {
                if entities.is_empty() {
                    return Err(FilterError::InvalidRequest(
                        "explicit selection must name at least one entity".to_string(),
                    ));
                }
                Self::check_entities(&root, &joins, &entities)?;
                entities
            }
        };

        Ok(StatementDescriptor {
            root,
            joins,
            predicate,
            entities,
        })
    }

    fn check_entities(root: &Model, joins: &[JoinStep], entities: &[Entity]) -> Result<()> {
        let visible: HashSet<&str> = std::iter::once(root.table.as_str())
            .chain(joins.iter().map(|j| j.alias.as_str()))
            .collect();

        for entity in entities {
            if let Some(column) = entity.column_ref() {
                if !visible.contains(column.qualifier.as_str()) {
                    return Err(FilterError::InvalidRequest(format!(
                        "selected column {} is not reachable from {}",
                        column, root.name
                    )));
                }
            }
            if let Entity::Aggregate {
                function, column, ..
            } = entity
            {
                match column {
                    None if *function != AggregateFunction::Count => {
                        return Err(FilterError::InvalidRequest(format!(
                            "{}(*) is not supported",
                            function
                        )));
                    }
                    Some(column) if function.requires_numeric() && !is_numeric(column.ty) => {
                        return Err(FilterError::InvalidRequest(format!(
                            "{} needs a numeric column, {} is {}",
                            function, column, column.ty
                        )));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

fn is_numeric(ty: SemanticType) -> bool {
    matches!(ty, SemanticType::Integer | SemanticType::Float)
}
