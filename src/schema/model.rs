//! Model metadata
//!
//! A `Model` describes one table: its columns with their semantic types, its
//! primary key, and the relationships it declares to other models.

use super::field_type::SemanticType;
use crate::error::FilterError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A typed column on a model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared semantic type
    #[serde(rename = "type")]
    pub ty: SemanticType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Which side of a relationship owns the foreign key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelationshipKind {
    /// The declaring model holds `foreign_key`, referencing the target's primary key
    ManyToOne { foreign_key: String },
    /// The target model holds `foreign_key`, referencing the declaring model's primary key
    OneToMany { foreign_key: String },
}

/// A named relationship from one model to another
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship name, as used in dotted field paths
    pub name: String,
    /// Name of the related model
    pub target: String,
    #[serde(flatten)]
    pub kind: RelationshipKind,
}

/// Table metadata used to resolve fields and build joins
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Model name (e.g. `Hero`)
    pub name: String,
    /// Table name (e.g. `hero`)
    pub table: String,
    /// Primary key column
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    /// Columns in declaration order
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Declared relationships
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

fn default_primary_key() -> String {
    "id".to_string()
}

impl Model {
    /// Create a model with the default `id` primary key and no columns
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            primary_key: default_primary_key(),
            columns: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Set the primary key column
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Add a column
    pub fn with_column(mut self, name: impl Into<String>, ty: SemanticType) -> Self {
        self.columns.push(Column::new(name, ty));
        self
    }

    /// Declare a relationship where this model holds the foreign key
    pub fn belongs_to(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.relationships.push(Relationship {
            name: name.into(),
            target: target.into(),
            kind: RelationshipKind::ManyToOne {
                foreign_key: foreign_key.into(),
            },
        });
        self
    }

    /// Declare a relationship where the target model holds the foreign key
    pub fn has_many(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.relationships.push(Relationship {
            name: name.into(),
            target: target.into(),
            kind: RelationshipKind::OneToMany {
                foreign_key: foreign_key.into(),
            },
        });
        self
    }

    /// Look up a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a relationship by name
    pub fn find_relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Check the model's own metadata for consistency
    ///
    /// Cross-model checks (target existence, remote foreign keys) happen when a
    /// catalog is built or a relationship is traversed.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.table.is_empty() {
            return Err(FilterError::Schema(
                "model name and table must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(FilterError::Schema(format!(
                    "duplicate column '{}' on {}",
                    column.name, self.name
                )));
            }
        }

        if self.find_column(&self.primary_key).is_none() {
            return Err(FilterError::Schema(format!(
                "primary key '{}' is not a column of {}",
                self.primary_key, self.name
            )));
        }

        let mut seen = HashSet::new();
        for rel in &self.relationships {
            if !seen.insert(rel.name.as_str()) {
                return Err(FilterError::Schema(format!(
                    "duplicate relationship '{}' on {}",
                    rel.name, self.name
                )));
            }
            check_relationship_name(&rel.name)
                .map_err(|reason| FilterError::Schema(format!("{} on {}", reason, self.name)))?;
            if rel.name == self.table {
                return Err(FilterError::Schema(format!(
                    "relationship '{}' on {} shadows its own table name",
                    rel.name, self.name
                )));
            }
            if let RelationshipKind::ManyToOne { foreign_key } = &rel.kind {
                if self.find_column(foreign_key).is_none() {
                    return Err(FilterError::Schema(format!(
                        "foreign key '{}' of relationship '{}' is not a column of {}",
                        foreign_key, rel.name, self.name
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Relationship names become join aliases joined by `__`, so they must not
/// contain that separator or start or end with `_`.
pub(crate) fn check_relationship_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("relationship name must not be empty".to_string());
    }
    if name.contains("__") || name.starts_with('_') || name.ends_with('_') {
        return Err(format!(
            "relationship name '{}' would produce an ambiguous join alias",
            name
        ));
    }
    Ok(())
}
