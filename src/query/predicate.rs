//! Compiled predicates
//!
//! A `Predicate` is the boolean expression tree handed to the execution layer.
//! Leaves compare one resolved column; internal nodes combine children.

use super::resolver::ColumnRef;
use super::types::{CompareOp, Value};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// `column <op> value`
    Compare {
        column: ColumnRef,
        op: CompareOp,
        value: Value,
    },
    /// `column LIKE pattern`, pattern already in the target dialect
    Like { column: ColumnRef, pattern: String },
    /// `column IS NOT NULL`
    NotNull { column: ColumnRef },
    And {
        left: Box<Predicate>,
        right: Box<Predicate>,
    },
    Or {
        left: Box<Predicate>,
        right: Box<Predicate>,
    },
    Not { inner: Box<Predicate> },
}

impl Predicate {
    pub fn compare(column: ColumnRef, op: CompareOp, value: Value) -> Self {
        Predicate::Compare { column, op, value }
    }

    pub fn eq(column: ColumnRef, value: Value) -> Self {
        Predicate::Compare {
            column,
            op: CompareOp::Eq,
            value,
        }
    }

    pub fn like(column: ColumnRef, pattern: impl Into<String>) -> Self {
        Predicate::Like {
            column,
            pattern: pattern.into(),
        }
    }

    pub fn not_null(column: ColumnRef) -> Self {
        Predicate::NotNull { column }
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn negate(self) -> Self {
        Predicate::Not {
            inner: Box::new(self),
        }
    }

    /// Columns referenced by this predicate, in tree order
    pub fn columns(&self) -> Vec<&ColumnRef> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Predicate::Compare { column, .. }
            | Predicate::Like { column, .. }
            | Predicate::NotNull { column } => out.push(column),
            Predicate::And { left, right } | Predicate::Or { left, right } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Predicate::Not { inner } => inner.collect_columns(out),
        }
    }
}

/// Renders the predicate as SQL with inline literals (for logs and tests)
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { column, op, value } => {
                write!(f, "{} {} {}", column, op.as_sql(), value)
            }
            Predicate::Like { column, pattern } => {
                write!(f, "{} LIKE '{}'", column, pattern.replace('\'', "''"))
            }
            Predicate::NotNull { column } => write!(f, "{} IS NOT NULL", column),
            Predicate::And { left, right } => write!(f, "({} AND {})", left, right),
            Predicate::Or { left, right } => write!(f, "({} OR {})", left, right),
            Predicate::Not { inner } => write!(f, "NOT {}", inner),
        }
    }
}
