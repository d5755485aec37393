//! Core types for the query system

use crate::schema::SemanticType;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Boolean operator of an internal query node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOp {
    /// All children must match
    And,
    /// At least one child must match
    Or,
    /// Binary exclusion: `A NOT B` matches A and not B
    Not,
}

impl BoolOp {
    pub fn name(&self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
            BoolOp::Not => "NOT",
        }
    }
}

/// Operator of a one-sided comparison (`age:>40`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Operator of a compiled comparison predicate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// SQL operator token
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

impl From<ComparisonOp> for CompareOp {
    fn from(op: ComparisonOp) -> Self {
        match op {
            ComparisonOp::Gt => CompareOp::Gt,
            ComparisonOp::Gte => CompareOp::Gte,
            ComparisonOp::Lt => CompareOp::Lt,
            ComparisonOp::Lte => CompareOp::Lte,
        }
    }
}

/// A raw query value cast to a column's semantic type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
}

impl Value {
    /// The semantic type this value was cast to
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            Value::Integer(_) => SemanticType::Integer,
            Value::Float(_) => SemanticType::Float,
            Value::Boolean(_) => SemanticType::Boolean,
            Value::Text(_) => SemanticType::Text,
            Value::Date(_) => SemanticType::Date,
            Value::DateTime(_) => SemanticType::DateTime,
            Value::Uuid(_) => SemanticType::Uuid,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value as an inline SQL literal
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(true) => f.write_str("TRUE"),
            Value::Boolean(false) => f.write_str("FALSE"),
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Date(d) => write!(f, "'{}'", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "'{}'", dt.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::Uuid(u) => write!(f, "'{}'", u.hyphenated()),
        }
    }
}
