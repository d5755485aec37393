//! Abstract Syntax Tree for query representation
//!
//! `QueryNode` is the tree an external Lucene query-string parser produces and
//! the compiler consumes. It is a closed sum type: the compiler matches it
//! exhaustively, so a new node kind cannot be added without deciding how it
//! compiles.

use super::types::{BoolOp, ComparisonOp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dotted field path: relationship segments followed by a column name
///
/// `team.headquarter.name` traverses `team`, then `headquarter`, and names the
/// `name` column of the model reached.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Build a path from explicit segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Relationship segments (all but the last)
    pub fn relationships(&self) -> &[String] {
        match self.0.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Column segment (the last one)
    pub fn column(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self(Vec::new());
        }
        Self(dotted.split('.').map(str::to_string).collect())
    }
}

impl From<String> for FieldPath {
    fn from(dotted: String) -> Self {
        Self::from(dotted.as_str())
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// A node of the parsed query tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryNode {
    /// `field:value` or `field:"value"`
    ///
    /// Unquoted values may carry `?` (one character) and `*` (any run of
    /// characters) wildcards; a bare `*` means the field is non-null.
    Term {
        field: FieldPath,
        value: String,
        #[serde(default)]
        quoted: bool,
    },

    /// `field:>value`, `field:>=value`, `field:<value`, `field:<=value`
    Comparison {
        field: FieldPath,
        op: ComparisonOp,
        value: String,
    },

    /// `field:[lo TO hi]`, `field:{lo TO hi}` and mixed brackets
    Range {
        field: FieldPath,
        lo: String,
        hi: String,
        lo_inclusive: bool,
        hi_inclusive: bool,
    },

    /// `a AND b`, `a OR b`, `a NOT b`
    Boolean { op: BoolOp, children: Vec<QueryNode> },

    /// `( ... )`
    Group { child: Box<QueryNode> },

    /// `field:(a OR b)`
    FieldGroup { field: FieldPath, child: Box<QueryNode> },

    /// `field:term~2`
    Fuzzy {
        field: FieldPath,
        term: String,
        distance: Option<u32>,
    },

    /// `field:"some phrase"~3`
    Proximity {
        field: FieldPath,
        phrase: String,
        slop: u32,
    },

    /// `query^2`
    Boost { child: Box<QueryNode>, factor: f32 },

    /// `field:/pattern/`
    Regex { field: FieldPath, pattern: String },
}

impl QueryNode {
    /// Unquoted term
    pub fn term(field: impl Into<FieldPath>, value: impl Into<String>) -> Self {
        QueryNode::Term {
            field: field.into(),
            value: value.into(),
            quoted: false,
        }
    }

    /// Quoted term
    pub fn phrase(field: impl Into<FieldPath>, value: impl Into<String>) -> Self {
        QueryNode::Term {
            field: field.into(),
            value: value.into(),
            quoted: true,
        }
    }

    pub fn compare(field: impl Into<FieldPath>, op: ComparisonOp, value: impl Into<String>) -> Self {
        QueryNode::Comparison {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn range(
        field: impl Into<FieldPath>,
        lo: impl Into<String>,
        hi: impl Into<String>,
        lo_inclusive: bool,
        hi_inclusive: bool,
    ) -> Self {
        QueryNode::Range {
            field: field.into(),
            lo: lo.into(),
            hi: hi.into(),
            lo_inclusive,
            hi_inclusive,
        }
    }

    pub fn and(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::Boolean {
            op: BoolOp::And,
            children: vec![left, right],
        }
    }

    pub fn or(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::Boolean {
            op: BoolOp::Or,
            children: vec![left, right],
        }
    }

    /// `left NOT right`
    pub fn not(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::Boolean {
            op: BoolOp::Not,
            children: vec![left, right],
        }
    }

    pub fn group(child: QueryNode) -> Self {
        QueryNode::Group {
            child: Box::new(child),
        }
    }

    /// Get the node kind name for debugging and logging
    pub fn kind(&self) -> &'static str {
        match self {
            QueryNode::Term { .. } => "term",
            QueryNode::Comparison { .. } => "comparison",
            QueryNode::Range { .. } => "range",
            QueryNode::Boolean { .. } => "boolean",
            QueryNode::Group { .. } => "group",
            QueryNode::FieldGroup { .. } => "field_group",
            QueryNode::Fuzzy { .. } => "fuzzy",
            QueryNode::Proximity { .. } => "proximity",
            QueryNode::Boost { .. } => "boost",
            QueryNode::Regex { .. } => "regex",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_segments() {
        let path = FieldPath::from("team.headquarter.name");
        assert_eq!(path.len(), 3);
        assert_eq!(path.relationships(), ["team", "headquarter"]);
        assert_eq!(path.column(), Some("name"));
        assert_eq!(path.to_string(), "team.headquarter.name");

        let simple = FieldPath::from("age");
        assert!(simple.relationships().is_empty());
        assert_eq!(simple.column(), Some("age"));
    }

    #[test]
    fn test_empty_field_path() {
        let path = FieldPath::from("");
        assert!(path.is_empty());
        assert_eq!(path.column(), None);
        assert!(path.relationships().is_empty());
    }

    #[test]
    fn test_node_constructors() {
        let node = QueryNode::not(QueryNode::term("name", "Rusty"), QueryNode::term("age", "47"));
        match &node {
            QueryNode::Boolean { op, children } => {
                assert_eq!(*op, BoolOp::Not);
                assert_eq!(children.len(), 2);
            }
            other => panic!("unexpected node {:?}", other),
        }
        assert_eq!(node.kind(), "boolean");
        assert_eq!(QueryNode::phrase("name", "x").kind(), "term");
    }

    #[test]
    fn test_node_serde_round_trip_uses_dotted_paths() {
        let node = QueryNode::term("team.name", "Preventers");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "term",
                "field": "team.name",
                "value": "Preventers",
                "quoted": false
            })
        );
        let back: QueryNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
