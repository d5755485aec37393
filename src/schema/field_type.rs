//! Semantic column types
//!
//! Declares how a column's raw query values are interpreted before they are
//! bound into a predicate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared semantic type of a model column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// 64-bit signed integer
    Integer,

    /// 64-bit floating point
    Float,

    /// Boolean value
    Boolean,

    /// Free text. The only type that supports pattern matching.
    Text,

    /// Calendar date without time
    Date,

    /// Date and time, normalized to UTC
    DateTime,

    /// 128-bit UUID
    Uuid,
}

impl SemanticType {
    /// Get the type name
    pub fn name(&self) -> &'static str {
        match self {
            SemanticType::Integer => "integer",
            SemanticType::Float => "float",
            SemanticType::Boolean => "boolean",
            SemanticType::Text => "text",
            SemanticType::Date => "date",
            SemanticType::DateTime => "datetime",
            SemanticType::Uuid => "uuid",
        }
    }

    /// Check if unquoted terms on this type become pattern matches
    pub fn is_text(&self) -> bool {
        matches!(self, SemanticType::Text)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_match_serde() {
        for ty in [
            SemanticType::Integer,
            SemanticType::Float,
            SemanticType::Boolean,
            SemanticType::Text,
            SemanticType::Date,
            SemanticType::DateTime,
            SemanticType::Uuid,
        ] {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.name()));
        }
    }

    #[test]
    fn test_only_text_is_textual() {
        assert!(SemanticType::Text.is_text());
        assert!(!SemanticType::Integer.is_text());
        assert!(!SemanticType::Uuid.is_text());
    }
}
