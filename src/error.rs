use crate::schema::SemanticType;
use thiserror::Error;

/// Main error type for query compilation
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Unsupported query node: {0}")]
    UnsupportedNode(String),

    #[error("Unknown field '{field}': {reason}")]
    UnknownField { field: String, reason: String },

    #[error("Cannot cast '{value}' for field '{field}' to {target}")]
    Cast {
        field: String,
        value: String,
        target: SemanticType,
    },

    #[error("Malformed query tree: {0}")]
    MalformedTree(String),

    #[error("Query tree exceeds maximum depth of {0}")]
    DepthExceeded(usize),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Query parse error: {0}")]
    QueryParseError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for compiler operations
pub type Result<T> = std::result::Result<T, FilterError>;

impl FilterError {
    pub(crate) fn unknown_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FilterError::UnknownField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Short, stable name of the error kind (used as a structured log field)
    pub fn kind(&self) -> &'static str {
        match self {
            FilterError::UnsupportedNode(_) => "unsupported_node",
            FilterError::UnknownField { .. } => "unknown_field",
            FilterError::Cast { .. } => "cast",
            FilterError::MalformedTree(_) => "malformed_tree",
            FilterError::DepthExceeded(_) => "depth_exceeded",
            FilterError::Schema(_) => "schema",
            FilterError::InvalidRequest(_) => "invalid_request",
            FilterError::QueryParseError(_) => "query_parse",
            FilterError::Serialization(_) => "serialization",
            FilterError::Io(_) => "io",
        }
    }

    /// Whether the error was caused by the query itself rather than the schema or environment
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            FilterError::UnsupportedNode(_)
                | FilterError::UnknownField { .. }
                | FilterError::Cast { .. }
                | FilterError::MalformedTree(_)
                | FilterError::DepthExceeded(_)
                | FilterError::QueryParseError(_)
        )
    }
}
