pub mod config;
pub mod error;
pub mod query;
pub mod schema;
pub mod testing;

pub use config::{CompilerConfig, JoinKind, LikeDialect, ParamStyle, SqlDialect};
pub use error::{FilterError, Result};
pub use query::{
    to_select, CompiledQuery, QueryCompiler, QueryNode, QueryParser, QueryStringParser,
    SelectBuilder, Selection, SqlRenderer, StatementDescriptor,
};
pub use schema::{Catalog, Model, RelationshipMap, SchemaDocument, SemanticType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
