//! Schema and model metadata
//!
//! This module defines the metadata the compiler works from, including:
//! - Semantic column types (Integer, Float, Boolean, Text, Date, DateTime, Uuid)
//! - Models with columns, primary keys and relationships
//! - Relationship maps and JSON-loadable catalogs

mod field_type;
mod mapping;
mod model;

pub use field_type::SemanticType;
pub use mapping::{Catalog, LoadedSchema, RelationshipMap, SchemaDocument};
pub use model::{Column, Model, Relationship, RelationshipKind};
pub(crate) use model::check_relationship_name;
