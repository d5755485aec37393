//! Sample models
//!
//! A hero database: heroes belong to a team, teams belong to a headquarter.
//! `Extra` carries the column types the hero tables do not use.

use crate::schema::{Model, RelationshipMap, SemanticType};
use std::sync::Arc;

pub fn hero() -> Arc<Model> {
    Arc::new(
        Model::new("Hero", "hero")
            .with_column("id", SemanticType::Integer)
            .with_column("name", SemanticType::Text)
            .with_column("secret_name", SemanticType::Text)
            .with_column("age", SemanticType::Integer)
            .with_column("created_at", SemanticType::DateTime)
            .with_column("team_id", SemanticType::Integer)
            .belongs_to("team", "Team", "team_id"),
    )
}

pub fn team() -> Arc<Model> {
    Arc::new(
        Model::new("Team", "team")
            .with_column("id", SemanticType::Integer)
            .with_column("name", SemanticType::Text)
            .with_column("headquarter_id", SemanticType::Integer)
            .belongs_to("headquarter", "Headquarter", "headquarter_id")
            .has_many("heroes", "Hero", "team_id"),
    )
}

pub fn headquarter() -> Arc<Model> {
    Arc::new(
        Model::new("Headquarter", "headquarter")
            .with_column("id", SemanticType::Integer)
            .with_column("name", SemanticType::Text)
            .has_many("teams", "Team", "headquarter_id"),
    )
}

pub fn extra() -> Arc<Model> {
    Arc::new(
        Model::new("Extra", "extra")
            .with_column("id", SemanticType::Uuid)
            .with_column("is_admin", SemanticType::Boolean)
            .with_column("score", SemanticType::Float)
            .with_column("birthday", SemanticType::Date),
    )
}

/// `team -> Team`, `headquarter -> Headquarter`
pub fn hero_relationships() -> RelationshipMap {
    RelationshipMap::new()
        .with("team", team())
        .with("headquarter", headquarter())
}

/// The hero schema as a JSON schema document, rooted at `Hero`
pub const HERO_SCHEMA_JSON: &str = r#"{
  "root": "Hero",
  "relationships": { "team": "Team", "headquarter": "Headquarter" },
  "models": [
    {
      "name": "Hero",
      "table": "hero",
      "columns": [
        { "name": "id", "type": "integer" },
        { "name": "name", "type": "text" },
        { "name": "secret_name", "type": "text" },
        { "name": "age", "type": "integer" },
        { "name": "created_at", "type": "datetime" },
        { "name": "team_id", "type": "integer" }
      ],
      "relationships": [
        { "name": "team", "target": "Team", "kind": "many_to_one", "foreign_key": "team_id" }
      ]
    },
    {
      "name": "Team",
      "table": "team",
      "columns": [
        { "name": "id", "type": "integer" },
        { "name": "name", "type": "text" },
        { "name": "headquarter_id", "type": "integer" }
      ],
      "relationships": [
        { "name": "headquarter", "target": "Headquarter", "kind": "many_to_one", "foreign_key": "headquarter_id" },
        { "name": "heroes", "target": "Hero", "kind": "one_to_many", "foreign_key": "team_id" }
      ]
    },
    {
      "name": "Headquarter",
      "table": "headquarter",
      "columns": [
        { "name": "id", "type": "integer" },
        { "name": "name", "type": "text" }
      ],
      "relationships": [
        { "name": "teams", "target": "Team", "kind": "one_to_many", "foreign_key": "headquarter_id" }
      ]
    }
  ]
}"#;
