//! Relationship maps and model catalogs
//!
//! The relationship map is the caller-supplied table of which relationship names
//! may be traversed in a query, and which model each one leads to. A `Catalog`
//! holds a validated set of models and can build relationship maps by name,
//! which is how schemas are loaded from JSON.

use super::model::{Model, RelationshipKind};
use crate::error::FilterError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Relationship name -> related model
///
/// Only relationships present here can appear in dotted field paths.
#[derive(Clone, Debug, Default)]
pub struct RelationshipMap {
    entries: HashMap<String, Arc<Model>>,
}

impl RelationshipMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style
    pub fn with(mut self, name: impl Into<String>, model: Arc<Model>) -> Self {
        self.insert(name, model);
        self
    }

    /// Add or replace an entry
    pub fn insert(&mut self, name: impl Into<String>, model: Arc<Model>) {
        self.entries.insert(name.into(), model);
    }

    /// Get the model a relationship name maps to
    pub fn get(&self, name: &str) -> Option<&Arc<Model>> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Arc<Model>)> for RelationshipMap {
    fn from_iter<I: IntoIterator<Item = (String, Arc<Model>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A validated set of models, keyed by model name
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    models: BTreeMap<String, Arc<Model>>,
}

impl Catalog {
    /// Build a catalog, validating every model and every relationship target
    pub fn from_models(models: Vec<Model>) -> Result<Self> {
        let mut catalog = BTreeMap::new();
        for model in models {
            model.validate()?;
            let name = model.name.clone();
            if catalog.insert(name.clone(), Arc::new(model)).is_some() {
                return Err(FilterError::Schema(format!("duplicate model '{}'", name)));
            }
        }

        for model in catalog.values() {
            for rel in &model.relationships {
                let target = catalog.get(&rel.target).ok_or_else(|| {
                    FilterError::Schema(format!(
                        "relationship '{}' on {} targets unknown model '{}'",
                        rel.name, model.name, rel.target
                    ))
                })?;
                if let RelationshipKind::OneToMany { foreign_key } = &rel.kind {
                    if target.find_column(foreign_key).is_none() {
                        return Err(FilterError::Schema(format!(
                            "foreign key '{}' of relationship '{}' is not a column of {}",
                            foreign_key, rel.name, target.name
                        )));
                    }
                }
            }
        }

        Ok(Self { models: catalog })
    }

    /// Get a model by name
    pub fn get(&self, name: &str) -> Option<&Arc<Model>> {
        self.models.get(name)
    }

    /// Get a model by name, failing with a schema error
    pub fn require(&self, name: &str) -> Result<Arc<Model>> {
        self.get(name)
            .cloned()
            .ok_or_else(|| FilterError::Schema(format!("unknown model '{}'", name)))
    }

    /// Build a relationship map from relationship name -> model name pairs
    pub fn relationship_map<'a, I>(&self, entries: I) -> Result<RelationshipMap>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        entries
            .into_iter()
            .map(|(rel, model)| self.require(model).map(|m| (rel.clone(), m)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// On-disk schema description: models, the root model, and the relationship map
///
/// ```json
/// {
///   "root": "Hero",
///   "relationships": { "team": "Team" },
///   "models": [ { "name": "Hero", "table": "hero", "columns": [] } ]
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Name of the model queries are rooted at
    pub root: String,
    /// Relationship name -> model name
    #[serde(default)]
    pub relationships: BTreeMap<String, String>,
    /// All models reachable from the root
    pub models: Vec<Model>,
}

/// A loaded schema ready for compilation
#[derive(Clone, Debug)]
pub struct LoadedSchema {
    pub catalog: Catalog,
    pub root: Arc<Model>,
    pub relationships: RelationshipMap,
}

impl SchemaDocument {
    /// Parse a schema document from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a schema document from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate the models and resolve the root and relationship map
    pub fn load(self) -> Result<LoadedSchema> {
        let catalog = Catalog::from_models(self.models)?;
        let root = catalog.require(&self.root)?;
        let relationships = catalog.relationship_map(&self.relationships)?;
        Ok(LoadedSchema {
            catalog,
            root,
            relationships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SemanticType;

    fn hero() -> Model {
        Model::new("Hero", "hero")
            .with_column("id", SemanticType::Integer)
            .with_column("team_id", SemanticType::Integer)
            .belongs_to("team", "Team", "team_id")
    }

    fn team() -> Model {
        Model::new("Team", "team")
            .with_column("id", SemanticType::Integer)
            .with_column("name", SemanticType::Text)
            .has_many("heroes", "Hero", "team_id")
    }

    #[test]
    fn test_relationship_map() {
        let team = Arc::new(team());
        let map = RelationshipMap::new().with("team", team.clone());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("team").unwrap().name, "Team");
        assert!(map.get("headquarter").is_none());
    }

    #[test]
    fn test_catalog_validates_targets() {
        let err = Catalog::from_models(vec![hero()]).unwrap_err();
        assert!(err.to_string().contains("unknown model 'Team'"));

        let catalog = Catalog::from_models(vec![hero(), team()]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.require("Villain").is_err());
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let err = Catalog::from_models(vec![team(), team(), hero()]).unwrap_err();
        assert!(err.to_string().contains("duplicate model 'Team'"));
    }

    #[test]
    fn test_catalog_checks_remote_foreign_key() {
        let team = Model::new("Team", "team")
            .with_column("id", SemanticType::Integer)
            .has_many("heroes", "Hero", "squad_id");
        let err = Catalog::from_models(vec![hero(), team]).unwrap_err();
        assert!(err.to_string().contains("'squad_id'"));
    }

    #[test]
    fn test_schema_document_load() {
        let json = r#"{
            "root": "Hero",
            "relationships": { "team": "Team" },
            "models": [
                {
                    "name": "Hero", "table": "hero",
                    "columns": [
                        { "name": "id", "type": "integer" },
                        { "name": "team_id", "type": "integer" }
                    ],
                    "relationships": [
                        { "name": "team", "target": "Team", "kind": "many_to_one", "foreign_key": "team_id" }
                    ]
                },
                {
                    "name": "Team", "table": "team",
                    "columns": [
                        { "name": "id", "type": "integer" },
                        { "name": "name", "type": "text" }
                    ]
                }
            ]
        }"#;

        let loaded = SchemaDocument::from_json_str(json).unwrap().load().unwrap();
        assert_eq!(loaded.root.name, "Hero");
        assert_eq!(loaded.relationships.get("team").unwrap().table, "team");
        assert!(loaded.catalog.get("Team").is_some());
    }
}
