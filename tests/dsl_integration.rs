//! Integration tests for the JSON query DSL and schema/config loading
//!
//! Everything goes through files, the way the command line tool uses it.

use lucene_select::query::{QueryParser, SelectBuilder, Selection, SqlRenderer, Value};
use lucene_select::testing::fixtures::HERO_SCHEMA_JSON;
use lucene_select::{CompilerConfig, FilterError, JoinKind, ParamStyle, SchemaDocument};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn builder_from_files(config: Option<&str>) -> (SelectBuilder, CompilerConfig) {
    let schema_file = write_temp(HERO_SCHEMA_JSON);
    let schema = SchemaDocument::from_file(schema_file.path())
        .unwrap()
        .load()
        .unwrap();

    let config = match config {
        Some(json) => {
            let config_file = write_temp(json);
            CompilerConfig::from_file(config_file.path()).unwrap()
        }
        None => CompilerConfig::default(),
    };

    let builder = SelectBuilder::new(schema.root)
        .with_relationships(schema.relationships)
        .with_config(config.clone());
    (builder, config)
}

#[test]
fn test_dsl_query_against_loaded_schema() {
    let (builder, config) = builder_from_files(None);
    let tree = QueryParser::parse_str(
        r#"{
            "query": {
                "and": [
                    { "term": { "team.name": "Preventers" } },
                    { "range": { "age": { "gt": 48, "lt": 60 } } }
                ]
            }
        }"#,
    )
    .unwrap();

    let stmt = builder.build(Some(&tree), Selection::AllColumns).unwrap();
    let rendered = SqlRenderer::from_config(&config).render(&stmt);

    assert!(rendered
        .sql
        .contains(r#"JOIN "team" AS "team" ON "hero"."team_id" = "team"."id""#));
    assert!(rendered
        .sql
        .ends_with(r#"WHERE ("team"."name" LIKE ? AND ("hero"."age" > ? AND "hero"."age" < ?))"#));
    assert_eq!(
        rendered.params,
        vec![
            Value::Text("%Preventers%".to_string()),
            Value::Integer(48),
            Value::Integer(60)
        ]
    );
}

#[test]
fn test_config_file_changes_output() {
    let (builder, config) =
        builder_from_files(Some(r#"{ "join_kind": "left", "param_style": "dollar" }"#));
    assert_eq!(config.join_kind, JoinKind::Left);
    assert_eq!(config.param_style, ParamStyle::Dollar);
    assert_eq!(config.max_depth, None);

    let tree = QueryParser::parse_str(r#"{ "phrase": { "team.name": "Z-Force" } }"#).unwrap();
    let stmt = builder.build(Some(&tree), Selection::AllColumns).unwrap();
    let rendered = SqlRenderer::from_config(&config).render(&stmt);

    assert!(rendered.sql.contains("LEFT OUTER JOIN"));
    assert!(rendered.sql.ends_with(r#""team"."name" = $1"#));
}

#[test]
fn test_dsl_not_compiles_to_and_not() {
    let (builder, _) = builder_from_files(None);
    let tree = QueryParser::parse_str(
        r#"{ "not": [ { "term": { "name": "Rusty" } }, { "term": { "age": 47 } } ] }"#,
    )
    .unwrap();
    let stmt = builder.build(Some(&tree), Selection::AllColumns).unwrap();
    assert_eq!(
        stmt.predicate.unwrap().to_string(),
        "(hero.name LIKE '%Rusty%' AND NOT hero.age = 47)"
    );
}

#[test]
fn test_dsl_unsupported_constructs_fail_compilation() {
    let (builder, _) = builder_from_files(None);
    for query in [
        r#"{ "fuzzy": { "name": { "value": "spidr", "distance": 2 } } }"#,
        r#"{ "proximity": { "name": { "phrase": "spider boy", "slop": 3 } } }"#,
        r#"{ "regex": { "name": "sp.*" } }"#,
    ] {
        let tree = QueryParser::parse_str(query).unwrap();
        let err = builder.build(Some(&tree), Selection::AllColumns).unwrap_err();
        assert!(matches!(err, FilterError::UnsupportedNode(_)), "{}", query);
        assert!(err.is_query_error());
    }
}

#[test]
fn test_tree_json_round_trips_through_serde() {
    let tree = QueryParser::parse_str(r#"{ "term": { "team.headquarter.name": "Bar" } }"#).unwrap();
    let json = serde_json::to_string(&tree).unwrap();
    assert!(json.contains(r#""field":"team.headquarter.name""#));
    let back: lucene_select::QueryNode = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tree);
}

#[test]
fn test_missing_schema_file_is_io_error() {
    let err = SchemaDocument::from_file("/nonexistent/schema.json").unwrap_err();
    assert!(matches!(err, FilterError::Io(_)));
}
