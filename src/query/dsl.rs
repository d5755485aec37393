//! Query DSL decoder
//!
//! Decodes a JSON rendition of the query tree into [`QueryNode`]s, so trees
//! produced by an external query-string parser can be handed over as JSON.
//!
//! ```json
//! {
//!   "query": {
//!     "and": [
//!       { "term": { "team.name": "Preventers" } },
//!       { "range": { "age": { "gt": 48, "lt": 60 } } }
//!     ]
//!   }
//! }
//! ```

use crate::error::FilterError;
use crate::query::ast::QueryNode;
use crate::query::types::{BoolOp, ComparisonOp};
use crate::Result;
use serde_json::{Map, Value};

/// Query parser for the JSON DSL
pub struct QueryParser;

impl QueryParser {
    /// Parse a JSON query into a tree
    pub fn parse(json: &Value) -> Result<QueryNode> {
        match json {
            Value::Object(map) => Self::parse_query_object(map),
            _ => Err(parse_error("query must be a JSON object")),
        }
    }

    /// Parse a JSON string into a tree
    pub fn parse_str(json_str: &str) -> Result<QueryNode> {
        let value: Value = serde_json::from_str(json_str)
            .map_err(|e| FilterError::QueryParseError(format!("invalid JSON: {}", e)))?;
        Self::parse(&value)
    }

    fn parse_query_object(map: &Map<String, Value>) -> Result<QueryNode> {
        if map.len() != 1 {
            return Err(FilterError::QueryParseError(format!(
                "query object must have exactly one key, got {:?}",
                map.keys().collect::<Vec<_>>()
            )));
        }
        let (key, body) = map
            .iter()
            .next()
            .ok_or_else(|| parse_error("empty query object"))?;

        match key.as_str() {
            "query" => Self::parse(body),
            "term" => Self::parse_term(body, false),
            "phrase" => Self::parse_term(body, true),
            "range" => Self::parse_range(body),
            "and" => Self::parse_bool(BoolOp::And, body),
            "or" => Self::parse_bool(BoolOp::Or, body),
            "not" => Self::parse_bool(BoolOp::Not, body),
            "group" => Ok(QueryNode::group(Self::parse(body)?)),
            "field_group" => Self::parse_field_group(body),
            "fuzzy" => Self::parse_fuzzy(body),
            "proximity" => Self::parse_proximity(body),
            "boost" => Self::parse_boost(body),
            "regex" => Self::parse_regex(body),
            other => Err(FilterError::QueryParseError(format!(
                "unknown query type '{}'. Expected one of: query, term, phrase, range, and, or, not, group, field_group, fuzzy, proximity, boost, regex",
                other
            ))),
        }
    }

    /// `{"f": v}` or `{"f": {"value": v, "quoted": b}}`
    fn parse_term(value: &Value, quoted: bool) -> Result<QueryNode> {
        let (field, spec) = single_field(value, "term")?;

        let (text, quoted) = match spec {
            Value::Object(spec) => {
                let text = spec
                    .get("value")
                    .ok_or_else(|| parse_error("term spec must have a 'value' field"))
                    .and_then(scalar_text)?;
                let quoted = match spec.get("quoted") {
                    Some(Value::Bool(b)) => *b,
                    Some(_) => return Err(parse_error("'quoted' must be a boolean")),
                    None => quoted,
                };
                (text, quoted)
            }
            scalar => (scalar_text(scalar)?, quoted),
        };

        Ok(QueryNode::Term {
            field: field.as_str().into(),
            value: text,
            quoted,
        })
    }

    /// `{"f": {"gt"|"gte": lo, "lt"|"lte": hi}}`
    ///
    /// Two bounds make a range, a single bound makes a comparison.
    fn parse_range(value: &Value) -> Result<QueryNode> {
        let (field, spec) = single_field(value, "range")?;
        let spec = spec
            .as_object()
            .ok_or_else(|| parse_error("range spec must be an object"))?;

        if let Some(key) = spec
            .keys()
            .find(|k| !matches!(k.as_str(), "gt" | "gte" | "lt" | "lte"))
        {
            return Err(FilterError::QueryParseError(format!(
                "unknown range bound '{}'",
                key
            )));
        }

        let lower = Self::range_bound(spec, "gt", "gte")?;
        let upper = Self::range_bound(spec, "lt", "lte")?;

        match (lower, upper) {
            (Some((lo, lo_inclusive)), Some((hi, hi_inclusive))) => Ok(QueryNode::range(
                field.as_str(),
                lo,
                hi,
                lo_inclusive,
                hi_inclusive,
            )),
            (Some((lo, inclusive)), None) => {
                let op = if inclusive { ComparisonOp::Gte } else { ComparisonOp::Gt };
                Ok(QueryNode::compare(field.as_str(), op, lo))
            }
            (None, Some((hi, inclusive))) => {
                let op = if inclusive { ComparisonOp::Lte } else { ComparisonOp::Lt };
                Ok(QueryNode::compare(field.as_str(), op, hi))
            }
            (None, None) => Err(parse_error("range needs at least one bound")),
        }
    }

    /// Returns the bound value and whether it is inclusive
    fn range_bound(
        spec: &Map<String, Value>,
        exclusive: &str,
        inclusive: &str,
    ) -> Result<Option<(String, bool)>> {
        match (spec.get(exclusive), spec.get(inclusive)) {
            (Some(_), Some(_)) => Err(FilterError::QueryParseError(format!(
                "range cannot have both '{}' and '{}'",
                exclusive, inclusive
            ))),
            (Some(v), None) => Ok(Some((scalar_text(v)?, false))),
            (None, Some(v)) => Ok(Some((scalar_text(v)?, true))),
            (None, None) => Ok(None),
        }
    }

    fn parse_bool(op: BoolOp, value: &Value) -> Result<QueryNode> {
        let children = match value {
            Value::Array(arr) => arr.iter().map(Self::parse).collect::<Result<Vec<_>>>()?,
            _ => {
                return Err(FilterError::QueryParseError(format!(
                    "{} clauses must be an array",
                    op.name()
                )))
            }
        };
        Ok(QueryNode::Boolean { op, children })
    }

    /// `{"field": f, "query": q}`
    fn parse_field_group(value: &Value) -> Result<QueryNode> {
        let spec = value
            .as_object()
            .ok_or_else(|| parse_error("field_group must be an object"))?;
        let field = spec
            .get("field")
            .and_then(Value::as_str)
            .ok_or_else(|| parse_error("field_group must have a string 'field'"))?;
        let query = spec
            .get("query")
            .ok_or_else(|| parse_error("field_group must have a 'query'"))?;

        Ok(QueryNode::FieldGroup {
            field: field.into(),
            child: Box::new(Self::parse(query)?),
        })
    }

    /// `{"f": v}` or `{"f": {"value": v, "distance": n}}`
    fn parse_fuzzy(value: &Value) -> Result<QueryNode> {
        let (field, spec) = single_field(value, "fuzzy")?;
        let (term, distance) = match spec {
            Value::Object(spec) => {
                let term = spec
                    .get("value")
                    .ok_or_else(|| parse_error("fuzzy spec must have a 'value' field"))
                    .and_then(scalar_text)?;
                let distance = spec.get("distance").map(|d| as_u32(d, "distance")).transpose()?;
                (term, distance)
            }
            scalar => (scalar_text(scalar)?, None),
        };

        Ok(QueryNode::Fuzzy {
            field: field.as_str().into(),
            term,
            distance,
        })
    }

    /// `{"f": {"phrase": p, "slop": n}}`
    fn parse_proximity(value: &Value) -> Result<QueryNode> {
        let (field, spec) = single_field(value, "proximity")?;
        let spec = spec
            .as_object()
            .ok_or_else(|| parse_error("proximity spec must be an object"))?;
        let phrase = spec
            .get("phrase")
            .ok_or_else(|| parse_error("proximity spec must have a 'phrase' field"))
            .and_then(scalar_text)?;
        let slop = spec
            .get("slop")
            .ok_or_else(|| parse_error("proximity spec must have a 'slop' field"))
            .and_then(|s| as_u32(s, "slop"))?;

        Ok(QueryNode::Proximity {
            field: field.as_str().into(),
            phrase,
            slop,
        })
    }

    /// `{"query": q, "factor": x}`
    fn parse_boost(value: &Value) -> Result<QueryNode> {
        let spec = value
            .as_object()
            .ok_or_else(|| parse_error("boost must be an object"))?;
        let query = spec
            .get("query")
            .ok_or_else(|| parse_error("boost must have a 'query'"))?;
        let factor = spec
            .get("factor")
            .and_then(Value::as_f64)
            .ok_or_else(|| parse_error("boost must have a numeric 'factor'"))?;

        Ok(QueryNode::Boost {
            child: Box::new(Self::parse(query)?),
            factor: factor as f32,
        })
    }

    fn parse_regex(value: &Value) -> Result<QueryNode> {
        let (field, spec) = single_field(value, "regex")?;
        let pattern = spec
            .as_str()
            .ok_or_else(|| parse_error("regex pattern must be a string"))?;

        Ok(QueryNode::Regex {
            field: field.as_str().into(),
            pattern: pattern.to_string(),
        })
    }
}

fn parse_error(msg: &str) -> FilterError {
    FilterError::QueryParseError(msg.to_string())
}

/// The single `{"field": spec}` entry of a field-level query
fn single_field<'a>(value: &'a Value, query_type: &str) -> Result<(&'a String, &'a Value)> {
    let map = value.as_object().ok_or_else(|| {
        FilterError::QueryParseError(format!("{} query must be an object", query_type))
    })?;
    if map.len() != 1 {
        return Err(FilterError::QueryParseError(format!(
            "{} query must name exactly one field",
            query_type
        )));
    }
    map.iter().next().ok_or_else(|| {
        FilterError::QueryParseError(format!("{} query must specify a field", query_type))
    })
}

/// Raw text of a scalar value
fn scalar_text(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(FilterError::QueryParseError(format!(
            "expected a string, number or boolean, got {}",
            other
        ))),
    }
}

fn as_u32(value: &Value, name: &str) -> Result<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            FilterError::QueryParseError(format!("'{}' must be a non-negative integer", name))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_term() {
        let node = QueryParser::parse(&json!({"term": {"name": "Spider"}})).unwrap();
        assert_eq!(node, QueryNode::term("name", "Spider"));
    }

    #[test]
    fn test_parse_term_scalars() {
        let node = QueryParser::parse(&json!({"term": {"age": 47}})).unwrap();
        assert_eq!(node, QueryNode::term("age", "47"));

        let node = QueryParser::parse(&json!({"term": {"is_admin": true}})).unwrap();
        assert_eq!(node, QueryNode::term("is_admin", "true"));
    }

    #[test]
    fn test_parse_term_spec_and_phrase() {
        let node =
            QueryParser::parse(&json!({"term": {"name": {"value": "Spider-Boy", "quoted": true}}}))
                .unwrap();
        assert_eq!(node, QueryNode::phrase("name", "Spider-Boy"));

        let node = QueryParser::parse(&json!({"phrase": {"name": "Spider-Boy"}})).unwrap();
        assert_eq!(node, QueryNode::phrase("name", "Spider-Boy"));
    }

    #[test]
    fn test_parse_wrapped_query() {
        let node = QueryParser::parse_str(r#"{"query": {"term": {"team.name": "Preventers"}}}"#)
            .unwrap();
        assert_eq!(node, QueryNode::term("team.name", "Preventers"));
    }

    #[test]
    fn test_parse_range() {
        let node = QueryParser::parse(&json!({"range": {"age": {"gt": 48, "lte": 60}}})).unwrap();
        assert_eq!(node, QueryNode::range("age", "48", "60", false, true));
    }

    #[test]
    fn test_parse_single_bound_range_is_comparison() {
        let node = QueryParser::parse(&json!({"range": {"age": {"gt": 40}}})).unwrap();
        assert_eq!(node, QueryNode::compare("age", ComparisonOp::Gt, "40"));

        let node = QueryParser::parse(&json!({"range": {"age": {"lte": "40"}}})).unwrap();
        assert_eq!(node, QueryNode::compare("age", ComparisonOp::Lte, "40"));
    }

    #[test]
    fn test_parse_range_errors() {
        assert!(QueryParser::parse(&json!({"range": {"age": {}}})).is_err());
        assert!(QueryParser::parse(&json!({"range": {"age": {"gt": 1, "gte": 2}}})).is_err());
        assert!(QueryParser::parse(&json!({"range": {"age": {"from": 1}}})).is_err());
    }

    #[test]
    fn test_parse_bool() {
        let node = QueryParser::parse(&json!({
            "not": [
                {"term": {"name": "Rusty"}},
                {"group": {"or": [{"term": {"age": 47}}, {"term": {"age": 48}}]}}
            ]
        }))
        .unwrap();
        assert_eq!(
            node,
            QueryNode::not(
                QueryNode::term("name", "Rusty"),
                QueryNode::group(QueryNode::or(
                    QueryNode::term("age", "47"),
                    QueryNode::term("age", "48")
                ))
            )
        );
    }

    #[test]
    fn test_parse_unsupported_shapes() {
        let node =
            QueryParser::parse(&json!({"fuzzy": {"name": {"value": "spidr", "distance": 2}}}))
                .unwrap();
        assert_eq!(node.kind(), "fuzzy");

        let node =
            QueryParser::parse(&json!({"proximity": {"name": {"phrase": "spider boy", "slop": 3}}}))
                .unwrap();
        assert_eq!(node.kind(), "proximity");

        let node = QueryParser::parse(&json!({
            "boost": {"query": {"term": {"name": "x"}}, "factor": 2.0}
        }))
        .unwrap();
        assert_eq!(node.kind(), "boost");

        let node = QueryParser::parse(&json!({
            "field_group": {"field": "name", "query": {"or": [{"term": {"name": "a"}}]}}
        }))
        .unwrap();
        assert_eq!(node.kind(), "field_group");

        let node = QueryParser::parse(&json!({"regex": {"name": "sp.*"}})).unwrap();
        assert_eq!(node.kind(), "regex");
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            json!([]),
            json!({}),
            json!({"match": {"name": "x"}}),
            json!({"term": {"name": [1, 2]}}),
            json!({"term": {"a": "x", "b": "y"}}),
            json!({"and": {"term": {"name": "x"}}}),
            json!({"proximity": {"name": {"phrase": "a b", "slop": -1}}}),
        ] {
            let err = QueryParser::parse(&bad).unwrap_err();
            assert!(matches!(err, FilterError::QueryParseError(_)), "{}", bad);
        }
        assert!(QueryParser::parse_str("{not json").is_err());
    }
}
