//! Term predicates - `field:value` and `field:"value"`

use super::wildcard_query::LikePattern;
use crate::config::LikeDialect;
use crate::query::cast::ValueCaster;
use crate::query::predicate::Predicate;
use crate::query::resolver::ResolvedField;
use crate::Result;

/// Value meaning "any non-null value"
const EXISTS_MARKER: &str = "*";

/// Builds the predicate for a term node
///
/// Operator selection:
/// - unquoted `*` -> `IS NOT NULL`, whatever the column type
/// - quoted -> equality with the cast value, wildcards kept literally
/// - unquoted on a text column -> `LIKE`, see [`LikePattern`]
/// - unquoted on any other column -> equality with the cast value
pub struct TermPredicate;

impl TermPredicate {
    pub fn build(
        field: &ResolvedField,
        value: &str,
        quoted: bool,
        dialect: &LikeDialect,
    ) -> Result<Predicate> {
        let column = field.column.clone();

        if !quoted && value == EXISTS_MARKER {
            return Ok(Predicate::not_null(column));
        }

        if !quoted && field.ty().is_text() {
            let pattern = LikePattern::from_term(value, dialect);
            return Ok(Predicate::like(column, pattern.into_string()));
        }

        let cast = ValueCaster::cast(&field.path.to_string(), value, field.ty())?;
        Ok(Predicate::eq(column, cast))
    }
}
