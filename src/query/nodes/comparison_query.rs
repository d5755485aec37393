//! Comparison predicates - `field:>value`, `field:<=value`, ...

use crate::query::cast::ValueCaster;
use crate::query::predicate::Predicate;
use crate::query::resolver::ResolvedField;
use crate::query::types::ComparisonOp;
use crate::Result;

pub struct ComparisonPredicate;

impl ComparisonPredicate {
    pub fn build(field: &ResolvedField, op: ComparisonOp, value: &str) -> Result<Predicate> {
        let cast = ValueCaster::cast(&field.path.to_string(), value, field.ty())?;
        Ok(Predicate::compare(field.column.clone(), op.into(), cast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ast::FieldPath;
    use crate::query::resolver::{FieldResolver, JoinPlan};
    use crate::query::types::{CompareOp, Value};
    use crate::testing::fixtures;
    use chrono::NaiveDate;

    fn field(path: &str) -> ResolvedField {
        let root = fixtures::hero();
        let relationships = fixtures::hero_relationships();
        FieldResolver::new(&root, &relationships)
            .resolve(&FieldPath::from(path), &mut JoinPlan::new())
            .unwrap()
    }

    #[test]
    fn test_integer_comparison() {
        let p = ComparisonPredicate::build(&field("age"), ComparisonOp::Gt, "40").unwrap();
        assert_eq!(
            p,
            Predicate::compare(field("age").column, CompareOp::Gt, Value::Integer(40))
        );
        assert_eq!(p.to_string(), "hero.age > 40");
    }

    #[test]
    fn test_datetime_comparison_uses_start_of_day() {
        let p = ComparisonPredicate::build(&field("created_at"), ComparisonOp::Lte, "2024-01-02")
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            p,
            Predicate::compare(
                field("created_at").column,
                CompareOp::Lte,
                Value::DateTime(expected)
            )
        );
    }

    #[test]
    fn test_text_comparison_is_not_pattern() {
        let p = ComparisonPredicate::build(&field("name"), ComparisonOp::Gte, "M*").unwrap();
        assert_eq!(p.to_string(), "hero.name >= 'M*'");
    }

    #[test]
    fn test_comparison_cast_error() {
        assert!(ComparisonPredicate::build(&field("age"), ComparisonOp::Lt, "old").is_err());
    }
}
