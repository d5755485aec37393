//! Range predicates - `field:[lo TO hi]`, `field:{lo TO hi}` and mixed brackets

use crate::query::cast::ValueCaster;
use crate::query::predicate::Predicate;
use crate::query::resolver::ResolvedField;
use crate::query::types::CompareOp;
use crate::Result;

/// Bound value meaning "unbounded on this side"
const OPEN_BOUND: &str = "*";

/// One side of a range, with its own inclusivity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeBound<'a> {
    pub value: &'a str,
    pub inclusive: bool,
}

impl<'a> RangeBound<'a> {
    pub fn new(value: &'a str, inclusive: bool) -> Self {
        Self { value, inclusive }
    }

    /// Check if this side is unbounded
    pub fn is_open(&self) -> bool {
        self.value == OPEN_BOUND
    }
}

/// Builds the predicate for a range node
///
/// `[`/`]` give `>=`/`<=`, `{`/`}` give `>`/`<`, each bound on its own. The
/// lower bound is ANDed with the upper one. A `*` bound is left out, and
/// `[* TO *]` only requires the field to be non-null.
pub struct RangePredicate;

impl RangePredicate {
    pub fn build(field: &ResolvedField, lo: RangeBound<'_>, hi: RangeBound<'_>) -> Result<Predicate> {
        let lower = Self::bound(field, lo, CompareOp::Gte, CompareOp::Gt)?;
        let upper = Self::bound(field, hi, CompareOp::Lte, CompareOp::Lt)?;

        Ok(match (lower, upper) {
            (Some(lower), Some(upper)) => lower.and(upper),
            (Some(lower), None) => lower,
            (None, Some(upper)) => upper,
            (None, None) => Predicate::not_null(field.column.clone()),
        })
    }

    fn bound(
        field: &ResolvedField,
        bound: RangeBound<'_>,
        inclusive_op: CompareOp,
        exclusive_op: CompareOp,
    ) -> Result<Option<Predicate>> {
        if bound.is_open() {
            return Ok(None);
        }
        let value = ValueCaster::cast(&field.path.to_string(), bound.value, field.ty())?;
        let op = if bound.inclusive {
            inclusive_op
        } else {
            exclusive_op
        };
        Ok(Some(Predicate::compare(field.column.clone(), op, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ast::FieldPath;
    use crate::query::resolver::{FieldResolver, JoinPlan};
    use crate::testing::fixtures;

    fn field(path: &str) -> ResolvedField {
        let root = fixtures::hero();
        let relationships = fixtures::hero_relationships();
        FieldResolver::new(&root, &relationships)
            .resolve(&FieldPath::from(path), &mut JoinPlan::new())
            .unwrap()
    }

    fn range(lo: &str, lo_inc: bool, hi: &str, hi_inc: bool) -> String {
        RangePredicate::build(&field("age"), RangeBound::new(lo, lo_inc), RangeBound::new(hi, hi_inc))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_exclusive_range() {
        assert_eq!(range("48", false, "60", false), "(hero.age > 48 AND hero.age < 60)");
    }

    #[test]
    fn test_inclusive_range() {
        assert_eq!(range("40", true, "50", true), "(hero.age >= 40 AND hero.age <= 50)");
    }

    #[test]
    fn test_mixed_inclusivity_is_per_bound() {
        assert_eq!(range("48", false, "60", true), "(hero.age > 48 AND hero.age <= 60)");
        assert_eq!(range("48", true, "60", false), "(hero.age >= 48 AND hero.age < 60)");
    }

    #[test]
    fn test_open_bounds() {
        assert_eq!(range("*", true, "60", true), "hero.age <= 60");
        assert_eq!(range("18", false, "*", true), "hero.age > 18");
        assert_eq!(range("*", true, "*", true), "hero.age IS NOT NULL");
    }

    #[test]
    fn test_date_range_on_datetime_column() {
        let p = RangePredicate::build(
            &field("created_at"),
            RangeBound::new("2024-01-01", true),
            RangeBound::new("2024-01-03", true),
        )
        .unwrap();
        assert_eq!(
            p.to_string(),
            "(hero.created_at >= '2024-01-01 00:00:00' AND hero.created_at <= '2024-01-03 00:00:00')"
        );
    }

    #[test]
    fn test_range_cast_error_on_either_bound() {
        let f = field("age");
        assert!(RangePredicate::build(&f, RangeBound::new("x", true), RangeBound::new("5", true)).is_err());
        assert!(RangePredicate::build(&f, RangeBound::new("1", true), RangeBound::new("y", true)).is_err());
    }
}
