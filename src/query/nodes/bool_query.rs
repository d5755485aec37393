//! Boolean combination - AND, OR, NOT and grouping
//!
//! AND and OR fold their children left to right. NOT is binary: `A NOT B`
//! compiles to `A AND NOT B`, never `NOT A AND B`.

use crate::error::FilterError;
use crate::query::predicate::Predicate;
use crate::query::types::BoolOp;
use crate::Result;

pub struct BoolCombinator;

impl BoolCombinator {
    /// Combine compiled children under `op`
    pub fn combine(op: BoolOp, children: Vec<Predicate>) -> Result<Predicate> {
        match op {
            BoolOp::And => Self::fold(op, children, Predicate::and),
            BoolOp::Or => Self::fold(op, children, Predicate::or),
            BoolOp::Not => Self::exclude(children),
        }
    }

    /// Grouping only shapes the tree; the child passes through unchanged
    pub fn group(child: Predicate) -> Predicate {
        child
    }

    fn fold(
        op: BoolOp,
        children: Vec<Predicate>,
        join: fn(Predicate, Predicate) -> Predicate,
    ) -> Result<Predicate> {
        let mut iter = children.into_iter();
        let first = iter.next().ok_or_else(|| {
            FilterError::MalformedTree(format!("{} requires at least one operand", op.name()))
        })?;
        Ok(iter.fold(first, join))
    }

    fn exclude(children: Vec<Predicate>) -> Result<Predicate> {
        let count = children.len();
        let mut iter = children.into_iter();
        match (iter.next(), iter.next(), iter.next()) {
            (Some(keep), Some(drop), None) => Ok(keep.and(drop.negate())),
            _ => Err(FilterError::MalformedTree(format!(
                "NOT requires exactly two operands, got {}",
                count
            ))),
        }
    }
}
