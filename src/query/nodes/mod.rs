//! Predicate builders for the individual query node shapes
//!
//! Each builder takes an already resolved field and produces one
//! [`Predicate`](crate::query::predicate::Predicate). Boolean composition
//! lives in [`BoolCombinator`].

mod bool_query;
mod comparison_query;
mod range_query;
mod term_query;
mod wildcard_query;

pub use bool_query::BoolCombinator;
pub use comparison_query::ComparisonPredicate;
pub use range_query::{RangeBound, RangePredicate};
pub use term_query::TermPredicate;
pub use wildcard_query::LikePattern;
