//! Testing support
//!
//! This module provides:
//! - Fixture models (a hero database with teams and headquarters)
//! - Structural invariants every assembled statement must satisfy
//!
//! # Quick Start
//!
//! ```
//! use lucene_select::query::{QueryNode, SelectBuilder, Selection};
//! use lucene_select::testing::prelude::*;
//!
//! let statement = SelectBuilder::new(fixtures::hero())
//!     .with_relationships(fixtures::hero_relationships())
//!     .build(Some(&QueryNode::term("team.name", "Preventers")), Selection::AllColumns)
//!     .unwrap();
//!
//! let violations = check_all_invariants(&statement, &default_invariants());
//! assert!(violations.is_empty());
//! ```

pub mod fixtures;
pub mod invariants;

pub use invariants::{
    check_all_invariants, default_invariants, ColumnsReachable, Invariant, JoinsConnected,
    UniqueJoinPaths, Violation,
};

/// Prelude for easy imports
pub mod prelude {
    pub use super::fixtures;
    pub use super::invariants::{check_all_invariants, default_invariants, Invariant, Violation};
}
