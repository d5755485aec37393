//! Structural invariants of assembled statements
//!
//! These hold for every statement the compiler and assembler produce. Tests
//! run them over compiled fixtures to catch join bookkeeping mistakes that
//! the rendered predicate alone would hide.

use crate::query::{JoinStep, StatementDescriptor};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A violation of an invariant
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub invariant: String,
    pub description: String,
    pub context: HashMap<String, String>,
}

impl Violation {
    fn new(invariant: &str, description: impl Into<String>) -> Self {
        Self {
            invariant: invariant.to_string(),
            description: description.into(),
            context: HashMap::new(),
        }
    }

    fn with_context(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "INVARIANT VIOLATION: {}", self.invariant)?;
        writeln!(f, "  Description: {}", self.description)?;
        if !self.context.is_empty() {
            writeln!(f, "  Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "    {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Trait for invariant checkers
pub trait Invariant: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self, statement: &StatementDescriptor) -> Result<(), Violation>;

    fn description(&self) -> &str {
        "No description provided"
    }
}

/// Check all invariants and return violations
pub fn check_all_invariants(
    statement: &StatementDescriptor,
    invariants: &[Box<dyn Invariant>],
) -> Vec<Violation> {
    invariants
        .iter()
        .filter_map(|invariant| invariant.check(statement).err())
        .collect()
}

/// No relationship path is joined twice
pub struct UniqueJoinPaths;

impl Invariant for UniqueJoinPaths {
    fn name(&self) -> &str {
        "UniqueJoinPaths"
    }

    fn description(&self) -> &str {
        "Each relationship path appears in at most one join"
    }

    fn check(&self, statement: &StatementDescriptor) -> Result<(), Violation> {
        let mut seen = HashSet::new();
        for join in &statement.joins {
            if !seen.insert(&join.path) {
                return Err(Violation::new(self.name(), "relationship path joined twice")
                    .with_context("path", join.path.join(".")));
            }
        }
        Ok(())
    }
}

/// Every join hangs off the root or an earlier join
pub struct JoinsConnected;

impl Invariant for JoinsConnected {
    fn name(&self) -> &str {
        "JoinsConnected"
    }

    fn description(&self) -> &str {
        "A join's left side is the root table or an earlier join alias"
    }

    fn check(&self, statement: &StatementDescriptor) -> Result<(), Violation> {
        let mut visible: HashSet<&str> = HashSet::new();
        visible.insert(&statement.root.table);

        for join in &statement.joins {
            let parent = parent_qualifier(join, &statement.root.table);
            if !visible.contains(parent.as_str()) || join.on.0.qualifier != parent {
                return Err(Violation::new(self.name(), "join is not connected to its parent")
                    .with_context("alias", &join.alias)
                    .with_context("left", &join.on.0));
            }
            if join.on.1.qualifier != join.alias {
                return Err(Violation::new(self.name(), "join condition does not use the join alias")
                    .with_context("alias", &join.alias)
                    .with_context("right", &join.on.1));
            }
            visible.insert(&join.alias);
        }
        Ok(())
    }
}

/// Every referenced column comes from the root or a join
pub struct ColumnsReachable;

impl Invariant for ColumnsReachable {
    fn name(&self) -> &str {
        "ColumnsReachable"
    }

    fn description(&self) -> &str {
        "Predicate and selected columns are qualified by the root table or a join alias"
    }

    fn check(&self, statement: &StatementDescriptor) -> Result<(), Violation> {
        let visible: HashSet<&str> = std::iter::once(statement.root.table.as_str())
            .chain(statement.joins.iter().map(|j| j.alias.as_str()))
            .collect();

        let predicate_columns = statement
            .predicate
            .iter()
            .flat_map(|p| p.columns());
        let entity_columns = statement.entities.iter().filter_map(|e| e.column_ref());

        for column in predicate_columns.chain(entity_columns) {
            if !visible.contains(column.qualifier.as_str()) {
                return Err(Violation::new(self.name(), "column is not reachable")
                    .with_context("column", column));
            }
        }
        Ok(())
    }
}

fn parent_qualifier(join: &JoinStep, root_table: &str) -> String {
    match join.path.split_last() {
        Some((_, parent)) if !parent.is_empty() => JoinStep::alias_for(parent),
        _ => root_table.to_string(),
    }
}

pub fn default_invariants() -> Vec<Box<dyn Invariant>> {
    vec![
        Box::new(UniqueJoinPaths),
        Box::new(JoinsConnected),
        Box::new(ColumnsReachable),
    ]
}
