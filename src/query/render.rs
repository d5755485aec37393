//! SQL rendering
//!
//! Turns a [`StatementDescriptor`] into parameterized SQL text. Identifiers
//! are double-quoted and every value becomes a bound parameter, so rendered
//! statements never embed user input. Nothing here executes SQL.

use crate::config::{CompilerConfig, ParamStyle};
use crate::query::predicate::Predicate;
use crate::query::resolver::{ColumnRef, JoinStep};
use crate::query::statement::{Entity, StatementDescriptor};
use crate::query::types::Value;
use serde::Serialize;
use std::fmt::Write;

/// Rendered SQL text plus its bound parameters, in placeholder order
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedSql {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SqlRenderer {
    param_style: ParamStyle,
}

impl SqlRenderer {
    pub fn new(param_style: ParamStyle) -> Self {
        Self { param_style }
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(config.param_style)
    }

    pub fn render(&self, statement: &StatementDescriptor) -> RenderedSql {
        let mut out = Output {
            sql: String::new(),
            params: Vec::new(),
            style: self.param_style,
        };

        out.sql.push_str("SELECT ");
        for (i, entity) in statement.entities.iter().enumerate() {
            if i > 0 {
                out.sql.push_str(", ");
            }
            out.entity(entity);
        }

        out.sql.push_str(" FROM ");
        out.sql.push_str(&quote(&statement.root.table));

        for join in &statement.joins {
            out.join(join);
        }

        if let Some(predicate) = &statement.predicate {
            out.sql.push_str(" WHERE ");
            out.predicate(predicate);
        }

        RenderedSql {
            sql: out.sql,
            params: out.params,
        }
    }
}

struct Output {
    sql: String,
    params: Vec<Value>,
    style: ParamStyle,
}

impl Output {
    fn entity(&mut self, entity: &Entity) {
        match entity {
            Entity::Column(column) => self.column(column),
            Entity::Aggregate {
                function,
                column,
                alias,
            } => {
                self.sql.push_str(function.as_sql());
                self.sql.push('(');
                match column {
                    Some(column) => self.column(column),
                    None => self.sql.push('*'),
                }
                self.sql.push(')');
                if let Some(alias) = alias {
                    self.sql.push_str(" AS ");
                    self.sql.push_str(&quote(alias));
                }
            }
        }
    }

    fn join(&mut self, join: &JoinStep) {
        let _ = write!(
            self.sql,
            " {} {} AS {} ON ",
            join.kind.sql_keyword(),
            quote(&join.to_table),
            quote(&join.alias)
        );
        self.column(&join.on.0);
        self.sql.push_str(" = ");
        self.column(&join.on.1);
    }

    fn predicate(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::Compare { column, op, value } => {
                self.column(column);
                let _ = write!(self.sql, " {} ", op.as_sql());
                self.param(value.clone());
            }
            Predicate::Like { column, pattern } => {
                self.column(column);
                self.sql.push_str(" LIKE ");
                self.param(Value::Text(pattern.clone()));
            }
            Predicate::NotNull { column } => {
                self.column(column);
                self.sql.push_str(" IS NOT NULL");
            }
            Predicate::And { left, right } => self.binary(left, "AND", right),
            Predicate::Or { left, right } => self.binary(left, "OR", right),
            Predicate::Not { inner } => {
                self.sql.push_str("NOT ");
                self.predicate(inner);
            }
        }
    }

    fn binary(&mut self, left: &Predicate, op: &str, right: &Predicate) {
        self.sql.push('(');
        self.predicate(left);
        let _ = write!(self.sql, " {} ", op);
        self.predicate(right);
        self.sql.push(')');
    }

    fn column(&mut self, column: &ColumnRef) {
        let _ = write!(
            self.sql,
            "{}.{}",
            quote(&column.qualifier),
            quote(&column.column)
        );
    }

    fn param(&mut self, value: Value) {
        self.params.push(value);
        match self.style {
            ParamStyle::Question => self.sql.push('?'),
            ParamStyle::Dollar => {
                let _ = write!(self.sql, "${}", self.params.len());
            }
        }
    }
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
