use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Single- and multi-character wildcards of the target LIKE dialect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeDialect {
    pub single_char: char,
    pub multi_char: char,
}

impl Default for LikeDialect {
    fn default() -> Self {
        Self {
            single_char: '_',
            multi_char: '%',
        }
    }
}

/// SQL join kind used for relationship traversals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
}

impl JoinKind {
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT OUTER JOIN",
        }
    }
}

/// Bind parameter placeholder style used by the SQL renderer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamStyle {
    /// `?` (SQLite, MySQL)
    #[default]
    Question,
    /// `$1`, `$2`, ... (PostgreSQL)
    Dollar,
}

/// Compiler configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub like: LikeDialect,
    pub join_kind: JoinKind,
    /// Maximum query tree depth; `None` leaves depth unbounded
    pub max_depth: Option<usize>,
    pub param_style: ParamStyle,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            like: LikeDialect::default(),
            join_kind: JoinKind::Inner,
            max_depth: None,
            param_style: ParamStyle::Question,
        }
    }
}

/// Configuration profiles for common SQL engines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlDialect {
    Sqlite,
    Postgres,
    MySql,
}

impl SqlDialect {
    /// Placeholder style for this dialect
    pub fn param_style(&self) -> ParamStyle {
        match self {
            SqlDialect::Sqlite | SqlDialect::MySql => ParamStyle::Question,
            SqlDialect::Postgres => ParamStyle::Dollar,
        }
    }

    /// Apply this profile to a CompilerConfig
    pub fn apply_to(&self, config: &mut CompilerConfig) {
        config.param_style = self.param_style();
    }
}

impl std::str::FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(SqlDialect::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(SqlDialect::Postgres),
            "mysql" | "mariadb" => Ok(SqlDialect::MySql),
            other => Err(format!("unknown SQL dialect '{}'", other)),
        }
    }
}

impl CompilerConfig {
    /// Parse a configuration from JSON; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Apply a dialect profile to this configuration
    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        dialect.apply_to(&mut self);
        self
    }

    /// Set the LIKE wildcard characters
    pub fn with_like_dialect(mut self, like: LikeDialect) -> Self {
        self.like = like;
        self
    }

    /// Set the join kind
    pub fn with_join_kind(mut self, join_kind: JoinKind) -> Self {
        self.join_kind = join_kind;
        self
    }

    /// Limit the query tree depth; deeper trees fail with `DepthExceeded`
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
