//! Project-wide generation options.

use serde::{Deserialize, Serialize};

/// SQL dialect the generated project targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Sqlite,
    Postgres,
    Mysql,
    Mssql,
}

/// Project configuration edited from the project view.
///
/// Persisted wholesale as the `config` key of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Adds `createdAt`/`updatedAt` columns to every model.
    pub timestamps: bool,
    /// Uses snake_case column and table names.
    pub snake: bool,
    pub singular_table_names: bool,
    pub dialect: Dialect,
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            timestamps: true,
            snake: false,
            singular_table_names: false,
            dialect: Dialect::default(),
            name: "my-project".to_string(),
        }
    }
}
