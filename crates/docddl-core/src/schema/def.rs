use serde::{Deserialize, Serialize};

/// A database schema expressed as data: tables, views and the table that
/// receives document-lineage rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDef {
    /// Target database name, printed in file banners.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Table receiving one INSERT per processed document, if any.
    #[serde(default)]
    pub lineage_table: Option<String>,
    /// Tables in creation order; foreign keys may only point backwards.
    pub tables: Vec<TableDef>,
    #[serde(default)]
    pub views: Vec<ViewDef>,
}

impl SchemaDef {
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    /// Heading of the banner comment above the CREATE statement.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Vec<String>,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub constraints: Vec<ConstraintDef>,
    #[serde(default)]
    pub indexes: Vec<IndexDef>,
    /// Free text emitted as a block comment after the table.
    #[serde(default)]
    pub notes: Vec<String>,
}

impl TableDef {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: String,
    #[serde(default)]
    pub not_null: bool,
    /// Raw SQL default expression, e.g. `'Y'` or `CURRENT_TIMESTAMP`.
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintDef {
    PrimaryKey {
        name: String,
        columns: Vec<String>,
    },
    Check {
        name: String,
        expression: String,
    },
    ForeignKey {
        name: String,
        columns: Vec<String>,
        references: ForeignRef,
    },
}

impl ConstraintDef {
    pub fn name(&self) -> &str {
        match self {
            ConstraintDef::PrimaryKey { name, .. }
            | ConstraintDef::Check { name, .. }
            | ConstraintDef::ForeignKey { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignRef {
    pub table: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDef {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDef {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Vec<String>,
    /// The SELECT statement, without a trailing semicolon.
    pub query: String,
    /// Text for `COMMENT ON VIEW`.
    #[serde(default)]
    pub comment: Option<String>,
}
