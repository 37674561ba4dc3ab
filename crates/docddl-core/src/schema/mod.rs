pub mod builtin;
pub mod def;

use std::collections::HashSet;
use std::path::Path;

use crate::error::DocDdlError;
use def::{ConstraintDef, SchemaDef, TableDef};

/// Columns a lineage table must have to receive per-document rows.
pub const LINEAGE_COLUMNS: &[&str] = &[
    "document_id",
    "document_name",
    "document_type",
    "table_count",
    "quality_score",
    "file_size_bytes",
    "page_count",
    "processing_notes",
];

/// Load a schema from a JSON file.
pub fn load_schema(path: &Path) -> Result<SchemaDef, DocDdlError> {
    let content = std::fs::read_to_string(path).map_err(|e| DocDdlError::SchemaLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_schema(&content, path)
}

/// Parse a schema from a JSON string.
pub fn parse_schema(json: &str, source: &Path) -> Result<SchemaDef, DocDdlError> {
    let schema: SchemaDef = serde_json::from_str(json).map_err(|e| DocDdlError::SchemaLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_schema(&schema)?;
    Ok(schema)
}

/// Parse a schema from a JSON string (no file path context).
pub fn parse_schema_str(json: &str) -> Result<SchemaDef, DocDdlError> {
    let schema: SchemaDef = serde_json::from_str(json)?;
    validate_schema(&schema)?;
    Ok(schema)
}

/// Validate that a schema is well-formed and renders to executable DDL.
pub fn validate_schema(schema: &SchemaDef) -> Result<(), DocDdlError> {
    if schema.tables.is_empty() {
        return Err(DocDdlError::SchemaInvalid("tables must not be empty".into()));
    }

    // Relation and index names share one namespace in most databases.
    let mut relations: HashSet<&str> = HashSet::new();
    let mut indexes: HashSet<&str> = HashSet::new();

    for (position, table) in schema.tables.iter().enumerate() {
        check_identifier(&table.name, "table")?;
        if !relations.insert(table.name.as_str()) {
            return Err(DocDdlError::SchemaInvalid(format!(
                "duplicate table '{}'",
                table.name
            )));
        }
        validate_table(table, &schema.tables[..position])?;

        for index in &table.indexes {
            check_identifier(&index.name, "index")?;
            if !indexes.insert(index.name.as_str()) {
                return Err(DocDdlError::SchemaInvalid(format!(
                    "duplicate index '{}'",
                    index.name
                )));
            }
            check_columns(table, &index.columns, &format!("index '{}'", index.name))?;
        }
    }

    for view in &schema.views {
        check_identifier(&view.name, "view")?;
        if !relations.insert(view.name.as_str()) {
            return Err(DocDdlError::SchemaInvalid(format!(
                "view '{}' clashes with another table or view",
                view.name
            )));
        }
        if view.query.trim().is_empty() {
            return Err(DocDdlError::SchemaInvalid(format!(
                "view '{}' has an empty query",
                view.name
            )));
        }
    }

    if let Some(ref lineage) = schema.lineage_table {
        let table = schema.table(lineage).ok_or_else(|| {
            DocDdlError::SchemaInvalid(format!("lineage table '{}' is not defined", lineage))
        })?;
        for column in LINEAGE_COLUMNS {
            if !table.has_column(column) {
                return Err(DocDdlError::SchemaInvalid(format!(
                    "lineage table '{}' is missing column '{}'",
                    lineage, column
                )));
            }
        }
    }

    Ok(())
}

fn validate_table(table: &TableDef, earlier: &[TableDef]) -> Result<(), DocDdlError> {
    if table.columns.is_empty() {
        return Err(DocDdlError::SchemaInvalid(format!(
            "table '{}' has no columns",
            table.name
        )));
    }

    let mut seen = HashSet::new();
    for column in &table.columns {
        check_identifier(&column.name, "column")?;
        if !seen.insert(column.name.as_str()) {
            return Err(DocDdlError::SchemaInvalid(format!(
                "table '{}' has duplicate column '{}'",
                table.name, column.name
            )));
        }
        if column.sql_type.trim().is_empty() {
            return Err(DocDdlError::SchemaInvalid(format!(
                "column '{}.{}' has no type",
                table.name, column.name
            )));
        }
    }

    let mut constraint_names = HashSet::new();
    let mut primary_keys = 0;
    for constraint in &table.constraints {
        check_identifier(constraint.name(), "constraint")?;
        if !constraint_names.insert(constraint.name()) {
            return Err(DocDdlError::SchemaInvalid(format!(
                "table '{}' has duplicate constraint '{}'",
                table.name,
                constraint.name()
            )));
        }
        let context = format!("constraint '{}'", constraint.name());
        match constraint {
            ConstraintDef::PrimaryKey { columns, .. } => {
                primary_keys += 1;
                check_columns(table, columns, &context)?;
            }
            ConstraintDef::Check { expression, .. } => {
                if expression.trim().is_empty() {
                    return Err(DocDdlError::SchemaInvalid(format!(
                        "{} on '{}' has an empty expression",
                        context, table.name
                    )));
                }
            }
            ConstraintDef::ForeignKey {
                columns,
                references,
                ..
            } => {
                check_columns(table, columns, &context)?;
                let target = earlier
                    .iter()
                    .find(|t| t.name == references.table)
                    .ok_or_else(|| {
                        DocDdlError::SchemaInvalid(format!(
                            "{} on '{}' references '{}', which is not defined before it",
                            context, table.name, references.table
                        ))
                    })?;
                check_columns(target, &references.columns, &context)?;
                if columns.len() != references.columns.len() {
                    return Err(DocDdlError::SchemaInvalid(format!(
                        "{} on '{}' maps {} column(s) onto {}",
                        context,
                        table.name,
                        columns.len(),
                        references.columns.len()
                    )));
                }
            }
        }
    }

    if primary_keys > 1 {
        return Err(DocDdlError::SchemaInvalid(format!(
            "table '{}' has more than one primary key",
            table.name
        )));
    }

    Ok(())
}

fn check_columns(table: &TableDef, columns: &[String], context: &str) -> Result<(), DocDdlError> {
    if columns.is_empty() {
        return Err(DocDdlError::SchemaInvalid(format!(
            "{} on '{}' lists no columns",
            context, table.name
        )));
    }
    for column in columns {
        if !table.has_column(column) {
            return Err(DocDdlError::SchemaInvalid(format!(
                "{} refers to unknown column '{}.{}'",
                context, table.name, column
            )));
        }
    }
    Ok(())
}

fn check_identifier(name: &str, kind: &str) -> Result<(), DocDdlError> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DocDdlError::SchemaInvalid(format!(
            "invalid {} name '{}'",
            kind, name
        )))
    }
}
