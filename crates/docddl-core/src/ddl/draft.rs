//! Draft `CREATE TABLE` statements inferred from extracted grids.
//!
//! These are a starting point for reviewing a specification's tables, not
//! part of the configured schema: the first row becomes the column names
//! and each column's type is guessed from the cells below it.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::DocDdlError;
use crate::model::{ExtractedTable, SourceFormat};
use crate::normalize::{clean_column_name, dedupe_names, pad_grid};

/// Infer an SQL type from a column's non-header cells.
///
/// Empty cells are ignored. Integers, then decimals, then booleans are
/// tried; anything else is text sized by its longest value.
pub fn infer_sql_type(values: &[&str]) -> &'static str {
    let filled: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();

    if !filled.is_empty() {
        if filled.iter().all(|v| v.parse::<i64>().is_ok()) {
            return "INTEGER";
        }
        if filled
            .iter()
            .all(|v| v.parse::<f64>().is_ok_and(f64::is_finite))
        {
            return "DECIMAL(18,2)";
        }
        if filled
            .iter()
            .all(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false"))
        {
            return "BOOLEAN";
        }
    }

    let max_len = filled.iter().map(|v| v.chars().count()).max().unwrap_or(0);
    if max_len <= 50 {
        "VARCHAR(50)"
    } else if max_len <= 255 {
        "VARCHAR(255)"
    } else {
        "TEXT"
    }
}

/// Upper-cased file stem plus format, e.g. `SPEC_PDF` for `spec.pdf`.
pub fn document_base(source: &str, format: SourceFormat) -> String {
    let stem = Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source);
    format!("{}_{}", clean_column_name(stem), format)
}

/// One base name per source document, unique across `tables`.
///
/// Documents whose names clean to the same base (`Spec v2.docx` and
/// `Spec_v2.docx`) get `_2`, `_3` suffixes in document-name order.
pub fn draft_bases(tables: &[ExtractedTable]) -> BTreeMap<(String, SourceFormat), String> {
    let mut sources: Vec<(String, SourceFormat)> = tables
        .iter()
        .map(|t| (t.id.source.clone(), t.id.format))
        .collect();
    sources.sort();
    sources.dedup();

    let bases = dedupe_names(
        sources
            .iter()
            .map(|(source, format)| document_base(source, *format))
            .collect(),
    );
    sources.into_iter().zip(bases).collect()
}

/// Render a draft for one table under `base`, or `None` when it has no data rows.
pub fn render_draft(table: &ExtractedTable, base: &str) -> Option<(String, String)> {
    if table.rows.len() < 2 {
        return None;
    }
    let grid = pad_grid(&table.rows);
    let width = grid.first().map(Vec::len).unwrap_or(0);
    if width == 0 {
        return None;
    }

    let names = dedupe_names(grid[0].iter().map(|h| clean_column_name(h)).collect());
    let table_name = format!("{}_TABLE_{}", base, table.id.index + 1);

    let columns: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let values: Vec<&str> = grid[1..].iter().map(|row| row[col].as_str()).collect();
            format!("    {} {}", name, infer_sql_type(&values))
        })
        .collect();

    let mut sql = String::new();
    let _ = writeln!(
        sql,
        "-- DDL for {}, table #{}",
        table.id.source,
        table.id.index + 1
    );
    let _ = writeln!(
        sql,
        "-- Quality score: {} (completeness {}, row density {})",
        table.quality.score, table.quality.completeness, table.quality.row_density
    );
    let _ = writeln!(sql, "CREATE TABLE {table_name} (");
    let _ = writeln!(sql, "{}", columns.join(",\n"));
    let _ = writeln!(sql, ");");

    Some((table_name, sql))
}

/// Write one draft file per table under `dir/<DOC>/<DOC>_TABLE_<n>.sql`.
pub fn write_drafts(tables: &[ExtractedTable], dir: &Path) -> Result<Vec<PathBuf>, DocDdlError> {
    let bases = draft_bases(tables);
    let mut written = Vec::new();

    for table in tables {
        let Some(base) = bases.get(&(table.id.source.clone(), table.id.format)) else {
            continue;
        };
        let Some((table_name, sql)) = render_draft(table, base) else {
            debug!(table = %table.id, "skipping draft: no data rows");
            continue;
        };
        let folder = dir.join(base);
        std::fs::create_dir_all(&folder).map_err(|source| DocDdlError::Write {
            path: folder.clone(),
            source,
        })?;
        let path = folder.join(format!("{table_name}.sql"));
        std::fs::write(&path, sql).map_err(|source| DocDdlError::Write {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }

    info!(count = written.len(), dir = %dir.display(), "wrote draft table DDL");
    Ok(written)
}
