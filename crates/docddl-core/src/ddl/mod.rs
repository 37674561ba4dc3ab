pub mod draft;
pub mod lineage;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::DocDdlError;
use crate::model::QualityReport;
use crate::schema::def::{ColumnDef, ConstraintDef, SchemaDef, TableDef, ViewDef};

const RULE: &str = "-- ===============================================";
const SECTION_RULE: &str = "-- =============================================";

/// What goes into the generated files besides the schema itself.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub report: &'a QualityReport,
    pub generated: NaiveDate,
    /// Number of ranked tables listed in the tables file banner.
    pub top: usize,
}

/// Paths of the files written by [`write_ddl`].
#[derive(Debug, Clone)]
pub struct WrittenDdl {
    pub tables: PathBuf,
    pub views: PathBuf,
}

/// Quote a string as an SQL literal, doubling embedded single quotes.
pub fn sql_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn banner(out: &mut String, heading: &str, schema: &SchemaDef, generated: NaiveDate) {
    let database = match schema.description.as_deref() {
        Some(desc) => format!("{} ({})", schema.name, desc),
        None => schema.name.clone(),
    };
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "-- {heading}");
    let _ = writeln!(out, "-- Based on specification documents (PDF and DOCX analysis)");
    let _ = writeln!(out, "-- Database: {database}");
    let _ = writeln!(out, "-- Schema version: {}", schema.version);
    let _ = writeln!(out, "-- Generated: {}", generated.format("%Y-%m-%d"));
    let _ = writeln!(out, "-- Supports: PDF and DOCX specification sources");
    let _ = writeln!(out, "{RULE}");
    out.push('\n');
}

fn section_comment(out: &mut String, title: &str, description: &[String]) {
    let _ = writeln!(out, "{SECTION_RULE}");
    let _ = writeln!(out, "-- {title}");
    for line in description {
        let _ = writeln!(out, "-- {line}");
    }
    let _ = writeln!(out, "{SECTION_RULE}");
    out.push('\n');
}

fn ranking_summary(out: &mut String, ctx: &RenderContext<'_>) {
    let report = ctx.report;
    let _ = writeln!(out, "-- Extraction summary");
    let _ = writeln!(
        out,
        "--   Documents: {}, tables found: {} (PDF: {}, DOCX: {})",
        report.documents.len(),
        report.total_tables(),
        report.pdf_tables,
        report.docx_tables
    );
    let top = report.top(ctx.top);
    if top.is_empty() {
        let _ = writeln!(out, "--   No tables found; schema emitted from configuration only");
    } else {
        let _ = writeln!(out, "--   Top quality tables:");
        for (rank, table) in top.iter().enumerate() {
            let (rows, cols) = table.shape();
            let _ = writeln!(
                out,
                "--     {}. {}: {}% ({} x {})",
                rank + 1,
                table.id,
                table.score(),
                rows,
                cols
            );
        }
    }
    out.push('\n');
}

fn render_column(column: &ColumnDef) -> String {
    let mut line = format!("    {} {}", column.name, column.sql_type);
    if column.not_null {
        line.push_str(" NOT NULL");
    }
    if let Some(ref default) = column.default {
        let _ = write!(line, " DEFAULT {default}");
    }
    if let Some(ref comment) = column.comment {
        let _ = write!(line, " COMMENT {}", sql_string(comment));
    }
    line
}

fn render_constraint(constraint: &ConstraintDef) -> String {
    match constraint {
        ConstraintDef::PrimaryKey { name, columns } => {
            format!("    CONSTRAINT {name} PRIMARY KEY ({})", columns.join(", "))
        }
        ConstraintDef::Check { name, expression } => {
            format!("    CONSTRAINT {name} CHECK ({expression})")
        }
        ConstraintDef::ForeignKey {
            name,
            columns,
            references,
        } => format!(
            "    CONSTRAINT {name} FOREIGN KEY ({})\n        REFERENCES {}({})",
            columns.join(", "),
            references.table,
            references.columns.join(", ")
        ),
    }
}

/// Render one `CREATE TABLE` statement, with its banner comment and notes.
pub fn render_create_table(table: &TableDef) -> String {
    let mut out = String::new();
    let title = table
        .title
        .clone()
        .unwrap_or_else(|| table.name.to_uppercase());
    section_comment(&mut out, &title, &table.description);

    let mut items: Vec<String> = table.columns.iter().map(render_column).collect();
    for (i, constraint) in table.constraints.iter().enumerate() {
        let rendered = render_constraint(constraint);
        if i == 0 {
            items.push(format!("    \n    -- Constraints\n{rendered}"));
        } else {
            items.push(rendered);
        }
    }

    let _ = writeln!(out, "CREATE TABLE {} (", table.name);
    let _ = writeln!(out, "{}", items.join(",\n"));
    let _ = writeln!(out, ");");
    out.push('\n');

    if !table.notes.is_empty() {
        let _ = writeln!(out, "/*");
        for note in &table.notes {
            let _ = writeln!(out, "{note}");
        }
        let _ = writeln!(out, "*/");
        out.push('\n');
    }

    out
}

fn render_indexes(out: &mut String, schema: &SchemaDef) {
    if schema.tables.iter().all(|t| t.indexes.is_empty()) {
        return;
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "-- INDEXES FOR PERFORMANCE");
    let _ = writeln!(out, "{RULE}");
    out.push('\n');

    for table in schema.tables.iter().filter(|t| !t.indexes.is_empty()) {
        let _ = writeln!(out, "-- {} indexes", table.name);
        for index in &table.indexes {
            let unique = if index.unique { "UNIQUE " } else { "" };
            let _ = writeln!(
                out,
                "CREATE {unique}INDEX {} ON {}({});",
                index.name,
                table.name,
                index.columns.join(", ")
            );
        }
        out.push('\n');
    }
}

/// Render the full tables file: banner, extraction summary, tables,
/// indexes and document lineage rows.
pub fn render_tables_file(schema: &SchemaDef, ctx: &RenderContext<'_>) -> String {
    let mut out = String::new();
    banner(&mut out, "PRODUCTION-READY TABLE DDL STATEMENTS", schema, ctx.generated);
    ranking_summary(&mut out, ctx);

    for table in &schema.tables {
        out.push_str(&render_create_table(table));
    }
    render_indexes(&mut out, schema);

    if let Some(table) = schema.lineage_table.as_deref() {
        let rows = lineage::lineage_rows(ctx.report);
        out.push_str(&lineage::render_lineage(table, &rows));
    }

    out
}

/// Render one `CREATE VIEW` statement with its banner and `COMMENT ON VIEW`.
pub fn render_create_view(view: &ViewDef) -> String {
    let mut out = String::new();
    let title = view
        .title
        .clone()
        .unwrap_or_else(|| view.name.to_uppercase());
    section_comment(&mut out, &title, &view.description);

    let query = view.query.trim().trim_end_matches(';');
    let _ = writeln!(out, "CREATE VIEW {} AS", view.name);
    let _ = writeln!(out, "{query};");
    out.push('\n');
    if let Some(ref comment) = view.comment {
        let _ = writeln!(out, "COMMENT ON VIEW {} IS {};", view.name, sql_string(comment));
        out.push('\n');
    }
    out
}

/// Render the full views file.
pub fn render_views_file(schema: &SchemaDef, ctx: &RenderContext<'_>) -> String {
    let mut out = String::new();
    banner(&mut out, "PRODUCTION-READY VIEW DDL STATEMENTS", schema, ctx.generated);
    for view in &schema.views {
        out.push_str(&render_create_view(view));
    }
    out
}

/// Render tables, indexes and views without banners or run results.
pub fn render_schema(schema: &SchemaDef) -> String {
    let mut out = String::new();
    for table in &schema.tables {
        out.push_str(&render_create_table(table));
    }
    render_indexes(&mut out, schema);
    for view in &schema.views {
        out.push_str(&render_create_view(view));
    }
    out
}

/// Write `contents` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<(), DocDdlError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DocDdlError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| DocDdlError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Render and write both DDL files.
pub fn write_ddl(
    schema: &SchemaDef,
    ctx: &RenderContext<'_>,
    tables_path: &Path,
    views_path: &Path,
) -> Result<WrittenDdl, DocDdlError> {
    write_file(tables_path, &render_tables_file(schema, ctx))?;
    info!(path = %tables_path.display(), tables = schema.tables.len(), "wrote table DDL");

    write_file(views_path, &render_views_file(schema, ctx))?;
    info!(path = %views_path.display(), views = schema.views.len(), "wrote view DDL");

    Ok(WrittenDdl {
        tables: tables_path.to_path_buf(),
        views: views_path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::builtin;

    fn ctx(report: &QualityReport) -> RenderContext<'_> {
        RenderContext {
            report,
            generated: NaiveDate::from_ymd_opt(2025, 6, 26).unwrap(),
            top: 5,
        }
    }

    #[test]
    fn test_sql_string_escapes_quotes() {
        assert_eq!(sql_string("O'Brien's spec"), "'O''Brien''s spec'");
    }

    #[test]
    fn test_tables_file_contains_schema() {
        let schema = builtin::banking().unwrap();
        let report = QualityReport::default();
        let sql = render_tables_file(&schema, &ctx(&report));

        assert_eq!(sql.matches("CREATE TABLE ").count(), 5);
        assert!(sql.contains("-- Generated: 2025-06-26"));
        assert!(sql.contains("No tables found"));
        assert!(sql.contains(
            "    CONSTRAINT fk_trans_account FOREIGN KEY (acct_num, co_id)\n        REFERENCES account_master(acct_num, co_id)"
        ));
        assert!(sql.contains("nullable_flag CHAR(1) DEFAULT 'Y' COMMENT 'Y=Nullable, N=Not Nullable'"));
        assert!(sql.contains("CREATE INDEX idx_transaction_daily_acct ON transaction_daily(acct_num, co_id);"));
        assert!(sql.contains("'CR0001.R-ACT-NO'"));
    }

    #[test]
    fn test_constraints_follow_columns() {
        let schema = builtin::banking().unwrap();
        let table = schema.table("document_specification").unwrap();
        let sql = render_create_table(table);
        assert!(sql.contains(
            "processing_notes TEXT COMMENT 'Extraction processing notes',\n    \n    -- Constraints\n    CONSTRAINT pk_document_spec PRIMARY KEY (document_id),\n"
        ));
        assert!(sql.trim_end().ends_with(");"));
    }

    #[test]
    fn test_views_file() {
        let schema = builtin::banking().unwrap();
        let report = QualityReport::default();
        let sql = render_views_file(&schema, &ctx(&report));

        assert_eq!(sql.matches("CREATE VIEW ").count(), 4);
        assert!(sql.contains("CREATE VIEW v_tran_history AS\nSELECT"));
        assert!(sql.contains("ORDER BY c.source_document, c.pii_type;"));
        assert!(sql.contains(
            "COMMENT ON VIEW v_document_analysis IS 'Analysis view combining document metadata with extracted field information';"
        ));
    }

    #[test]
    fn test_render_schema_has_no_run_sections() {
        let schema = builtin::banking().unwrap();
        let sql = render_schema(&schema);
        assert_eq!(sql.matches("CREATE TABLE ").count(), 5);
        assert_eq!(sql.matches("CREATE VIEW ").count(), 4);
        assert!(sql.contains("INDEXES FOR PERFORMANCE"));
        assert!(!sql.contains("Generated:"));
        assert!(!sql.contains("DOCUMENT LINEAGE"));
    }

    #[test]
    fn test_write_ddl_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let schema = builtin::banking().unwrap();
        let report = QualityReport::default();
        let tables = dir.path().join("out/final_tables.sql");
        let views = dir.path().join("out/final_views.sql");

        let written = write_ddl(&schema, &ctx(&report), &tables, &views).unwrap();
        assert!(std::fs::read_to_string(written.tables).unwrap().contains("CREATE TABLE account_master"));
        assert!(std::fs::read_to_string(written.views).unwrap().contains("CREATE VIEW"));
    }
}
