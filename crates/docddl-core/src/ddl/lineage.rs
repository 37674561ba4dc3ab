use rust_decimal::Decimal;
use std::fmt::Write as _;

use crate::ddl::sql_string;
use crate::model::{QualityReport, SourceFormat};
use crate::schema::LINEAGE_COLUMNS;

/// One document-lineage row, destined for the schema's lineage table.
#[derive(Debug, Clone, PartialEq)]
pub struct LineageRow {
    pub document_id: String,
    pub document_name: String,
    pub document_type: SourceFormat,
    pub table_count: usize,
    pub quality_score: Decimal,
    pub file_size_bytes: Option<u64>,
    pub page_count: Option<u32>,
    pub processing_notes: String,
}

/// Build lineage rows in report order; ids are `DOC-001`, `DOC-002`, ...
pub fn lineage_rows(report: &QualityReport) -> Vec<LineageRow> {
    report
        .documents
        .iter()
        .enumerate()
        .map(|(i, doc)| LineageRow {
            document_id: format!("DOC-{:03}", i + 1),
            document_name: doc.name.clone(),
            document_type: doc.format,
            table_count: doc.table_count,
            quality_score: doc.mean_score,
            file_size_bytes: doc.file_size_bytes,
            page_count: doc.page_count,
            processing_notes: doc.notes.join("; "),
        })
        .collect()
}

fn nullable<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "NULL".to_string(), |v| v.to_string())
}

/// Render `INSERT` statements for the lineage rows.
pub fn render_lineage(table: &str, rows: &[LineageRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "-- ===============================================");
    let _ = writeln!(out, "-- DOCUMENT LINEAGE");
    let _ = writeln!(out, "-- ===============================================");
    out.push('\n');

    if rows.is_empty() {
        let _ = writeln!(out, "-- No documents processed");
        return out;
    }

    let columns = LINEAGE_COLUMNS.join(", ");
    for row in rows {
        let _ = writeln!(out, "INSERT INTO {table} ({columns})");
        let _ = writeln!(
            out,
            "VALUES ({}, {}, {}, {}, {}, {}, {}, {});",
            sql_string(&row.document_id),
            sql_string(&row.document_name),
            sql_string(&row.document_type.to_string()),
            row.table_count,
            row.quality_score,
            nullable(row.file_size_bytes),
            nullable(row.page_count),
            sql_string(&row.processing_notes),
        );
    }
    out.push('\n');
    out
}
