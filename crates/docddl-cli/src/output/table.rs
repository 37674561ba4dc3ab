use std::fmt::Write;

use docddl_core::model::QualityReport;

pub fn format_report(report: &QualityReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "=== Documents ({}) ===\n",
        report.documents.len()
    );
    let max_name = report
        .documents
        .iter()
        .map(|d| d.name.len())
        .max()
        .unwrap_or(10);
    for doc in &report.documents {
        let pages = doc
            .page_count
            .map(|p| format!(", {p} page(s)"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<width$}  {:<4}  {} table(s), mean score {}{}",
            doc.name,
            doc.format.to_string(),
            doc.table_count,
            doc.mean_score,
            pages,
            width = max_name
        );
        for note in &doc.notes {
            let _ = writeln!(out, "    {note}");
        }
    }

    let _ = writeln!(
        out,
        "\n=== Ranked tables ({}: {} PDF, {} DOCX) ===\n",
        report.total_tables(),
        report.pdf_tables,
        report.docx_tables
    );
    if report.ranked.is_empty() {
        let _ = writeln!(out, "  No tables found.");
        return out;
    }

    let _ = writeln!(
        out,
        "  {:>4}  {:>7}  {:>12}  {:>11}  {:>9}  Table",
        "Rank", "Score", "Completeness", "Row density", "Shape"
    );
    for (i, table) in report.ranked.iter().enumerate() {
        let (rows, cols) = table.shape();
        let _ = writeln!(
            out,
            "  {:>4}  {:>7}  {:>12}  {:>11}  {:>9}  {}",
            i + 1,
            table.quality.score.to_string(),
            table.quality.completeness.to_string(),
            table.quality.row_density.to_string(),
            format!("{rows} x {cols}"),
            table.id
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use docddl_core::model::{DocumentSummary, ExtractedTable, QualityBreakdown, SourceFormat, TableId};
    use rust_decimal::Decimal;

    #[test]
    fn test_format_report() {
        let report = QualityReport {
            pdf_tables: 0,
            docx_tables: 1,
            documents: vec![DocumentSummary {
                name: "mapping.docx".into(),
                format: SourceFormat::Docx,
                file_size_bytes: Some(100),
                page_count: None,
                table_count: 1,
                mean_score: Decimal::ONE_HUNDRED,
                notes: vec!["1 table(s) extracted with docx".into()],
            }],
            ranked: vec![ExtractedTable {
                id: TableId {
                    source: "mapping.docx".into(),
                    format: SourceFormat::Docx,
                    index: 0,
                },
                rows: vec![vec!["a".into(), "b".into()]],
                quality: QualityBreakdown {
                    completeness: Decimal::ONE_HUNDRED,
                    row_density: Decimal::ONE_HUNDRED,
                    score: Decimal::ONE_HUNDRED,
                },
            }],
        };

        let text = format_report(&report);
        assert!(text.contains("mapping.docx  DOCX  1 table(s), mean score 100"));
        assert!(text.contains("    1 table(s) extracted with docx"));
        assert!(text.contains("1 x 2  DOCX table 1 from mapping.docx"));
    }

    #[test]
    fn test_empty_report() {
        let text = format_report(&QualityReport::default());
        assert!(text.contains("No tables found."));
    }
}
