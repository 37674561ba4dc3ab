//! Integration tests for the scan and generate pipeline.
//!
//! Uses a MockExtractor that returns pre-built grids without invoking
//! pdftotext, so these tests run without poppler-utils.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use docddl_core::error::DocDdlError;
use docddl_core::extraction::docx::DocxExtractor;
use docddl_core::extraction::{Extraction, TableExtractor};
use docddl_core::model::{Grid, SourceFormat};
use docddl_core::schema::builtin;
use docddl_core::{generate, scan_directory, RunOptions, ScanOptions};

struct MockExtractor {
    format: SourceFormat,
    available: bool,
    /// Grids keyed by file name; missing names fail extraction.
    documents: HashMap<String, Vec<Grid>>,
}

impl MockExtractor {
    fn new(format: SourceFormat) -> Self {
        MockExtractor {
            format,
            available: true,
            documents: HashMap::new(),
        }
    }

    fn with(mut self, name: &str, grids: Vec<Grid>) -> Self {
        self.documents.insert(name.to_string(), grids);
        self
    }

    fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

impl TableExtractor for MockExtractor {
    fn format(&self) -> SourceFormat {
        self.format
    }

    fn extract(&self, path: &Path) -> Result<Extraction, DocDdlError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        match self.documents.get(name) {
            Some(grids) => Ok(Extraction {
                grids: grids.clone(),
                page_count: (self.format == SourceFormat::Pdf).then_some(3),
            }),
            None => Err(DocDdlError::Extraction(format!("corrupt file {name}"))),
        }
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn grid(rows: &[&[&str]]) -> Grid {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"placeholder").unwrap();
    }
}

fn full_table() -> Grid {
    grid(&[
        &["Source Column", "Target Column", "Data Type"],
        &["R-ACT-NO", "ACCT_NUM", "VARCHAR(18)"],
        &["R-CO-ID", "CO_ID", "VARCHAR(4)"],
    ])
}

fn ragged_table() -> Grid {
    grid(&[
        &["Field", "Length", "Type", "Notes"],
        &["TRAN_DT", "8", "DATE", "posting date"],
        &["TRAN_AMT", "17", "DECIMAL"],
        &["ACCT_NUM", "18", "CHAR", "key"],
    ])
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

#[test]
fn scan_ranks_tables_across_formats() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &["mapping.docx", "spec.pdf", "readme.txt"]);

    let pdf = MockExtractor::new(SourceFormat::Pdf).with("spec.pdf", vec![ragged_table()]);
    let docx = MockExtractor::new(SourceFormat::Docx).with("mapping.docx", vec![full_table()]);

    let report = scan_directory(dir.path(), &[&pdf, &docx], &ScanOptions::default()).unwrap();

    assert_eq!(report.pdf_tables, 1);
    assert_eq!(report.docx_tables, 1);
    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.ranked[0].id.source, "mapping.docx");
    assert_eq!(report.ranked[0].score(), dec!(100));
    assert_eq!(report.ranked[1].quality.completeness, dec!(93.75));
    assert_eq!(report.ranked[1].quality.row_density, dec!(75));
    assert_eq!(report.ranked[1].score(), dec!(88.13));

    let pdf_doc = &report.documents[1];
    assert_eq!(pdf_doc.name, "spec.pdf");
    assert_eq!(pdf_doc.page_count, Some(3));
    assert_eq!(pdf_doc.file_size_bytes, Some(11));
    assert_eq!(pdf_doc.mean_score, dec!(88.13));
}

#[test]
fn unavailable_pdf_backend_still_yields_docx_tables() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &["a.pdf", "b.docx"]);

    let pdf = MockExtractor::new(SourceFormat::Pdf)
        .with("a.pdf", vec![full_table()])
        .unavailable();
    let docx = MockExtractor::new(SourceFormat::Docx).with("b.docx", vec![full_table()]);

    let report = scan_directory(dir.path(), &[&pdf, &docx], &ScanOptions::default()).unwrap();

    assert_eq!(report.pdf_tables, 0);
    assert_eq!(report.docx_tables, 1);
    assert_eq!(report.documents[0].table_count, 0);
    assert!(report.documents[0].notes[0].contains("unavailable"));
}

#[test]
fn failed_document_degrades_to_zero_tables() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &["broken.docx", "good.docx"]);

    let docx = MockExtractor::new(SourceFormat::Docx).with("good.docx", vec![full_table()]);
    let report = scan_directory(dir.path(), &[&docx], &ScanOptions::default()).unwrap();

    let broken = &report.documents[0];
    assert_eq!(broken.name, "broken.docx");
    assert_eq!(broken.table_count, 0);
    assert_eq!(broken.mean_score, dec!(0));
    assert!(broken.notes[0].starts_with("extraction failed"));
    assert_eq!(report.docx_tables, 1);
}

#[test]
fn missing_extractor_is_noted() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &["only.pdf"]);

    let docx = MockExtractor::new(SourceFormat::Docx);
    let report = scan_directory(dir.path(), &[&docx], &ScanOptions::default()).unwrap();

    assert_eq!(report.total_tables(), 0);
    assert_eq!(report.documents[0].notes, vec!["no extractor registered for PDF"]);
}

#[test]
fn empty_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &["notes.txt"]);

    let docx = MockExtractor::new(SourceFormat::Docx);
    let err = scan_directory(dir.path(), &[&docx], &ScanOptions::default()).unwrap_err();
    assert!(matches!(err, DocDdlError::NoDocuments(_)));
}

#[test]
fn min_rows_discards_small_tables() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &["spec.docx"]);

    let docx = MockExtractor::new(SourceFormat::Docx).with(
        "spec.docx",
        vec![grid(&[&["Heading only"]]), full_table(), grid(&[&["", " "]])],
    );
    let options = ScanOptions {
        min_rows: 2,
        ..ScanOptions::default()
    };
    let report = scan_directory(dir.path(), &[&docx], &options).unwrap();

    assert_eq!(report.docx_tables, 1);
    assert_eq!(report.ranked[0].id.index, 0);
    assert!(report.documents[0]
        .notes
        .iter()
        .any(|n| n == "2 table(s) with fewer than 2 row(s) discarded"));
}

#[test]
fn ranking_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &["b.docx", "a.docx", "c.pdf"]);

    let pdf = MockExtractor::new(SourceFormat::Pdf).with("c.pdf", vec![full_table(), full_table()]);
    let docx = MockExtractor::new(SourceFormat::Docx)
        .with("a.docx", vec![full_table(), ragged_table()])
        .with("b.docx", vec![full_table()]);

    let order = |report: &docddl_core::model::QualityReport| {
        report
            .ranked
            .iter()
            .map(|t| t.id.to_string())
            .collect::<Vec<_>>()
    };

    let first = scan_directory(dir.path(), &[&pdf, &docx], &ScanOptions::default()).unwrap();
    let second = scan_directory(dir.path(), &[&docx, &pdf], &ScanOptions::default()).unwrap();

    assert_eq!(order(&first), order(&second));
    assert_eq!(
        order(&first),
        vec![
            "DOCX table 1 from a.docx",
            "DOCX table 1 from b.docx",
            "PDF table 1 from c.pdf",
            "PDF table 2 from c.pdf",
            "DOCX table 2 from a.docx",
        ]
    );
}

// ---------------------------------------------------------------------------
// Real DOCX through the full pipeline
// ---------------------------------------------------------------------------

fn write_docx(path: &Path, rows: &[&[&str]]) {
    let mut body = String::from("<w:tbl>");
    for row in rows {
        body.push_str("<w:tr>");
        for cell in *row {
            body.push_str(&format!("<w:tc><w:p><w:r><w:t>{cell}</w:t></w:r></w:p></w:tc>"));
        }
        body.push_str("</w:tr>");
    }
    body.push_str("</w:tbl>");
    write_docx_body(path, &body);
}

fn write_docx_body(path: &Path, body: &str) {
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    let bytes = writer.finish().unwrap().into_inner();
    std::fs::write(path, bytes).unwrap();
}

#[test]
fn generate_writes_ddl_with_lineage() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_docx(
        &input.path().join("Column Mapping.docx"),
        &[
            &["Source Column", "Target Column"],
            &["R-ACT-NO", "ACCT_NUM"],
            &["R-CO-ID", "CO_ID"],
        ],
    );
    touch(input.path(), &["~$Column Mapping.docx"]);

    let pdf = MockExtractor::new(SourceFormat::Pdf).unavailable();
    let docx = DocxExtractor::new();
    let options = RunOptions {
        input_dir: input.path().to_path_buf(),
        tables_out: output.path().join("final_tables.sql"),
        views_out: output.path().join("final_views.sql"),
        ..RunOptions::default()
    };
    let schema = builtin::banking().unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 6, 26).unwrap();

    let outcome = generate(&options, &schema, &[&pdf, &docx], date).unwrap();

    assert_eq!(outcome.report.docx_tables, 1);
    assert_eq!(outcome.report.ranked[0].score(), dec!(100));

    let tables = std::fs::read_to_string(&outcome.written.tables).unwrap();
    assert_eq!(tables.matches("CREATE TABLE ").count(), 5);
    assert!(tables.contains("-- Generated: 2025-06-26"));
    assert!(tables.contains("DOCX table 1 from Column Mapping.docx: 100% (3 x 2)"));
    assert!(tables.contains(
        "VALUES ('DOC-001', 'Column Mapping.docx', 'DOCX', 1, 100, "
    ));
    assert!(!tables.contains("~$"));

    let views = std::fs::read_to_string(&outcome.written.views).unwrap();
    assert_eq!(views.matches("CREATE VIEW ").count(), 4);
}

#[test]
fn oversized_cell_span_degrades_to_zero_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_docx_body(
        &dir.path().join("broken.docx"),
        "<w:tbl><w:tr><w:tc><w:tcPr><w:gridSpan w:val=\"100000\"/></w:tcPr>\
         <w:p><w:r><w:t>x</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
    );
    write_docx(&dir.path().join("good.docx"), &[&["A", "B"], &["1", "2"]]);

    let docx = DocxExtractor::new();
    let report = scan_directory(dir.path(), &[&docx], &ScanOptions::default()).unwrap();

    assert_eq!(report.documents[0].name, "broken.docx");
    assert_eq!(report.documents[0].table_count, 0);
    assert!(report.documents[0].notes[0].starts_with("extraction failed"));
    assert_eq!(report.docx_tables, 1);
}

#[test]
fn generate_without_tables_still_emits_schema() {
    let input = tempfile::tempdir().unwrap();
    touch(input.path(), &["scan.pdf"]);
    let output = tempfile::tempdir().unwrap();

    let pdf = MockExtractor::new(SourceFormat::Pdf).with("scan.pdf", vec![]);
    let options = RunOptions {
        input_dir: input.path().to_path_buf(),
        tables_out: output.path().join("t.sql"),
        views_out: output.path().join("v.sql"),
        ..RunOptions::default()
    };
    let schema = builtin::banking().unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();

    let outcome = generate(&options, &schema, &[&pdf], date).unwrap();
    let tables = std::fs::read_to_string(outcome.written.tables).unwrap();
    assert!(tables.contains("No tables found"));
    assert!(tables.contains("'DOC-001', 'scan.pdf', 'PDF', 0, 0, 11, 3,"));
}

#[test]
fn generate_fails_without_documents() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let options = RunOptions {
        input_dir: input.path().to_path_buf(),
        tables_out: output.path().join("t.sql"),
        views_out: output.path().join("v.sql"),
        ..RunOptions::default()
    };
    let schema = builtin::banking().unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();

    let result = generate(&options, &schema, &[], date);
    assert!(matches!(result, Err(DocDdlError::NoDocuments(_))));
    assert!(!output.path().join("t.sql").exists());
}
