pub mod ddl;
pub mod discovery;
pub mod error;
pub mod extraction;
pub mod model;
pub mod normalize;
pub mod quality;
pub mod rank;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use ddl::{RenderContext, WrittenDdl};
use discovery::DocumentRef;
use error::DocDdlError;
use extraction::TableExtractor;
use model::{DocumentSummary, ExtractedTable, QualityReport, SourceFormat, TableId};
use quality::ScoreWeights;
use schema::def::SchemaDef;

/// Options for extraction and scoring.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Tables with fewer rows than this are discarded after cleaning.
    pub min_rows: usize,
    pub weights: ScoreWeights,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            min_rows: 1,
            weights: ScoreWeights::default(),
        }
    }
}

/// Options for a full run: scan a directory and write the DDL files.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_dir: PathBuf,
    pub tables_out: PathBuf,
    pub views_out: PathBuf,
    /// Number of ranked tables listed in the tables file banner.
    pub top: usize,
    pub scan: ScanOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            input_dir: PathBuf::from("."),
            tables_out: PathBuf::from("final_tables.sql"),
            views_out: PathBuf::from("final_views.sql"),
            top: 5,
            scan: ScanOptions::default(),
        }
    }
}

/// Result of [`generate`].
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub report: QualityReport,
    pub written: WrittenDdl,
}

/// Main API entry point: scan `options.input_dir`, then write the schema's
/// table and view DDL with lineage rows for every document processed.
///
/// Fails only when no documents are found, or the files cannot be written.
pub fn generate(
    options: &RunOptions,
    schema: &SchemaDef,
    extractors: &[&dyn TableExtractor],
    generated: NaiveDate,
) -> Result<GenerateOutcome, DocDdlError> {
    let report = scan_directory(&options.input_dir, extractors, &options.scan)?;

    if report.ranked.is_empty() {
        warn!("no tables found; emitting schema DDL from configuration only");
    }

    let ctx = RenderContext {
        report: &report,
        generated,
        top: options.top,
    };
    let written = ddl::write_ddl(schema, &ctx, &options.tables_out, &options.views_out)?;

    Ok(GenerateOutcome { report, written })
}

/// Discover documents in `dir`, extract and score their tables.
pub fn scan_directory(
    dir: &Path,
    extractors: &[&dyn TableExtractor],
    options: &ScanOptions,
) -> Result<QualityReport, DocDdlError> {
    let docs = discovery::discover_documents(dir)?;
    if docs.is_empty() {
        return Err(DocDdlError::NoDocuments(dir.to_path_buf()));
    }
    info!(count = docs.len(), dir = %dir.display(), "found documents");
    Ok(scan_documents(&docs, extractors, options))
}

/// Extract and score tables from already-discovered documents.
///
/// Per-document failures never abort the scan: the document contributes
/// zero tables and the failure is logged and kept in its notes.
pub fn scan_documents(
    docs: &[DocumentRef],
    extractors: &[&dyn TableExtractor],
    options: &ScanOptions,
) -> QualityReport {
    // Probe each backend once per run.
    let backends: Vec<(&dyn TableExtractor, bool)> = extractors
        .iter()
        .map(|e| {
            let available = e.is_available();
            if !available {
                warn!(
                    backend = e.backend_name(),
                    "{} backend unavailable; {} documents will contribute zero tables",
                    e.backend_name(),
                    e.format()
                );
            }
            (*e, available)
        })
        .collect();

    let mut report = QualityReport::default();
    let mut tables = Vec::new();

    for doc in docs {
        let backend = backends.iter().find(|(e, _)| e.format() == doc.format).copied();
        let (summary, doc_tables) = process_document(doc, backend, options);
        match doc.format {
            SourceFormat::Pdf => report.pdf_tables += doc_tables.len(),
            SourceFormat::Docx => report.docx_tables += doc_tables.len(),
        }
        report.documents.push(summary);
        tables.extend(doc_tables);
    }

    report.ranked = rank::rank_tables(tables);
    info!(
        pdf = report.pdf_tables,
        docx = report.docx_tables,
        "tables extracted"
    );
    report
}

fn process_document(
    doc: &DocumentRef,
    backend: Option<(&dyn TableExtractor, bool)>,
    options: &ScanOptions,
) -> (DocumentSummary, Vec<ExtractedTable>) {
    let mut summary = DocumentSummary {
        name: doc.name.clone(),
        format: doc.format,
        file_size_bytes: std::fs::metadata(&doc.path).ok().map(|m| m.len()),
        page_count: None,
        table_count: 0,
        mean_score: Decimal::ZERO,
        notes: Vec::new(),
    };

    let extractor = match backend {
        None => {
            warn!(document = %doc.name, "no extractor registered for {} documents", doc.format);
            summary
                .notes
                .push(format!("no extractor registered for {}", doc.format));
            return (summary, Vec::new());
        }
        Some((extractor, false)) => {
            summary.notes.push(format!(
                "{} backend unavailable; no tables extracted",
                extractor.backend_name()
            ));
            return (summary, Vec::new());
        }
        Some((extractor, true)) => extractor,
    };

    let extraction = match extractor.extract(&doc.path) {
        Ok(extraction) => extraction,
        Err(e) => {
            warn!(document = %doc.name, error = %e, "extraction failed; skipping document");
            summary.notes.push(format!("extraction failed: {e}"));
            return (summary, Vec::new());
        }
    };
    summary.page_count = extraction.page_count;

    let found = extraction.grids.len();
    let min_rows = options.min_rows.max(1);
    let tables: Vec<ExtractedTable> = extraction
        .grids
        .into_iter()
        .map(normalize::clean_grid)
        .filter(|grid| grid.len() >= min_rows)
        .enumerate()
        .map(|(index, rows)| {
            let quality = quality::score_grid(&rows, &options.weights);
            ExtractedTable {
                id: TableId {
                    source: doc.name.clone(),
                    format: doc.format,
                    index,
                },
                rows,
                quality,
            }
        })
        .collect();

    for table in &tables {
        let (rows, cols) = table.shape();
        debug!(table = %table.id, rows, cols, score = %table.score(), "scored table");
    }

    summary.table_count = tables.len();
    summary.notes.push(format!(
        "{} table(s) extracted with {}",
        tables.len(),
        extractor.backend_name()
    ));
    if found > tables.len() {
        summary.notes.push(format!(
            "{} table(s) with fewer than {} row(s) discarded",
            found - tables.len(),
            min_rows
        ));
    }
    if !tables.is_empty() {
        let total: Decimal = tables.iter().map(ExtractedTable::score).sum();
        summary.mean_score = quality::round2(total / Decimal::from(tables.len()));
    }
    info!(
        document = %doc.name,
        tables = tables.len(),
        mean_score = %summary.mean_score,
        "processed document"
    );

    (summary, tables)
}
