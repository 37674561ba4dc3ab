use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Ordered rows of ordered cell strings. Rows may differ in length.
pub type Grid = Vec<Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Docx,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Pdf => write!(f, "PDF"),
            SourceFormat::Docx => write!(f, "DOCX"),
        }
    }
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 2] = [SourceFormat::Pdf, SourceFormat::Docx];

    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<SourceFormat> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(SourceFormat::Pdf),
            "docx" => Some(SourceFormat::Docx),
            _ => None,
        }
    }
}

/// Identity of one extracted table within a run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableId {
    /// File name of the source document.
    pub source: String,
    pub format: SourceFormat,
    /// Zero-based position of the table within its document.
    pub index: usize,
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} table {} from {}", self.format, self.index + 1, self.source)
    }
}

/// Completeness, row density and the weighted score, each in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub completeness: Decimal,
    pub row_density: Decimal,
    pub score: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedTable {
    pub id: TableId,
    /// Cleaned cells; ragged rows are kept as extracted.
    pub rows: Grid,
    pub quality: QualityBreakdown,
}

impl ExtractedTable {
    pub fn score(&self) -> Decimal {
        self.quality.score
    }

    /// Number of rows and the widest row length.
    pub fn shape(&self) -> (usize, usize) {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        (self.rows.len(), width)
    }
}

/// Per-document outcome of extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    pub format: SourceFormat,
    pub file_size_bytes: Option<u64>,
    pub page_count: Option<u32>,
    pub table_count: usize,
    /// Mean score of the document's tables, zero when none were found.
    pub mean_score: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    pub pdf_tables: usize,
    pub docx_tables: usize,
    pub documents: Vec<DocumentSummary>,
    /// All tables, best first.
    pub ranked: Vec<ExtractedTable>,
}

impl QualityReport {
    pub fn tables_for(&self, format: SourceFormat) -> usize {
        match format {
            SourceFormat::Pdf => self.pdf_tables,
            SourceFormat::Docx => self.docx_tables,
        }
    }

    pub fn total_tables(&self) -> usize {
        self.pdf_tables + self.docx_tables
    }

    pub fn top(&self, n: usize) -> &[ExtractedTable] {
        &self.ranked[..n.min(self.ranked.len())]
    }
}
