use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocDdlError {
    #[error("no PDF or DOCX documents found in {0}")]
    NoDocuments(PathBuf),

    #[error("table extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to read DOCX: {0}")]
    Docx(String),

    #[error("failed to load schema from {path}: {reason}")]
    SchemaLoad { path: PathBuf, reason: String },

    #[error("invalid schema: {0}")]
    SchemaInvalid(String),

    #[error("invalid score weights: {0}")]
    InvalidWeights(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
