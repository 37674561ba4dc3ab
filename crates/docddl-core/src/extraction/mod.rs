pub mod docx;
pub mod layout;
pub mod pdftotext;

use std::path::Path;

use crate::error::DocDdlError;
use crate::model::{Grid, SourceFormat};

/// Raw tables pulled out of one document.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub grids: Vec<Grid>,
    /// Pages (PDF) when the backend knows them.
    pub page_count: Option<u32>,
}

/// Trait for per-format table extraction backends.
pub trait TableExtractor: Send + Sync {
    /// The document format this backend reads.
    fn format(&self) -> SourceFormat;

    /// Extract every table in the document at `path`.
    fn extract(&self, path: &Path) -> Result<Extraction, DocDdlError>;

    /// Whether the backend's external tool or runtime is usable on this system.
    fn is_available(&self) -> bool {
        true
    }

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
