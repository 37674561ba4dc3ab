use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::DocDdlError;
use crate::extraction::layout::tables_from_lines;
use crate::extraction::{Extraction, TableExtractor};
use crate::model::SourceFormat;

/// PDF table extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` to preserve whitespace alignment of tables.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn tool_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExtractor for PdftotextExtractor {
    fn format(&self) -> SourceFormat {
        SourceFormat::Pdf
    }

    fn extract(&self, path: &Path) -> Result<Extraction, DocDdlError> {
        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(path)
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DocDdlError::PdftotextNotFound
                } else {
                    DocDdlError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DocDdlError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let extraction = extract_from_layout_text(&text);
        debug!(
            path = %path.display(),
            pages = extraction.page_count.unwrap_or(0),
            tables = extraction.grids.len(),
            "pdftotext layout parsed"
        );
        Ok(extraction)
    }

    fn is_available(&self) -> bool {
        Self::tool_available()
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Split layout text into pages (pdftotext uses form feed \x0c as page
/// separator) and collect the tables of every page in order.
pub fn extract_from_layout_text(text: &str) -> Extraction {
    let mut pages: Vec<&str> = text.split('\x0c').collect();
    // Output ends with a form feed after the last page.
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }

    let mut grids = Vec::new();
    for page_text in &pages {
        let lines: Vec<String> = page_text.lines().map(|l| l.to_string()).collect();
        grids.extend(tables_from_lines(&lines));
    }

    Extraction {
        grids,
        page_count: u32::try_from(pages.len()).ok(),
    }
}
