use std::path::{Path, PathBuf};

use crate::error::DocDdlError;
use crate::model::SourceFormat;

/// A candidate input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub path: PathBuf,
    pub name: String,
    pub format: SourceFormat,
}

/// List PDF and DOCX files directly inside `dir`, sorted by file name.
///
/// Office lock files (`~$spec.docx`) and other `~`-prefixed names are skipped.
pub fn discover_documents(dir: &Path) -> Result<Vec<DocumentRef>, DocDdlError> {
    let mut docs = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        // Follows symlinks; dangling links are skipped.
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('~') {
            continue;
        }
        if let Some(format) = SourceFormat::from_path(&path) {
            docs.push(DocumentRef {
                name: name.to_string(),
                path: path.clone(),
                format,
            });
        }
    }

    docs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(docs)
}
