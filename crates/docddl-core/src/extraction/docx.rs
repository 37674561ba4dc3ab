//! DOCX table extraction.
//!
//! DOCX files are ZIP archives; the body lives in `word/document.xml`.
//! Each top-level `w:tbl` becomes one grid. Merged cells are expanded the
//! way Word lays them out on its grid: a `w:gridSpan` cell repeats across
//! the columns it covers and a `w:vMerge` continuation repeats the text of
//! the cell above it.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::DocDdlError;
use crate::extraction::{Extraction, TableExtractor};
use crate::model::{Grid, SourceFormat};
use crate::normalize::clean_cell;

/// Word's limit on columns in one table.
const MAX_GRID_COLUMNS: usize = 63;

pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        DocxExtractor
    }

    /// Extract tables from DOCX bytes already in memory.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Extraction, DocDdlError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let xml = read_document_xml(&mut archive)?;
        Ok(Extraction {
            grids: parse_document_xml(&xml)?,
            page_count: None,
        })
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExtractor for DocxExtractor {
    fn format(&self) -> SourceFormat {
        SourceFormat::Docx
    }

    fn extract(&self, path: &Path) -> Result<Extraction, DocDdlError> {
        let bytes = std::fs::read(path)?;
        self.extract_bytes(&bytes)
    }

    fn backend_name(&self) -> &str {
        "docx-xml"
    }
}

fn read_document_xml<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> Result<String, DocDdlError> {
    let mut document = archive
        .by_name("word/document.xml")
        .map_err(|e| DocDdlError::Docx(format!("cannot find word/document.xml: {e}")))?;
    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .map_err(|e| DocDdlError::Docx(e.to_string()))?;
    Ok(xml)
}

#[derive(Debug, Default)]
struct CellBuf {
    paragraphs: Vec<String>,
    paragraph: String,
    span: usize,
    continues_above: bool,
}

impl CellBuf {
    fn finish_paragraph(&mut self) {
        let text = std::mem::take(&mut self.paragraph);
        if !text.trim().is_empty() {
            self.paragraphs.push(text);
        }
    }

    fn text(mut self) -> String {
        self.finish_paragraph();
        clean_cell(&self.paragraphs.join(" "))
    }
}

#[derive(Debug, Default)]
struct TableState {
    grid: Grid,
    row: Option<Vec<String>>,
    cell: Option<CellBuf>,
}

impl TableState {
    fn close_cell(&mut self) {
        let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) else {
            return;
        };
        let column = row.len();
        let span = cell.span.max(1);
        let text = if cell.continues_above {
            self.grid
                .last()
                .and_then(|above| above.get(column))
                .cloned()
                .unwrap_or_default()
        } else {
            cell.text()
        };
        for _ in 0..span {
            row.push(text.clone());
        }
    }
}

/// Parse `word/document.xml` into one grid per top-level table.
fn parse_document_xml(xml: &str) -> Result<Vec<Grid>, DocDdlError> {
    let mut reader = Reader::from_str(xml);
    let mut tables = Vec::new();
    let mut depth = 0usize;
    let mut state = TableState::default();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => {
                    depth += 1;
                    if depth == 1 {
                        state = TableState::default();
                    }
                }
                b"w:tr" if depth == 1 => state.row = Some(Vec::new()),
                b"w:tc" if depth == 1 => state.cell = Some(CellBuf::default()),
                b"w:p" => {
                    if let Some(cell) = state.cell.as_mut() {
                        cell.finish_paragraph();
                    }
                }
                b"w:t" => in_text = true,
                b"w:gridSpan" | b"w:vMerge" if depth == 1 => apply_cell_property(&mut state, &e)?,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:gridSpan" | b"w:vMerge" if depth == 1 => apply_cell_property(&mut state, &e)?,
                b"w:tab" | b"w:br" | b"w:cr" => {
                    if let Some(cell) = state.cell.as_mut() {
                        cell.paragraph.push(' ');
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" => {
                    if depth == 1 {
                        tables.push(std::mem::take(&mut state.grid));
                    }
                    depth = depth.saturating_sub(1);
                }
                b"w:tr" if depth == 1 => {
                    if let Some(row) = state.row.take() {
                        state.grid.push(row);
                    }
                }
                b"w:tc" if depth == 1 => state.close_cell(),
                b"w:p" => {
                    if let Some(cell) = state.cell.as_mut() {
                        cell.finish_paragraph();
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    if let Some(cell) = state.cell.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| DocDdlError::Docx(e.to_string()))?;
                        cell.paragraph.push_str(&text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocDdlError::Docx(format!(
                    "XML error at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(tables)
}

fn apply_cell_property(state: &mut TableState, e: &BytesStart<'_>) -> Result<(), DocDdlError> {
    let Some(cell) = state.cell.as_mut() else {
        return Ok(());
    };
    let val = e
        .try_get_attribute("w:val")
        .map_err(|err| DocDdlError::Docx(err.to_string()))?
        .map(|a| String::from_utf8_lossy(&a.value).into_owned());

    match e.name().as_ref() {
        b"w:gridSpan" => {
            let span = val.and_then(|v| v.trim().parse().ok()).unwrap_or(1);
            if span > MAX_GRID_COLUMNS {
                return Err(DocDdlError::Docx(format!(
                    "cell spans {span} columns; Word tables have at most {MAX_GRID_COLUMNS}"
                )));
            }
            cell.span = span;
        }
        b"w:vMerge" => {
            // No value, or "continue", marks a cell merged into the one above.
            cell.continues_above = val.as_deref().map_or(true, |v| v == "continue");
        }
        _ => {}
    }
    Ok(())
}
