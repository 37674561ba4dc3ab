//! Reconstruct tables from pdftotext -layout output.
//!
//! pdftotext -layout preserves column alignment using spaces, so a table row
//! is a line whose text breaks into several segments separated by runs of
//! two or more spaces. Consecutive rows form a table region; the region's
//! columns are reconciled against anchors taken from its widest row.

use crate::model::Grid;

/// A piece of text on a layout line, with its starting character column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub text: String,
}

/// Split a layout line into segments on gaps of two or more whitespace characters.
pub fn split_columns(line: &str) -> Vec<Segment> {
    let chars: Vec<char> = line.chars().collect();
    let n = chars.len();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < n {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i;
        loop {
            while end < n && !chars[end].is_whitespace() {
                end += 1;
            }
            // A single space between words stays inside the segment.
            if end + 1 < n && chars[end] == ' ' && !chars[end + 1].is_whitespace() {
                end += 1;
                continue;
            }
            break;
        }
        segments.push(Segment {
            start,
            text: chars[start..end].iter().collect(),
        });
        i = end;
    }

    segments
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRegion {
    pub start_line: usize,
    pub end_line: usize,
}

fn is_row(segments: &[Segment]) -> bool {
    segments.len() >= 2
}

/// Indented single-segment line directly under a row: wrapped cell text.
fn is_continuation(segments: &[Segment]) -> bool {
    segments.len() == 1 && segments[0].start > 0
}

/// Find table regions within one page's lines.
///
/// A region starts at a multi-column line and extends over following
/// multi-column lines and indented continuation lines. Regions with fewer
/// than two multi-column rows are not tables.
pub fn find_table_regions(lines: &[String]) -> Vec<TableRegion> {
    let split: Vec<Vec<Segment>> = lines.iter().map(|l| split_columns(l)).collect();
    let mut regions = Vec::new();
    let mut i = 0;

    while i < split.len() {
        if !is_row(&split[i]) {
            i += 1;
            continue;
        }
        let start = i;
        let mut rows = 1;
        let mut end = i + 1;
        while end < split.len() {
            if is_row(&split[end]) {
                rows += 1;
            } else if !is_continuation(&split[end]) {
                break;
            }
            end += 1;
        }
        // Trailing continuation lines belong to the text after the table.
        while end > start && !is_row(&split[end - 1]) {
            end -= 1;
        }
        if rows >= 2 {
            regions.push(TableRegion {
                start_line: start,
                end_line: end,
            });
        }
        i = end.max(start + 1);
    }

    regions
}

/// Reconcile the lines of one region into a rectangular grid.
///
/// Column anchors come from the row with the most segments (the first such
/// row on ties). Every segment lands in the column whose anchor is nearest
/// its start; columns a row does not reach stay empty. Continuation lines
/// are appended to the matching cell of the row above.
pub fn reconcile_columns(lines: &[String]) -> Grid {
    let split: Vec<Vec<Segment>> = lines.iter().map(|l| split_columns(l)).collect();
    let anchors: Vec<usize> = split
        .iter()
        .fold(None::<&Vec<Segment>>, |widest, row| match widest {
            Some(w) if w.len() >= row.len() => Some(w),
            _ => Some(row),
        })
        .map(|row| row.iter().map(|s| s.start).collect())
        .unwrap_or_default();

    if anchors.is_empty() {
        return Vec::new();
    }

    let mut grid: Grid = Vec::new();
    for segments in &split {
        if segments.is_empty() {
            continue;
        }
        if !is_row(segments) {
            if let Some(prev) = grid.last_mut() {
                for seg in segments {
                    append_cell(&mut prev[nearest_anchor(&anchors, seg.start)], &seg.text);
                }
                continue;
            }
        }
        let mut row = vec![String::new(); anchors.len()];
        for seg in segments {
            append_cell(&mut row[nearest_anchor(&anchors, seg.start)], &seg.text);
        }
        grid.push(row);
    }

    grid
}

fn nearest_anchor(anchors: &[usize], start: usize) -> usize {
    anchors
        .iter()
        .enumerate()
        .min_by_key(|(_, a)| a.abs_diff(start))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn append_cell(cell: &mut String, text: &str) {
    if !cell.is_empty() {
        cell.push(' ');
    }
    cell.push_str(text);
}

/// Detect and reconcile every table on a page.
pub fn tables_from_lines(lines: &[String]) -> Vec<Grid> {
    find_table_regions(lines)
        .into_iter()
        .map(|r| reconcile_columns(&lines[r.start_line..r.end_line]))
        .filter(|g| !g.is_empty())
        .collect()
}
