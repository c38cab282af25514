//! CSV ingestion.
//!
//! First row is the header. Blank lines are skipped but never renumber the
//! rows that follow them: `row_number` is derived from the source record
//! index, so row 7 in a fix preview is line 7 in the operator's editor.

use std::path::Path;

use csv::ReaderBuilder;
use fleet_model::{Row, Value};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::{IngestOptions, RowSet};

fn normalize_header(raw: &str) -> String {
    // Strip a UTF-8 BOM and collapse runs of whitespace.
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> &str {
    raw.trim_matches('\u{feff}')
}

pub fn read_csv_rows(path: &Path, options: &IngestOptions) -> Result<RowSet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    // Keep source column positions; untitled columns are dropped but must
    // not shift their neighbours.
    let columns: Vec<(usize, String)> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(col, raw)| (col, normalize_header(raw)))
        .filter(|(_, h)| !h.is_empty())
        .collect();
    if columns.is_empty() {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    let headers: Vec<String> = columns.iter().map(|(_, h)| h.clone()).collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let number = idx as u32 + options.header_row_offset;
        let mut row = Row::new(number);
        for (col, header) in &columns {
            let raw = record.get(*col).map(normalize_cell).unwrap_or("");
            row.set(header, Value::from_cell(raw));
        }
        if row.is_blank() {
            debug!(row = number, "skipping blank csv row");
            continue;
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    Ok(RowSet { headers, rows })
}
