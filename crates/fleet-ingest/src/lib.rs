//! Spreadsheet ingestion for the fleet import pipeline.
//!
//! Accepts headered CSV (UTF-8, blank-line tolerant) and XLSX/XLS (first
//! sheet, first row = headers) and produces a [`RowSet`] of numbered rows.
//! Row numbers are assigned here, once, and every later stage keys on them.

pub mod csv_table;
pub mod error;
pub mod xlsx_table;

use std::path::Path;

use fleet_model::{HEADER_ROW_OFFSET, Row};
use tracing::info;

pub use crate::csv_table::read_csv_rows;
pub use crate::error::{IngestError, Result};
pub use crate::xlsx_table::read_xlsx_rows;

/// Ingest tuning knobs.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Added to the 0-based data index to produce `row_number`. Defaults to
    /// 2: line 1 is the header, so the first data row is line 2.
    pub header_row_offset: u32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            header_row_offset: HEADER_ROW_OFFSET,
        }
    }
}

/// A parsed file: raw headers in source order plus numbered data rows.
#[derive(Debug, Clone)]
pub struct RowSet {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Reads a spreadsheet, dispatching on the file extension.
pub fn read_rows(path: &Path, options: &IngestOptions) -> Result<RowSet> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let set = match extension.as_str() {
        "csv" => read_csv_rows(path, options)?,
        "xlsx" | "xlsm" | "xls" => read_xlsx_rows(path, options)?,
        _ => return Err(IngestError::UnsupportedFormat { extension }),
    };
    info!(
        path = %path.display(),
        columns = set.headers.len(),
        rows = set.rows.len(),
        "ingested spreadsheet"
    );
    Ok(set)
}
