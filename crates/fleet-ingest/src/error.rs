//! Ingest error taxonomy.
//!
//! An ingest failure is fatal to the upload session: it is reported once and
//! no rows are processed. Per-row problems are never errors here; they flow
//! through fix/validation records instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file is empty or contains no data rows: {path}")]
    EmptyFile { path: PathBuf },
    #[error("unsupported file type '{extension}' (expected csv, xlsx, or xls)")]
    UnsupportedFormat { extension: String },
    #[error("workbook has no sheets: {path}")]
    NoSheets { path: PathBuf },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
