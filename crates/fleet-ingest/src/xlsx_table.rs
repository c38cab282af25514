//! XLSX/XLS ingestion via calamine.
//!
//! First sheet only, first row is the header. Typed cells keep their type:
//! numbers stay numeric, booleans stay boolean, and Excel serial dates are
//! rendered as ISO text so the date analyzer sees them as already canonical.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use fleet_model::{Row, Value};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::{IngestOptions, RowSet};

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().trim_matches('\u{feff}').to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Missing,
        Data::String(s) => Value::from_cell(s),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Value::Text(naive.date().format("%Y-%m-%d").to_string()),
            None => Value::Missing,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::from_cell(s),
        Data::Error(e) => Value::Text(e.to_string()),
    }
}

pub fn read_xlsx_rows(path: &Path, options: &IngestOptions) -> Result<RowSet> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| IngestError::Spreadsheet(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.first() else {
        return Err(IngestError::NoSheets {
            path: path.to_path_buf(),
        });
    };
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| IngestError::Spreadsheet(e.to_string()))?;

    let mut sheet_rows = range.rows();
    // Keep source column positions; untitled columns are dropped but must
    // not shift their neighbours.
    let columns: Vec<(usize, String)> = sheet_rows
        .next()
        .map(|cells| {
            cells
                .iter()
                .enumerate()
                .map(|(col, cell)| (col, header_text(cell)))
                .filter(|(_, h)| !h.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if columns.is_empty() {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    let headers: Vec<String> = columns.iter().map(|(_, h)| h.clone()).collect();

    let mut rows = Vec::new();
    for (idx, cells) in sheet_rows.enumerate() {
        let number = idx as u32 + options.header_row_offset;
        let mut row = Row::new(number);
        for (col, header) in &columns {
            let value = cells.get(*col).map(cell_value).unwrap_or(Value::Missing);
            row.set(header, value);
        }
        if row.is_blank() {
            debug!(row = number, sheet = %sheet_name, "skipping blank sheet row");
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
