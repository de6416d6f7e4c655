//! Workbook parsing: raw bytes in, sheets of [`Cell`] rows out.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use thiserror::Error;

use salesync_sales::Cell;

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("unrecognised workbook: {0}")]
    Open(#[source] calamine::Error),

    #[error("failed to read sheet `{name}`: {source}")]
    Sheet {
        name: String,
        #[source]
        source: calamine::Error,
    },
}

impl WorkbookError {
    /// Message reported on the job for any parse failure.
    pub const FAILURE_MESSAGE: &'static str =
        "error opening spreadsheet (the file may have the wrong format)";
}

/// A row and its 1-based position in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub number: u32,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<SheetRow>,
}

/// Every sheet of a workbook in workbook order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Total number of data rows across all sheets.
    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

/// Parse an in-memory workbook. The format is detected from the bytes.
///
/// Blocking and CPU-bound; run it on the blocking pool.
pub fn parse_workbook(bytes: Vec<u8>) -> Result<Workbook, WorkbookError> {
    let mut sheets = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(WorkbookError::Open)?;

    let mut workbook = Workbook::default();
    for name in sheets.sheet_names() {
        let range = sheets
            .worksheet_range(&name)
            .map_err(|source| WorkbookError::Sheet {
                name: name.clone(),
                source,
            })?;

        // The range starts at its first non-empty cell; re-anchor at A1.
        // Empty rows inside the range are kept: they are data rows too.
        let (first_row, first_col) = range.start().unwrap_or((0, 0));
        let rows = range
            .rows()
            .enumerate()
            .map(|(idx, data)| {
                let mut cells = vec![Cell::Empty; first_col as usize];
                cells.extend(data.iter().map(to_cell));
                SheetRow {
                    number: first_row + idx as u32 + 1,
                    cells,
                }
            })
            .collect();

        workbook.sheets.push(Sheet { name, rows });
    }

    Ok(workbook)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(v) => Cell::Int(*v),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}
