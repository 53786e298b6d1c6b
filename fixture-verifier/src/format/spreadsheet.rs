//! Spreadsheet decoder (XLSX, XLS) via `calamine`.

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use crate::error::VerifyError;
use crate::format::FormatKind;

/// Every sheet of a workbook, in workbook order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Cell text at an absolute zero-based position.
    #[must_use]
    pub fn cell(&self, sheet: usize, row: usize, col: usize) -> Option<&str> {
        self.sheets.get(sheet)?.cell(row, col)
    }
}

/// One worksheet as a grid of cell strings.
///
/// Rows and columns are absolute: `rows[0][0]` is cell A1 even when the used
/// range starts further down. Leading empty cells are filled with `""`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    fn from_range(name: String, range: &Range<Data>) -> Self {
        let Some((start_row, start_col)) = range.start() else {
            return Self {
                name,
                rows: Vec::new(),
            };
        };
        let start_row = start_row as usize;
        let start_col = start_col as usize;

        let mut rows = vec![Vec::new(); start_row];
        for cells in range.rows() {
            let mut row = vec![String::new(); start_col];
            row.extend(cells.iter().map(ToString::to_string));
            rows.push(row);
        }
        Self { name, rows }
    }
}

/// Open a workbook from memory and read every worksheet.
///
/// # Errors
///
/// Returns a decode error if the workbook or any of its sheets cannot be read.
pub fn decode_spreadsheet(bytes: &[u8], resource: &str) -> Result<Workbook, VerifyError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| VerifyError::decode(resource, FormatKind::Spreadsheet, e))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name).map_err(|e| {
            VerifyError::decode(resource, FormatKind::Spreadsheet, format!("sheet '{name}': {e}"))
        })?;
        sheets.push(Sheet::from_range(name, &range));
    }
    Ok(Workbook { sheets })
}
