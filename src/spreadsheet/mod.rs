//! # Spreadsheet Loading
//!
//! Reads worksheets from Office Open XML workbooks (`.xlsx`, `.xlsm`) into
//! [`Grid`]s. Only cell values are kept; styles matter solely to tell dates
//! apart from plain numbers.
use crate::error::ScoreSheetError;
use crate::grid::Grid;
use std::ffi::OsStr;
use std::path::Path;
use thiserror::Error;

pub(crate) mod cell;
pub(crate) mod criteria;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

pub use criteria::SheetFilter;

/// Errors raised while opening a workbook or reading one of its sheets.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Unsupported file format '{0}', expected an .xlsx or .xlsm workbook")]
    UnsupportedFormat(String),

    #[error("'{0}' is not a zip package; encrypted and legacy workbooks cannot be read")]
    NotAPackage(String),

    #[error("Workbook '{0}' contains no sheets")]
    SpreadsheetEmpty(String),

    #[error("Missing package part '{0}'")]
    MissingPart(String),

    #[error("Sheet '{1}' not found in '{0}'")]
    SheetNotFound(String, String),

    #[error("Invalid shared string index '{3}' at {0}!{1}!{2}")]
    CellValueError(String, String, String, String),
}

/// A workbook that can list its sheets and read any of them as a grid.
pub trait Spreadsheet {
    /// File name the workbook was opened from.
    fn name(&self) -> String;

    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Reads one sheet by name.
    fn read_sheet(&mut self, sheet_name: &str) -> Result<Grid, ScoreSheetError>;
}

/// Opens a workbook, choosing the reader by file extension.
pub fn open_spreadsheet(file_name: &str) -> Result<Box<dyn Spreadsheet>, ScoreSheetError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "xlsx" | "xlsm" => Ok(Box::new(xlsx::XlsxSpreadsheet::open(file_name)?)),
        _ => Err(SpreadsheetError::UnsupportedFormat(file_name.to_owned()))?,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_other_formats() {
        for name in ["grades.xls", "grades.ods", "grades.csv", "grades"] {
            match open_spreadsheet(name) {
                Err(ScoreSheetError::SpreadsheetError(SpreadsheetError::UnsupportedFormat(file))) => {
                    assert_eq!(file, name)
                }
                Err(error) => panic!("unexpected error {error}"),
                Ok(_) => panic!("{name} should be rejected"),
            }
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            open_spreadsheet("/nonexistent/grades.XLSX"),
            Err(ScoreSheetError::IoError(_))
        ));
    }
}
