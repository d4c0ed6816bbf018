//! # Grid
//!
//! The rectangular, 0-indexed table of cells the extraction engine works on.
//! A grid is either loaded from a workbook sheet or built directly by callers
//! that already hold tabular data in memory.

mod value;

pub use value::compact;
pub use value::to_score;
pub use value::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// Rows of cells, each only as long as its last filled cell. Reads outside the grid return empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Grid {
    /// Creates a grid from ragged rows; the widest row sets the width.
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Grid { rows, width }
    }

    /// Builds a grid of text cells; empty strings become empty cells.
    pub fn from_texts<R, S>(rows: &[R]) -> Self
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        Grid::new(
            rows.iter()
                .map(|row| row.as_ref().iter().map(|text| CellValue::from(text.as_ref())).collect())
                .collect(),
        )
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY)
    }

/// Trimmed text of a cell.
    pub fn text(&self, row: usize, col: usize) -> String {
        self.get(row, col).text()
    }

    /// Whitespace-free text of a cell, for keyword matching.
    pub fn compact(&self, row: usize, col: usize) -> String {
        self.get(row, col).compact()
    }

    pub fn number(&self, row: usize, col: usize) -> Option<f64> {
        self.get(row, col).number()
    }

    /// Returns true when every cell of the row is blank.
    pub fn is_blank_row(&self, row: usize) -> bool {
        self.cells(row).iter().all(CellValue::is_blank)
    }

    /// Returns true when any cell of the row contains one of the fragments.
    pub fn row_contains_any(&self, row: usize, fragments: &[String]) -> bool {
        self.cells(row).iter().any(|cell| contains_any(&cell.compact(), fragments))
    }

    /// Places a value, growing the grid as needed. Rows in between stay unallocated.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if col >= cells.len() {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
        self.width = self.width.max(col + 1);
    }

    fn cells(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Case-insensitive containment of any fragment; fragments are compared in compact form.
pub(crate) fn contains_any(text: &str, fragments: &[String]) -> bool {
    let text = text.to_lowercase();
    fragments
        .iter()
        .map(|fragment| compact(fragment).to_lowercase())
        .any(|fragment| !fragment.is_empty() && text.contains(&fragment))
}
