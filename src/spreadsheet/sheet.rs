use crate::grid::Grid;
use crate::spreadsheet::cell::Cell;

/// A worksheet read from a workbook, kept as the raw cells in document order.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
}

impl Sheet {
    pub(crate) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Lays the cells out on a grid anchored at A1, so grid indexes equal sheet positions.
    /// Only filled cells are stored; rows without cells stay unallocated.
    pub(crate) fn to_grid(&self) -> Grid {
        let mut grid = Grid::default();
        for cell in &self.cells {
            grid.set(cell.row, cell.col, cell.to_value());
        }
        grid
    }
}
