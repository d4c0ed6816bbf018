//! # Score Sheet
//!
//! Extracts student score records from school grade spreadsheets whose layout
//! nobody controls: printed "report" sheets with title blocks, multi-row
//! headers, weight rows and side-by-side record blocks, as well as plain
//! single-header tables.
//!
//! ## Features
//!
//! - **Workbook loading**: `.xlsx` and `.xlsm` files read into in-memory grids
//! - **Layout detection**: report sheets and normalized tables, with any number of
//!   record blocks per row
//! - **Semantic columns**: usual-score and exam-score columns found by label, with
//!   optional weighting rows applied to the raw scores
//! - **Title metadata**: class and course recovered from free-form title rows
//! - **Validation gate**: records are only handed on when both score columns were
//!   recognized, otherwise an actionable diagnostic explains what was seen
//!
//! ## Example
//!
//! ```no_run
//! use score_sheet::{open_spreadsheet, Extractor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut workbook = open_spreadsheet("grades.xlsx")?;
//! let sheet = workbook.sheet_names().remove(0);
//! let grid = workbook.read_sheet(&sheet)?;
//! let extraction = Extractor::default().extract(&grid, &sheet)?;
//! extraction.validate()?;
//! for record in &extraction.records {
//!     println!("{} {:?} {:?}", record.name, record.usual_score, record.exam_score);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod helpers;

pub mod extract;
pub mod grid;
pub mod spreadsheet;

pub use error::ScoreSheetError;
pub use extract::render_entry_table;
pub use extract::validate;
pub use extract::ExtractConfig;
pub use extract::Extraction;
pub use extract::ExtractionMeta;
pub use extract::Extractor;
pub use extract::GateError;
pub use extract::Record;
pub use grid::CellValue;
pub use grid::Grid;
pub use spreadsheet::open_spreadsheet;
pub use spreadsheet::SheetFilter;
pub use spreadsheet::Spreadsheet;
