//! Heuristic extraction of student score records from a sheet grid.
//!
//! The engine locates the name header first, then decides between two layouts:
//!
//! - **report**: title rows, a name row, a score-label row below it and an
//!   optional weight row; any number of name columns side by side.
//! - **table**: one conventional header row, possibly describing two record
//!   blocks side by side.
//!
//! Extraction itself never refuses a sheet with a header. Whether the records
//! may be used is decided by [`Extraction::validate`].

mod config;
mod gate;
mod groups;
mod header;
mod record;
mod report;
mod rows;
mod split;
mod table;
mod title;

pub use config::ExtractConfig;
pub use config::Keywords;
pub use config::Limits;
pub use gate::render_entry_table;
pub use gate::validate;
pub use gate::GateError;
pub use groups::ColumnGroup;
pub use groups::Weights;
pub use record::ExtractionMeta;
pub use record::FilterStats;
pub use record::Mode;
pub use record::Record;
pub use record::RecordBook;
pub use record::Rejection;
pub use record::RowSample;
pub use record::TitleMeta;
pub use table::TableBlock;

use crate::error::ScoreSheetError;
use crate::grid::Grid;
use header::locate_name_header;
use header::locate_score_row;
use report::extract_report;
use table::extract_table;
use title::extract_title;
use title::is_assessment_sheet;

/// Records of one sheet together with what was detected while reading them.
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub meta: ExtractionMeta,
}

impl Extraction {
    pub fn validate(&self) -> Result<(), GateError> {
        validate(&self.records, &self.meta)
    }
}

/// Runs the engine with one configuration over any number of sheets.
#[derive(Clone, Debug, Default)]
pub struct Extractor {
    config: ExtractConfig,
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> Self {
        Extractor { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extracts the records of one sheet.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreSheetError::NameHeaderNotFound`] when no name header appears in the
    /// scan window. Missing score columns are not an error here; they show up in the metadata.
    pub fn extract(&self, grid: &Grid, sheet_name: &str) -> Result<Extraction, ScoreSheetError> {
        let config = &self.config;
        let header = locate_name_header(grid, config)?;
        // Title rows sit above the name row in both layouts
        let title = self.with_defaults(extract_title(grid, sheet_name, header.row, config));
        let (records, meta) = match locate_score_row(grid, header.row, config) {
            Some(score_row) => extract_report(grid, sheet_name, &header, score_row, &title, config),
            None => {
                let assessment = is_assessment_sheet(sheet_name, config);
                extract_table(grid, sheet_name, header.row, &title, assessment, config)
            }
        };
        tracing::info!(
            "Sheet '{}': {} record(s) from {:?} layout, usual column {}, exam column {}, {} row(s) filtered",
            sheet_name,
            records.len(),
            meta.mode,
            meta.has_usual_column,
            meta.has_exam_column,
            meta.filter.rejected()
        );
        Ok(Extraction { records, meta })
    }

    fn with_defaults(&self, title: TitleMeta) -> TitleMeta {
        TitleMeta {
            class_name: title.class_name.or_else(|| self.config.default_class.clone()),
            course: title.course.or_else(|| self.config.default_course.clone()),
        }
    }
}
