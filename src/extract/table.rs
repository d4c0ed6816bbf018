//! Normalized tables: one conventional header row, possibly two record blocks side by side.

use crate::extract::config::ExtractConfig;
use crate::extract::record::ExtractionMeta;
use crate::extract::record::Mode;
use crate::extract::record::Record;
use crate::extract::record::RecordBook;
use crate::extract::record::TitleMeta;
use crate::extract::rows::looks_like_name;
use crate::extract::rows::Candidate;
use crate::extract::split::detect_split;
use crate::grid::compact;
use crate::grid::contains_any;
use crate::grid::CellValue;
use crate::grid::Grid;
use serde::Serialize;
use std::collections::HashMap;

static EMPTY: CellValue = CellValue::Empty;

/// Label given to header cells with no text.
const UNNAMED: &str = "Unnamed";

/// A header label, whitespace-free and made unique with a `.N` suffix.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Label {
    pub(crate) text: String,
    /// Lowercase label without the uniqueness suffix.
    base: String,
    /// Whether a `.N` suffix was added.
    pub(crate) suffixed: bool,
}

impl Label {
    /// Exact match of the unsuffixed label against any alias.
    pub(crate) fn is(&self, aliases: &[String]) -> bool {
        aliases.iter().any(|alias| {
            let alias = compact(alias).to_lowercase();
            !alias.is_empty() && alias == self.base
        })
    }

    pub(crate) fn contains(&self, aliases: &[String]) -> bool {
        contains_any(&self.text, aliases)
    }

    pub(crate) fn is_placeholder(&self, config: &ExtractConfig) -> bool {
        self.is(&config.keywords.placeholders)
    }
}

/// Normalizes header labels: whitespace removed, blanks named `Unnamed`, repeats suffixed `.1`, `.2`, ...
pub(crate) fn normalize_labels(raw: &[String]) -> Vec<Label> {
    let mut seen = HashMap::<String, usize>::new();
    raw.iter()
        .map(|label| {
            let mut name = compact(label);
            if name.is_empty() {
                name = UNNAMED.to_owned();
            }
            let base = name.to_lowercase();
            match seen.get_mut(&name) {
                Some(count) => {
                    *count += 1;
                    Label { text: format!("{}.{}", name, count), base, suffixed: true }
                }
                None => {
                    seen.insert(name.clone(), 0);
                    Label { text: name, base, suffixed: false }
                }
            }
        })
        .collect()
}

/// Index of the column matching an alias: exact matches in alias order first, then the
/// first label containing any alias. A label is never matched by an alias it is part of.
pub(crate) fn pick_column(labels: &[Label], aliases: &[String]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| labels.iter().position(|label| label.is(std::slice::from_ref(alias))))
        .or_else(|| labels.iter().position(|label| label.contains(aliases)))
}

/// Resolved columns of one record block; indexes are sheet columns.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TableBlock {
    /// First column of the block.
    pub start: usize,
    /// One past the last column of the block.
    pub end: usize,
    pub name_col: Option<usize>,
    pub student_col: Option<usize>,
    pub sequence_col: Option<usize>,
    pub usual_col: Option<usize>,
    pub exam_col: Option<usize>,
    pub class_col: Option<usize>,
    pub course_col: Option<usize>,
}

impl TableBlock {
    fn resolve(labels: &[Label], start: usize, end: usize, ignore_course: bool, config: &ExtractConfig) -> Self {
        let keywords = &config.keywords;
        let slice = &labels[start..end];
        let absolute = |index: Option<usize>| index.map(|index| start + index);
        let name_col = absolute(
            slice.iter().position(|label| label.contains(&keywords.name) && !label.is(&keywords.class)),
        );
        let student_col = absolute(slice.iter().position(|label| label.contains(&keywords.student)))
            .filter(|col| Some(*col) != name_col);
        let course_aliases: Vec<String> = keywords.course.iter().chain([&keywords.subject]).cloned().collect();
        let block = TableBlock {
            start,
            end,
            name_col,
            student_col,
            sequence_col: absolute(pick_column(slice, &keywords.sequence)),
            usual_col: absolute(pick_column(slice, &keywords.usual)),
            exam_col: absolute(pick_column(slice, &keywords.exam)),
            class_col: absolute(pick_column(slice, &keywords.class)),
            course_col: if ignore_course { None } else { absolute(pick_column(slice, &course_aliases)) },
        };
        tracing::debug!("Table block {:?}", block);
        block
    }

    fn is_score_col(&self, col: usize) -> bool {
        Some(col) == self.usual_col || Some(col) == self.exam_col
    }

    /// Columns that can hold neither a score nor a label-resolved field.
    fn is_free_col(&self, col: usize) -> bool {
        ![self.usual_col, self.exam_col, self.sequence_col, self.class_col, self.course_col, self.student_col]
            .contains(&Some(col))
    }

    /// The student name of a row: the name column, else a name-like student column,
    /// else the first name-like unassigned column.
    fn name(&self, grid: &Grid, row: usize, config: &ExtractConfig) -> Option<String> {
        if let Some(col) = self.name_col {
            return Some(grid.text(row, col)).filter(|name| !name.is_empty());
        }
        let name_like = |col: usize| Some(grid.text(row, col)).filter(|text| looks_like_name(text, config));
        self.student_col
            .and_then(name_like)
            .or_else(|| (self.start..self.end).filter(|col| self.is_free_col(*col)).find_map(name_like))
    }

    /// Sequence number of a row: the sequence column, else the first non-score column; unnumbered rows sort last.
    fn sequence(&self, grid: &Grid, row: usize) -> u64 {
        let col = self.sequence_col.or_else(|| (self.start..self.end).find(|col| !self.is_score_col(*col)));
        col.and_then(|col| grid.number(row, col))
            .filter(|number| *number >= 0.0)
            .map(|number| number as u64)
            .unwrap_or(u64::MAX)
    }

    fn names_any_column(&self) -> bool {
        [self.name_col, self.student_col, self.usual_col, self.exam_col].iter().any(Option::is_some)
    }

    fn text(grid: &Grid, row: usize, col: Option<usize>) -> Option<String> {
        col.map(|col| grid.text(row, col)).filter(|text| !text.is_empty())
    }
}

/// Reads rows below the header, once per block, and sorts the records by sequence number.
pub(crate) fn extract_table(
    grid: &Grid,
    sheet_name: &str,
    header_row: usize,
    title: &TitleMeta,
    ignore_course: bool,
    config: &ExtractConfig,
) -> (Vec<Record>, ExtractionMeta) {
    let raw: Vec<String> = (0..grid.width()).map(|col| grid.text(header_row, col)).collect();
    let labels = normalize_labels(&raw);
    let split = detect_split(&labels, config);
    let bounds = match &split {
        Some(split) => vec![(0, split.column), (split.column, labels.len())],
        None => vec![(0, labels.len())],
    };
    let blocks: Vec<TableBlock> = bounds
        .into_iter()
        .map(|(start, end)| TableBlock::resolve(&labels, start, end, ignore_course, config))
        .filter(|block| {
            let keep = block.names_any_column();
            if !keep {
                tracing::debug!("Columns {}..{} name neither a student nor a score, skipped", block.start, block.end);
            }
            keep
        })
        .collect();

    let mut meta = ExtractionMeta::new(sheet_name, Mode::Table, header_row);
    meta.name_columns = (0..labels.len()).filter(|col| labels[*col].contains(&config.keywords.name)).collect();
    meta.raw_columns = raw;
    meta.has_usual_column = !blocks.is_empty() && blocks.iter().all(|block| block.usual_col.is_some());
    meta.has_exam_column = !blocks.is_empty() && blocks.iter().all(|block| block.exam_col.is_some());
    meta.split_column = split.as_ref().map(|split| split.column);
    meta.split_strategy = split.map(|split| split.strategy.to_owned());
    meta.class_name = title.class_name.clone();
    meta.course = title.course.clone();

    let mut book = RecordBook::new();
    let mut sequences = HashMap::<String, u64>::new();
    for row in header_row + 1..grid.height() {
        for block in &blocks {
            let Some(name) = block.name(grid, row, config) else {
                continue;
            };
            meta.filter.candidates += 1;
            let candidate = Candidate {
                row,
                name,
                usual: block.usual_col.map(|col| grid.get(row, col)).unwrap_or(&EMPTY),
                exam: block.exam_col.map(|col| grid.get(row, col)).unwrap_or(&EMPTY),
            };
            if let Err(rejection) = candidate.check_table(config) {
                meta.reject(rejection, || candidate.sample(rejection));
                continue;
            }
            let class_name = TableBlock::text(grid, row, block.class_col).or_else(|| title.class_name.clone());
            let course = TableBlock::text(grid, row, block.course_col).or_else(|| title.course.clone());
            let record = candidate.into_record(None).with_context(class_name, course);
            sequences.insert(record.name.clone(), block.sequence(grid, row));
            meta.filter.accepted += 1;
            if book.insert(record).is_some() {
                meta.filter.replaced += 1;
            }
        }
    }

    let mut records = book.into_records();
    records.sort_by_key(|record| sequences.get(&record.name).copied().unwrap_or(u64::MAX));
    meta.blocks = blocks;
    meta.count = records.len();
    (records, meta)
}
