//! Records, the name-keyed record book and the metadata that travels with them.

use crate::extract::groups::ColumnGroup;
use crate::extract::table::TableBlock;
use indexmap::IndexMap;
use serde::Serialize;

/// One student's scores as extracted from a sheet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    pub name: String,
    pub class_name: Option<String>,
    pub course: Option<String>,
    pub usual_score: Option<u32>,
    pub exam_score: Option<u32>,
    /// Sum of the two scores, an absent one counting as 0; absent when both are.
    pub final_score: Option<u32>,
    /// 1-based sheet row the record came from.
    pub source_row: usize,
}

impl Record {
    pub fn new(name: String, usual_score: Option<u32>, exam_score: Option<u32>, source_row: usize) -> Self {
        let final_score = match (usual_score, exam_score) {
            (None, None) => None,
            (usual, exam) => Some(usual.unwrap_or(0) + exam.unwrap_or(0)),
        };
        Record {
            name,
            class_name: None,
            course: None,
            usual_score,
            exam_score,
            final_score,
            source_row,
        }
    }

    pub fn with_context(mut self, class_name: Option<String>, course: Option<String>) -> Self {
        self.class_name = class_name;
        self.course = course;
        self
    }
}

/// Records keyed by name in first-seen order; a later record for a name replaces the earlier one in place.
#[derive(Clone, Debug, Default)]
pub struct RecordBook {
    records: IndexMap<String, Record>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the record, returning the one it replaced.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.name.clone(), record)
    }

    pub fn get(&self, name: &str) -> Option<&Record> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records.into_values().collect()
    }
}

/// Course and class recovered from the title region, shared by every record of the sheet.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TitleMeta {
    pub class_name: Option<String>,
    pub course: Option<String>,
}

/// Which layout path produced the records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Title rows, a name row and a score-label row above the data.
    Report,
    /// One conventional header row.
    Table,
}

/// Why a candidate row did not become a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The name cell repeats a header label.
    HeaderLiteral,
    /// The name cell is too long, punctuated, or report boilerplate.
    NotAName,
    /// The name is administrative vocabulary or a number.
    AdminName,
    /// Neither score cell holds a number.
    NoScores,
    /// Both score cells hold weight percentages that add up to 100.
    WeightRow,
}

/// Per-row filtering counts, kept for diagnosing empty results.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FilterStats {
    /// Row and block pairs whose name cell was not blank.
    pub candidates: usize,
    pub accepted: usize,
    pub header_literal: usize,
    pub not_a_name: usize,
    pub admin_name: usize,
    pub no_scores: usize,
    pub weight_row: usize,
    /// Accepted rows that replaced an earlier row with the same name.
    pub replaced: usize,
}

impl FilterStats {
    pub(crate) fn reject(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::HeaderLiteral => self.header_literal += 1,
            Rejection::NotAName => self.not_a_name += 1,
            Rejection::AdminName => self.admin_name += 1,
            Rejection::NoScores => self.no_scores += 1,
            Rejection::WeightRow => self.weight_row += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.header_literal + self.not_a_name + self.admin_name + self.no_scores + self.weight_row
    }
}

/// The first candidate row that was filtered out, as the engine read it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RowSample {
    pub source_row: usize,
    pub name: String,
    pub usual: String,
    pub exam: String,
    pub rejection: Rejection,
}

/// Everything the engine detected on a sheet. The gate reads it before records may be used.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtractionMeta {
    pub sheet: String,
    pub mode: Mode,
    pub has_usual_column: bool,
    pub has_exam_column: bool,
    /// 0-based row holding the name header.
    pub header_row: usize,
    /// 0-based row holding the score labels (report layout only).
    pub score_row: Option<usize>,
    /// Header labels as they appear on the sheet.
    pub raw_columns: Vec<String>,
    pub name_columns: Vec<usize>,
    /// Resolved column groups (report layout).
    pub groups: Vec<ColumnGroup>,
    /// Resolved record blocks (table layout).
    pub blocks: Vec<TableBlock>,
    /// Column where the right-hand block of a double-column table starts.
    pub split_column: Option<usize>,
    pub split_strategy: Option<String>,
    pub class_name: Option<String>,
    pub course: Option<String>,
    pub filter: FilterStats,
    pub sample: Option<RowSample>,
    pub count: usize,
}

impl ExtractionMeta {
    pub(crate) fn new(sheet: &str, mode: Mode, header_row: usize) -> Self {
        ExtractionMeta {
            sheet: sheet.to_owned(),
            mode,
            has_usual_column: false,
            has_exam_column: false,
            header_row,
            score_row: None,
            raw_columns: Vec::new(),
            name_columns: Vec::new(),
            groups: Vec::new(),
            blocks: Vec::new(),
            split_column: None,
            split_strategy: None,
            class_name: None,
            course: None,
            filter: FilterStats::default(),
            sample: None,
            count: 0,
        }
    }

    /// Counts a rejected row, remembering the first one with a name.
    pub(crate) fn reject(&mut self, rejection: Rejection, sample: impl FnOnce() -> RowSample) {
        self.filter.reject(rejection);
        if self.sample.is_none() {
            self.sample = Some(sample());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_score_sums_present_parts() {
        assert_eq!(Record::new("张三".into(), Some(88), Some(82), 2).final_score, Some(170));
        assert_eq!(Record::new("张三".into(), None, Some(82), 2).final_score, Some(82));
        assert_eq!(Record::new("张三".into(), Some(0), None, 2).final_score, Some(0));
        assert_eq!(Record::new("张三".into(), None, None, 2).final_score, None);
    }

    #[test]
    fn later_record_replaces_in_place() {
        let mut book = RecordBook::new();
        assert!(book.insert(Record::new("张三".into(), Some(60), Some(30), 4)).is_none());
        book.insert(Record::new("李四".into(), Some(50), Some(30), 5));
        let replaced = book.insert(Record::new("张三".into(), Some(70), Some(35), 9));
        assert_eq!(replaced.map(|record| record.source_row), Some(4));

        let records = book.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "张三");
        assert_eq!(records[0].usual_score, Some(70));
        assert_eq!(records[0].source_row, 9);
        assert_eq!(records[1].name, "李四");
    }

    #[test]
    fn sample_keeps_first_rejection() {
        let mut meta = ExtractionMeta::new("Sheet1", Mode::Table, 0);
        let sample = |name: &str, rejection| {
            let name = name.to_owned();
            move || RowSample { source_row: 2, name, usual: String::new(), exam: String::new(), rejection }
        };
        meta.reject(Rejection::NoScores, sample("张三", Rejection::NoScores));
        meta.reject(Rejection::WeightRow, sample("权重", Rejection::WeightRow));
        assert_eq!(meta.filter.rejected(), 2);
        assert_eq!(meta.sample.map(|sample| sample.name), Some("张三".to_owned()));
    }
}
