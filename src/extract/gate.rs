//! The check every record set must pass before anything downstream may act on it.

use crate::extract::record::ExtractionMeta;
use crate::extract::record::Record;
use crate::extract::record::RowSample;
use std::fmt::Write;
use thiserror::Error;

const ENTRY_HEADER: &str = "姓名 | 平时成绩(目标值) | 考试成绩(目标值)";

/// Why a record set may not be used. `Display` is the diagnostic shown to the operator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    #[error(
        "Refusing to use extracted records: {}. Header row {header_row} reads {labels:?}. \
         Make sure the sheet labels both a usual-score column (e.g. 平时成绩) and an exam-score column (e.g. 考试成绩)",
        describe_missing(.has_usual, .has_exam)
    )]
    MissingColumns {
        has_usual: bool,
        has_exam: bool,
        /// 1-based row of the header.
        header_row: usize,
        labels: Vec<String>,
    },

    #[error("No student rows were extracted{}", describe_filtered(.candidates, .sample))]
    NoRecords { candidates: usize, sample: Option<RowSample> },
}

fn describe_missing(has_usual: &bool, has_exam: &bool) -> &'static str {
    match (has_usual, has_exam) {
        (false, false) => "neither the usual-score nor the exam-score column was recognized",
        (true, false) => "the usual-score column was recognized but the exam-score column was not",
        _ => "the exam-score column was recognized but the usual-score column was not",
    }
}

fn describe_filtered(candidates: &usize, sample: &Option<RowSample>) -> String {
    match sample {
        Some(sample) if *candidates > 0 => format!(
            ": all {} candidate row(s) were filtered out; row {} read name '{}', usual '{}', exam '{}' and was rejected as {:?}",
            candidates, sample.source_row, sample.name, sample.usual, sample.exam, sample.rejection
        ),
        _ if *candidates > 0 => format!(": all {} candidate row(s) were filtered out", candidates),
        _ => ": no row below the header carries a student name".to_owned(),
    }
}

/// Passes only when both score columns were recognized and at least one record came out.
pub fn validate(records: &[Record], meta: &ExtractionMeta) -> Result<(), GateError> {
    if !meta.has_usual_column || !meta.has_exam_column {
        return Err(GateError::MissingColumns {
            has_usual: meta.has_usual_column,
            has_exam: meta.has_exam_column,
            header_row: meta.header_row + 1,
            labels: meta.raw_columns.clone(),
        });
    }
    if records.is_empty() {
        return Err(GateError::NoRecords {
            candidates: meta.filter.candidates,
            sample: meta.sample.clone(),
        });
    }
    Ok(())
}

/// The `name | usual | exam` table handed to entry agents. Absent scores are left blank.
pub fn render_entry_table(records: &[Record]) -> String {
    let score = |score: Option<u32>| score.map(|score| score.to_string()).unwrap_or_default();
    let mut table = format!("{}\n---\n", ENTRY_HEADER);
    for record in records {
        let _ = writeln!(table, "{} | {} | {}", record.name, score(record.usual_score), score(record.exam_score));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::record::Mode;
    use crate::extract::record::Rejection;

    fn meta(has_usual: bool, has_exam: bool) -> ExtractionMeta {
        let mut meta = ExtractionMeta::new("Sheet1", Mode::Table, 0);
        meta.has_usual_column = has_usual;
        meta.has_exam_column = has_exam;
        meta.raw_columns = vec!["姓名".to_owned(), "学号".to_owned(), "成绩".to_owned()];
        meta
    }

    fn records() -> Vec<Record> {
        vec![Record::new("张三".to_owned(), Some(88), Some(82), 2)]
    }

    #[test]
    fn missing_columns_fail_even_with_records() {
        for (has_usual, has_exam) in [(false, false), (true, false), (false, true)] {
            let error = validate(&records(), &meta(has_usual, has_exam)).unwrap_err();
            assert!(matches!(error, GateError::MissingColumns { .. }));
        }
    }

    #[test]
    fn diagnostic_names_the_missing_column_and_labels() {
        let message = validate(&records(), &meta(true, false)).unwrap_err().to_string();
        assert!(message.contains("exam-score column was not"), "{message}");
        assert!(message.contains("Header row 1"), "{message}");
        assert!(message.contains("\"成绩\""), "{message}");
    }

    #[test]
    fn empty_records_report_sample() {
        let mut meta = meta(true, true);
        meta.filter.candidates = 2;
        meta.sample = Some(RowSample {
            source_row: 4,
            name: "成绩统计".to_owned(),
            usual: "3".to_owned(),
            exam: "4".to_owned(),
            rejection: Rejection::NotAName,
        });
        let message = validate(&[], &meta).unwrap_err().to_string();
        assert!(message.contains("all 2 candidate row(s)"), "{message}");
        assert!(message.contains("'成绩统计'"), "{message}");
        assert!(message.contains("NotAName"), "{message}");
    }

    #[test]
    fn complete_set_passes() {
        assert_eq!(validate(&records(), &meta(true, true)), Ok(()));
    }

    #[test]
    fn entry_table_layout() {
        let mut records = records();
        records.push(Record::new("李四".to_owned(), Some(70), None, 3));
        assert_eq!(
            render_entry_table(&records),
            "姓名 | 平时成绩(目标值) | 考试成绩(目标值)\n---\n张三 | 88 | 82\n李四 | 70 | \n"
        );
    }
}
