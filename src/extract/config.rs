//! Keyword vocabulary and numeric limits the heuristics run on.
//!
//! Every field has a default tuned for Chinese school grade sheets, so a TOML
//! file only needs to name what it changes:
//!
//! ```toml
//! default_course = "语文"
//!
//! [keywords]
//! usual = ["平时成绩", "平时", "过程性评价"]
//!
//! [limits]
//! header_scan_rows = 60
//! ```

use crate::error::ScoreSheetError;
use crate::error::ResultMessage;
use serde::Deserialize;
use std::path::Path;

/// Alias lists for every semantic cue. Matching is whitespace- and case-insensitive.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Keywords {
    /// Fragments marking a student-name column header.
    pub name: Vec<String>,
    /// Cell texts that are a name header rather than a student.
    pub name_headers: Vec<String>,
    /// Fragments of a "student" column, tried when no name column exists.
    pub student: Vec<String>,
    /// Sequence-number column labels.
    pub sequence: Vec<String>,
    /// Usual-score labels, in priority order.
    pub usual: Vec<String>,
    /// Exam-score labels, in priority order.
    pub exam: Vec<String>,
    /// Class column labels; the first entry is also the title-region class label.
    pub class: Vec<String>,
    /// Course column labels; the first entry is also the title-region course label.
    pub course: Vec<String>,
    /// Subject label, the title-region alternative to the course label.
    pub subject: String,
    /// Administrative vocabulary that never appears in a student name.
    pub admin: Vec<String>,
    /// Report boilerplate that disqualifies a name cell.
    pub boilerplate: Vec<String>,
    /// Punctuation that never appears in a student name.
    pub name_separators: Vec<String>,
    /// Sheet-name markers of assessment-subject sheets (combined with the subject label).
    pub assessment_markers: Vec<String>,
    /// Title-cell fragments that rule a cell out as a course name.
    pub title_markers: Vec<String>,
    /// Labels treated as blank header placeholders.
    pub placeholders: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        Keywords {
            name: strings(&["姓名", "name"]),
            name_headers: strings(&["学生姓名", "姓名"]),
            student: strings(&["学生", "student"]),
            sequence: strings(&["序号", "编号"]),
            usual: strings(&["平时成绩", "平时", "usual", "平时分", "过程性评价"]),
            exam: strings(&["考试成绩", "考试", "exam", "期末", "期末成绩"]),
            class: strings(&["班级", "class", "classname", "行政班"]),
            course: strings(&["课程", "course", "学科"]),
            subject: "科目".to_owned(),
            admin: strings(&["班级", "课程", "科目", "教师", "老师", "体检", "健康"]),
            boilerplate: strings(&["说明", "统计", "成绩"]),
            name_separators: strings(&["，", "。", "：", ":", ";", "；", "、", "\n", "\t"]),
            assessment_markers: strings(&["考查", "考察"]),
            title_markers: strings(&["报告单", "分析表"]),
            placeholders: strings(&["Unnamed", "nan", "None"]),
        }
    }
}

/// Scan windows and numeric tolerances.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Limits {
    /// Rows scanned from the top for the name header.
    pub header_scan_rows: usize,
    /// Rows of the title region searched for class and course.
    pub title_rows: usize,
    /// Rows below the name row searched for the score-label row.
    pub score_row_window: usize,
    /// Longest accepted student name, in characters.
    pub max_name_len: usize,
    /// Shortest name accepted when the name column is inferred.
    pub min_inferred_name_len: usize,
    /// Longest accepted course name, in characters.
    pub max_course_len: usize,
    /// Allowed distance of a weight pair's sum from 1.
    pub weight_tolerance: f64,
    /// Exam weight that identifies the exam column by its weight-row cell.
    pub exam_weight: f64,
    /// Percentages that make a data row look like a weight row.
    pub weight_row_percentages: Vec<u32>,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            header_scan_rows: 40,
            title_rows: 8,
            score_row_window: 5,
            max_name_len: 10,
            min_inferred_name_len: 2,
            max_course_len: 20,
            weight_tolerance: 0.02,
            exam_weight: 0.4,
            weight_row_percentages: vec![30, 40, 50, 60, 70],
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractConfig {
    pub keywords: Keywords,
    pub limits: Limits,
    /// Class used when neither the rows nor the title region name one.
    pub default_class: Option<String>,
    /// Course used when neither the rows nor the title region name one.
    pub default_course: Option<String>,
}

impl ExtractConfig {
    /// Reads a TOML configuration file; missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScoreSheetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(ScoreSheetError::from)
            .with_prefix(&path.display().to_string())?;
        Self::parse(&text).with_prefix(&path.display().to_string())
    }

    /// Parses TOML text; missing fields keep their defaults.
    pub fn parse(text: &str) -> Result<Self, ScoreSheetError> {
        Ok(toml::from_str(text)?)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() -> Result<(), ScoreSheetError> {
        assert_eq!(ExtractConfig::parse("")?, ExtractConfig::default());
        Ok(())
    }

    #[test]
    fn partial_overrides_keep_other_defaults() -> Result<(), ScoreSheetError> {
        let config = ExtractConfig::parse(
            r#"
            default_course = "语文"

            [keywords]
            usual = ["过程性评价"]

            [limits]
            header_scan_rows = 60
            "#,
        )?;
        assert_eq!(config.default_course.as_deref(), Some("语文"));
        assert_eq!(config.keywords.usual, vec!["过程性评价"]);
        assert_eq!(config.keywords.exam, Keywords::default().exam);
        assert_eq!(config.limits.header_scan_rows, 60);
        assert_eq!(config.limits.title_rows, 8);
        Ok(())
    }

    #[test]
    fn load_reports_path() {
        let error = ExtractConfig::load("/nonexistent/score-sheet.toml").unwrap_err();
        assert!(error.to_string().starts_with("/nonexistent/score-sheet.toml: "));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        assert!(matches!(
            ExtractConfig::parse("[limits]\nheader_scan_rows = \"many\""),
            Err(ScoreSheetError::ConfigError(_))
        ));
    }
}
