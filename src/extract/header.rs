//! Locates the name header and the score-label row beneath it.

use crate::error::ScoreSheetError;
use crate::extract::config::ExtractConfig;
use crate::grid::contains_any;
use crate::grid::Grid;

/// The first row carrying a name label, with every column that carries one.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NameHeader {
    pub(crate) row: usize,
    pub(crate) columns: Vec<usize>,
}

/// Scans the top rows for a name label. No match anywhere in the window is fatal for the sheet.
pub(crate) fn locate_name_header(grid: &Grid, config: &ExtractConfig) -> Result<NameHeader, ScoreSheetError> {
    let rows_scanned = config.limits.header_scan_rows.min(grid.height());
    for row in 0..rows_scanned {
        let columns: Vec<usize> = (0..grid.width())
            .filter(|col| contains_any(&grid.compact(row, *col), &config.keywords.name))
            .collect();
        if !columns.is_empty() {
            tracing::debug!("Name header at row {} in column(s) {:?}", row, columns);
            return Ok(NameHeader { row, columns });
        }
    }
    Err(ScoreSheetError::NameHeaderNotFound { rows_scanned })
}

/// Finds the row below the name row that carries the score labels, if the sheet is a report.
///
/// A report has a usual-score label below the name row and none on the name row itself;
/// the row right below is preferred, then the first match within the search window.
pub(crate) fn locate_score_row(grid: &Grid, name_row: usize, config: &ExtractConfig) -> Option<usize> {
    let keywords = &config.keywords;
    if grid.row_contains_any(name_row, &keywords.usual) || grid.row_contains_any(name_row, &keywords.exam) {
        return None;
    }
    let last = (name_row + config.limits.score_row_window).min(grid.height().saturating_sub(1));
    let score_row = (name_row + 1..=last).find(|row| grid.row_contains_any(*row, &keywords.usual))?;
    tracing::debug!("Score labels at row {}", score_row);
    Some(score_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExtractConfig {
        ExtractConfig::default()
    }

    #[test]
    fn finds_every_name_column() -> Result<(), ScoreSheetError> {
        let grid = Grid::from_texts(&[
            vec!["课程成绩报告单", "", "", "", ""],
            vec!["序号", "学生 姓名", "平时", "序号", "学生姓名"],
        ]);
        let header = locate_name_header(&grid, &config())?;
        assert_eq!(header, NameHeader { row: 1, columns: vec![1, 4] });
        Ok(())
    }

    #[test]
    fn missing_header_is_structural_failure() {
        let rows: Vec<Vec<&str>> = (0..50).map(|_| vec!["x", "1"]).collect();
        let grid = Grid::from_texts(&rows);
        match locate_name_header(&grid, &config()) {
            Err(ScoreSheetError::NameHeaderNotFound { rows_scanned }) => assert_eq!(rows_scanned, 40),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn header_beyond_window_is_not_found() {
        let mut rows: Vec<Vec<&str>> = (0..40).map(|_| vec![""]).collect();
        rows.push(vec!["姓名"]);
        let grid = Grid::from_texts(&rows);
        assert!(locate_name_header(&grid, &config()).is_err());
    }

    #[test]
    fn score_row_prefers_next_row() {
        let grid = Grid::from_texts(&[
            vec!["姓名", "成绩", ""],
            vec!["", "平时", "考试"],
            vec!["", "0.6", "0.4"],
        ]);
        assert_eq!(locate_score_row(&grid, 0, &config()), Some(1));
    }

    #[test]
    fn score_row_skips_sub_header() {
        let grid = Grid::from_texts(&[
            vec!["姓名", "成绩", ""],
            vec!["", "构成", ""],
            vec!["", "平时成绩", "期末"],
        ]);
        assert_eq!(locate_score_row(&grid, 0, &config()), Some(2));
    }

    #[test]
    fn single_header_row_is_not_a_report() {
        let grid = Grid::from_texts(&[
            vec!["姓名", "平时成绩", "考试成绩"],
            vec!["张三", "88", "82"],
        ]);
        assert_eq!(locate_score_row(&grid, 0, &config()), None);
    }
}
