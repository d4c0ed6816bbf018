//! Resolves the usual and exam score columns that belong to each name column of a report.

use crate::extract::config::ExtractConfig;
use crate::grid::contains_any;
use crate::grid::Grid;
use serde::Serialize;

/// Validated weighting factors of a column group.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Weights {
    pub usual: f64,
    pub exam: f64,
}

impl Weights {
    /// Accepts a pair only if both lie in (0, 1] and they sum to 1 within `tolerance`.
    pub fn new(usual: Option<f64>, exam: Option<f64>, tolerance: f64) -> Option<Weights> {
        let (usual, exam) = usual.zip(exam)?;
        let in_range = |weight: f64| weight > 0.0 && weight <= 1.0;
        (in_range(usual) && in_range(exam) && ((usual + exam) - 1.0).abs() < tolerance)
            .then_some(Weights { usual, exam })
    }
}

/// One self-consistent record block: a name column with its two score columns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnGroup {
    pub name_col: usize,
    pub usual_col: usize,
    pub exam_col: usize,
    /// Present only when the weight row holds a valid pair; otherwise raw scores are used.
    pub weights: Option<Weights>,
    /// Whether the exam column was identified by its weight-row value.
    #[serde(skip)]
    pub(crate) exam_by_weight: bool,
}

impl ColumnGroup {
    /// True when the row below the score labels is a weight row for this group.
    pub(crate) fn has_weight_row(&self) -> bool {
        self.weights.is_some() || self.exam_by_weight
    }
}

/// Builds a group for every name column that resolves both score columns.
///
/// Groups missing either column are dropped. The weight row is the row below
/// `score_row`, or `score_row` itself when that is the last row.
pub(crate) fn resolve_groups(grid: &Grid, name_columns: &[usize], score_row: usize, config: &ExtractConfig) -> Vec<ColumnGroup> {
    let weight_row = if score_row + 1 < grid.height() { score_row + 1 } else { score_row };
    name_columns
        .iter()
        .filter_map(|name_col| {
            let group = resolve_group(grid, *name_col, score_row, weight_row, config);
            if group.is_none() {
                tracing::warn!("Name column {} has no complete usual/exam column pair, skipped", name_col);
            }
            group
        })
        .collect()
}

fn resolve_group(grid: &Grid, name_col: usize, score_row: usize, weight_row: usize, config: &ExtractConfig) -> Option<ColumnGroup> {
    let keywords = &config.keywords;
    let limits = &config.limits;
    let usual_col = (name_col + 1..grid.width())
        .find(|col| contains_any(&grid.compact(score_row, *col), &keywords.usual))?;

    let by_weight = (usual_col + 1..grid.width()).find(|col| {
        grid.number(weight_row, *col)
            .map(|weight| (weight - limits.exam_weight).abs() < 1e-6)
            .unwrap_or(false)
    });
    let exam_col = match by_weight {
        Some(col) => col,
        None => (usual_col + 1..grid.width())
            .find(|col| contains_any(&grid.compact(score_row, *col), &keywords.exam))?,
    };

    let weights = Weights::new(
        grid.number(weight_row, usual_col),
        grid.number(weight_row, exam_col),
        limits.weight_tolerance,
    );
    tracing::debug!(
        "Column group: name {} usual {} exam {} weights {:?}",
        name_col, usual_col, exam_col, weights
    );
    Some(ColumnGroup {
        name_col,
        usual_col,
        exam_col,
        weights,
        exam_by_weight: by_weight.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_validate_range_and_sum() {
        assert_eq!(Weights::new(Some(0.6), Some(0.4), 0.02), Some(Weights { usual: 0.6, exam: 0.4 }));
        assert!(Weights::new(Some(0.6000000001), Some(0.4), 0.02).is_some());
        assert!(Weights::new(Some(0.61), Some(0.4), 0.02).is_some());
        assert!(Weights::new(Some(0.7), Some(0.4), 0.02).is_none());
        assert!(Weights::new(Some(60.0), Some(40.0), 0.02).is_none());
        assert!(Weights::new(Some(0.0), Some(1.0), 0.02).is_none());
        assert!(Weights::new(Some(0.6), None, 0.02).is_none());
    }

    #[test]
    fn dual_report_resolves_two_groups() {
        let grid = Grid::from_texts(&[
            vec!["序号", "学生姓名", "成绩", "", "", "序号", "学生姓名", "成绩", "", ""],
            vec!["", "", "平时", "考试", "总评", "", "", "平时", "考试", "总评"],
            vec!["", "", "0.6", "0.4", "", "", "", "0.6", "0.4", ""],
        ]);
        let groups = resolve_groups(&grid, &[1, 6], 1, &ExtractConfig::default());
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].usual_col, groups[0].exam_col), (2, 3));
        assert_eq!((groups[1].usual_col, groups[1].exam_col), (7, 8));
        assert!(groups.iter().all(|group| group.weights == Some(Weights { usual: 0.6, exam: 0.4 })));
        assert!(groups.iter().all(ColumnGroup::has_weight_row));
    }

    #[test]
    fn exam_found_by_weight_signature_without_label() {
        let grid = Grid::from_texts(&[
            vec!["姓名", "", "", ""],
            vec!["", "平时", "卷面", "折算"],
            vec!["", "0.6", "", "0.4"],
        ]);
        let groups = resolve_groups(&grid, &[0], 1, &ExtractConfig::default());
        assert_eq!(groups[0].exam_col, 3);
        assert!(groups[0].exam_by_weight);
    }

    #[test]
    fn exam_label_fallback_keeps_raw_scores() {
        let grid = Grid::from_texts(&[
            vec!["姓名", "", ""],
            vec!["", "平时成绩", "期末成绩"],
            vec!["张三", "90", "80"],
        ]);
        let groups = resolve_groups(&grid, &[0], 1, &ExtractConfig::default());
        assert_eq!(groups[0].exam_col, 2);
        assert_eq!(groups[0].weights, None);
        assert!(!groups[0].has_weight_row());
    }

    #[test]
    fn incomplete_group_is_dropped() {
        let grid = Grid::from_texts(&[
            vec!["姓名", "", "", "姓名", ""],
            vec!["", "平时", "考试", "", "平时"],
        ]);
        let groups = resolve_groups(&grid, &[0, 3], 1, &ExtractConfig::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name_col, 0);
    }
}
