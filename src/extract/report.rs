//! Report layout: title rows, a name row, a score-label row and an optional weight row.

use crate::extract::config::ExtractConfig;
use crate::extract::groups::resolve_groups;
use crate::extract::groups::ColumnGroup;
use crate::extract::header::NameHeader;
use crate::extract::record::ExtractionMeta;
use crate::extract::record::Mode;
use crate::extract::record::Record;
use crate::extract::record::RecordBook;
use crate::extract::record::TitleMeta;
use crate::extract::rows::Candidate;
use crate::grid::contains_any;
use crate::grid::Grid;

/// Reads every data row against every column group. One row may yield several students.
pub(crate) fn extract_report(
    grid: &Grid,
    sheet_name: &str,
    header: &NameHeader,
    score_row: usize,
    title: &TitleMeta,
    config: &ExtractConfig,
) -> (Vec<Record>, ExtractionMeta) {
    let groups = resolve_groups(grid, &header.columns, score_row, config);

    let mut meta = ExtractionMeta::new(sheet_name, Mode::Report, header.row);
    meta.score_row = Some(score_row);
    meta.raw_columns = report_labels(grid, header.row, score_row);
    meta.name_columns = header.columns.clone();
    meta.has_usual_column = header.columns.iter().any(|name_col| {
        (name_col + 1..grid.width()).any(|col| contains_any(&grid.compact(score_row, col), &config.keywords.usual))
    });
    meta.has_exam_column = !groups.is_empty();
    meta.class_name = title.class_name.clone();
    meta.course = title.course.clone();

    let data_start = data_start(grid, score_row, &groups);
    tracing::debug!("Report data rows start at {}", data_start);

    let mut book = RecordBook::new();
    for row in data_start..grid.height() {
        for group in &groups {
            let name = grid.text(row, group.name_col);
            if name.is_empty() {
                continue;
            }
            meta.filter.candidates += 1;
            let candidate = Candidate {
                row,
                name,
                usual: grid.get(row, group.usual_col),
                exam: grid.get(row, group.exam_col),
            };
            if let Err(rejection) = candidate.check_report(config) {
                meta.reject(rejection, || candidate.sample(rejection));
                continue;
            }
            let record = candidate
                .into_record(group.weights)
                .with_context(title.class_name.clone(), title.course.clone());
            meta.filter.accepted += 1;
            if book.insert(record).is_some() {
                meta.filter.replaced += 1;
            }
        }
    }

    meta.groups = groups;
    let records = book.into_records();
    meta.count = records.len();
    (records, meta)
}

/// Data follows the weight row when one is present, otherwise the score-label row.
fn data_start(grid: &Grid, score_row: usize, groups: &[ColumnGroup]) -> usize {
    let offset = if groups.iter().any(ColumnGroup::has_weight_row) { 2 } else { 1 };
    (score_row + offset).min(grid.height())
}

/// Non-blank labels of the name row followed by those of the score row.
fn report_labels(grid: &Grid, name_row: usize, score_row: usize) -> Vec<String> {
    let rows = if score_row == name_row { vec![name_row] } else { vec![name_row, score_row] };
    rows.into_iter()
        .flat_map(|row| (0..grid.width()).map(move |col| grid.text(row, col)))
        .filter(|label| !label.is_empty())
        .collect()
}
