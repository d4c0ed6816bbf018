//! Recovers the class and course named in the title region of a sheet.
//!
//! Course detection runs an ordered list of strategies and keeps the first
//! answer. Which list applies depends on the sheet: assessment-subject sheets
//! put the course in a short window around the class line, often next to
//! decoy cells, while ordinary sheets carry a plain `课程：…` label.

use crate::extract::config::ExtractConfig;
use crate::extract::record::TitleMeta;
use crate::grid::Grid;

const SEPARATORS: [char; 3] = ['：', ':', ' '];
const TEACHER_MARK: &str = "任课教师";
const TEACHER_SUFFIX: &str = "老师";
const CLASS_SUFFIX: &str = "班";
const SCORE_MARK: &str = "成绩";
const TABLE_MARK: &str = "表";
/// Rows after the class row that still belong to the title window.
const TITLE_WINDOW_EXTRA_ROWS: usize = 2;

type CourseStrategy = fn(&TitleScan<'_>) -> Option<String>;

/// Strategies for ordinary sheets, first answer wins.
const ORDINARY_STRATEGIES: &[(&str, CourseStrategy)] = &[
    ("course label", course_label),
    ("subject label", subject_label),
];

/// Strategies for assessment-subject sheets, first answer wins.
const ASSESSMENT_STRATEGIES: &[(&str, CourseStrategy)] = &[
    ("title window", title_window),
    ("first course-like cell", first_course_like),
];

/// Extracts class and course from the top rows of the sheet, never reading row `limit` or below.
pub(crate) fn extract_title(grid: &Grid, sheet_name: &str, limit: usize, config: &ExtractConfig) -> TitleMeta {
    let rows = config.limits.title_rows.min(grid.height()).min(limit);
    let scan = TitleScan { grid, config, rows };
    let class_name = scan.class_label();
    let strategies = if is_assessment_sheet(sheet_name, config) {
        ASSESSMENT_STRATEGIES
    } else {
        ORDINARY_STRATEGIES
    };
    let course = strategies.iter().find_map(|(name, strategy)| {
        let course = strategy(&scan)?;
        tracing::debug!("Course '{}' from {}", course, name);
        Some(course)
    });
    TitleMeta { class_name, course }
}

/// Assessment-subject sheets are named like `考查科目` or `计算机考察科目`.
pub(crate) fn is_assessment_sheet(sheet_name: &str, config: &ExtractConfig) -> bool {
    let name = sheet_name.trim();
    let keywords = &config.keywords;
    !name.is_empty()
        && !keywords.subject.is_empty()
        && name.contains(keywords.subject.as_str())
        && keywords.assessment_markers.iter().any(|marker| !marker.is_empty() && name.contains(marker.as_str()))
}

/// Whether a cell text reads like a course name rather than a label, title or class.
pub(crate) fn is_likely_course_name(text: &str, config: &ExtractConfig) -> bool {
    let text = text.trim();
    if text.is_empty() || text.chars().count() > config.limits.max_course_len {
        return false;
    }
    if config.keywords.title_markers.iter().any(|marker| text.contains(marker.as_str()))
        || (text.contains(SCORE_MARK) && text.contains(TABLE_MARK))
    {
        return false;
    }
    let labels = bare_labels(config);
    let stripped = text.trim_end_matches(SEPARATORS);
    if labels.contains(&text) || labels.contains(&stripped) {
        return false;
    }
    let course_label = first(&config.keywords.course);
    if (!course_label.is_empty() && text.starts_with(course_label))
        || (!config.keywords.subject.is_empty() && text.starts_with(config.keywords.subject.as_str()))
        || text.contains(TEACHER_MARK)
        || text.ends_with(TEACHER_SUFFIX)
    {
        return false;
    }
    !(text.ends_with(CLASS_SUFFIX) || text.ends_with('：') || text.ends_with(':'))
}

fn bare_labels(config: &ExtractConfig) -> Vec<&str> {
    [first(&config.keywords.class), first(&config.keywords.course), config.keywords.subject.as_str()]
        .into_iter()
        .filter(|label| !label.is_empty())
        .collect()
}

fn first(values: &[String]) -> &str {
    values.first().map(String::as_str).unwrap_or("")
}

/// Splits `label：value` at the first separator present; `None` when the label is not on the left.
fn labelled_value<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let separator = SEPARATORS.iter().find(|separator| text.contains(**separator))?;
    let (left, right) = text.split_once(*separator)?;
    left.contains(label).then(|| right.trim())
}

struct TitleScan<'a> {
    grid: &'a Grid,
    config: &'a ExtractConfig,
    rows: usize,
}

impl TitleScan<'_> {
    fn title_rows(&self) -> usize {
        self.rows
    }

    /// Trimmed non-empty cell texts of a row with their columns.
    fn cells(&self, row: usize) -> impl Iterator<Item = (usize, String)> + '_ {
        let grid = self.grid;
        (0..grid.width())
            .map(move |col| (col, grid.text(row, col)))
            .filter(|(_, text)| !text.is_empty())
    }

    /// First value of a `label：value` cell in the title region, row by row, that `accept` allows.
    /// Cells without a separator yield the text around the label; a bare label yields nothing.
    fn labelled(&self, label: &str, accept: impl Fn(&str) -> bool) -> Option<String> {
        if label.is_empty() {
            return None;
        }
        (0..self.title_rows())
            .flat_map(|row| self.cells(row))
            .filter(|(_, text)| text.contains(label))
            .find_map(|(_, text)| {
                let value = if SEPARATORS.iter().any(|separator| text.contains(*separator)) {
                    labelled_value(&text, label)?.to_owned()
                } else {
                    text.replace(label, "").trim_matches(SEPARATORS).trim().to_owned()
                };
                (!value.is_empty() && accept(&value)).then_some(value)
            })
    }

    fn class_label(&self) -> Option<String> {
        self.labelled(first(&self.config.keywords.class), |_| true)
    }
}

fn course_label(scan: &TitleScan<'_>) -> Option<String> {
    scan.labelled(first(&scan.config.keywords.course), |value| is_likely_course_name(value, scan.config))
}

fn subject_label(scan: &TitleScan<'_>) -> Option<String> {
    scan.labelled(&scan.config.keywords.subject, |value| is_likely_course_name(value, scan.config))
}

/// Ranks course candidates found on the class row and the rows right after it.
fn title_window(scan: &TitleScan<'_>) -> Option<String> {
    let config = scan.config;
    let class_label = first(&config.keywords.class);
    if class_label.is_empty() {
        return None;
    }
    let class_row = (0..scan.title_rows())
        .find(|row| scan.cells(*row).any(|(_, text)| text.contains(class_label)))?;
    let end = (class_row + 1 + TITLE_WINDOW_EXTRA_ROWS).min(scan.title_rows());

    let course_label = first(&config.keywords.course);
    let subject_label = config.keywords.subject.as_str();
    let mut candidates = CourseCandidates::default();
    for row in class_row..end {
        for (_, text) in scan.cells(row) {
            let labelled = [course_label, subject_label]
                .into_iter()
                .filter(|label| !label.is_empty() && text.contains(*label))
                .find_map(|label| labelled_value(&text, label).map(|value| (label, value)));
            match labelled {
                Some((label, value)) if is_likely_course_name(value, config) => {
                    if label == course_label {
                        candidates.course.push(value.to_owned());
                    } else {
                        candidates.subject.push(value.to_owned());
                    }
                }
                _ if is_likely_course_name(&text, config) => candidates.standalone.push(text.to_owned()),
                _ => (),
            }
        }
    }
    candidates.best()
}

fn first_course_like(scan: &TitleScan<'_>) -> Option<String> {
    (0..scan.title_rows())
        .flat_map(|row| scan.cells(row))
        .map(|(_, text)| text)
        .find(|text| is_likely_course_name(text, scan.config))
}

/// Course candidates by the label they were found under.
#[derive(Default)]
struct CourseCandidates {
    course: Vec<String>,
    subject: Vec<String>,
    standalone: Vec<String>,
}

impl CourseCandidates {
    /// Course-labelled values beat subject-labelled ones; either competes with the
    /// shortest lone cell and the shorter text wins, ties going to the labelled one.
    /// Subject values alone pick the shortest if it has at most 3 characters, else the longest.
    fn best(&self) -> Option<String> {
        let best_course = shortest(&self.course);
        let best_subject = shortest(&self.subject);
        let best_standalone = shortest(&self.standalone);
        let shorter = |labelled: &str, standalone: &str| {
            let text = if length(labelled) <= length(standalone) { labelled } else { standalone };
            text.to_owned()
        };
        match (best_course, best_subject, best_standalone) {
            (Some(course), _, Some(standalone)) => Some(shorter(course, standalone)),
            (Some(course), _, None) => Some(course.to_owned()),
            (None, Some(subject), Some(standalone)) => Some(shorter(subject, standalone)),
            (None, Some(subject), None) if length(subject) <= 3 => Some(subject.to_owned()),
            (None, Some(_), None) => longest(&self.subject).map(str::to_owned),
            (None, None, standalone) => standalone.map(str::to_owned),
        }
    }
}

fn length(text: &str) -> usize {
    text.chars().count()
}

/// First of the shortest values.
fn shortest(values: &[String]) -> Option<&str> {
    values.iter().min_by_key(|value| length(value)).map(String::as_str)
}

/// First of the longest values.
fn longest(values: &[String]) -> Option<&str> {
    values.iter().rev().max_by_key(|value| length(value)).map(String::as_str)
}
