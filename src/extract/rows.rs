//! Decides whether a data row holds a genuine student and turns it into a record.

use crate::extract::config::ExtractConfig;
use crate::extract::groups::Weights;
use crate::extract::record::Record;
use crate::extract::record::Rejection;
use crate::extract::record::RowSample;
use crate::grid::compact;
use crate::grid::contains_any;
use crate::grid::to_score;
use crate::grid::CellValue;

/// A name cell with the two raw score cells read alongside it.
pub(crate) struct Candidate<'a> {
    /// 0-based grid row.
    pub(crate) row: usize,
    pub(crate) name: String,
    pub(crate) usual: &'a CellValue,
    pub(crate) exam: &'a CellValue,
}

impl Candidate<'_> {
    pub(crate) fn sample(&self, rejection: Rejection) -> RowSample {
        RowSample {
            source_row: self.row + 1,
            name: self.name.to_owned(),
            usual: self.usual.text(),
            exam: self.exam.text(),
            rejection,
        }
    }

    /// Report rows: a plausible name and at least one numeric score.
    pub(crate) fn check_report(&self, config: &ExtractConfig) -> Result<(), Rejection> {
        check_name(&self.name, config)?;
        self.check_scores()
    }

    /// Table rows additionally reject administrative names and weight rows.
    pub(crate) fn check_table(&self, config: &ExtractConfig) -> Result<(), Rejection> {
        check_name(&self.name, config)?;
        if is_admin_text(&self.name, config) || is_all_digits(&self.name) {
            return Err(Rejection::AdminName);
        }
        self.check_scores()?;
        if is_weight_row(self.usual.number(), self.exam.number(), config) {
            return Err(Rejection::WeightRow);
        }
        Ok(())
    }

    fn check_scores(&self) -> Result<(), Rejection> {
        if self.usual.number().is_none() && self.exam.number().is_none() {
            Err(Rejection::NoScores)
        } else {
            Ok(())
        }
    }

    /// Builds the record, applying weights to each present score.
    pub(crate) fn into_record(self, weights: Option<Weights>) -> Record {
        let (usual, exam) = match weights {
            Some(weights) => (
                self.usual.number().and_then(|value| to_score(value * weights.usual)),
                self.exam.number().and_then(|value| to_score(value * weights.exam)),
            ),
            None => (self.usual.score(), self.exam.score()),
        };
        Record::new(self.name, usual, exam, self.row + 1)
    }
}

/// Rejects header literals, over-long or punctuated text and report boilerplate.
fn check_name(name: &str, config: &ExtractConfig) -> Result<(), Rejection> {
    let keywords = &config.keywords;
    let compacted = compact(name);
    if keywords.name_headers.iter().any(|header| compact(header) == compacted) {
        return Err(Rejection::HeaderLiteral);
    }
    if name.chars().count() > config.limits.max_name_len
        || keywords.name_separators.iter().any(|separator| !separator.is_empty() && name.contains(separator.as_str()))
        || contains_any(&compacted, &keywords.boilerplate)
    {
        return Err(Rejection::NotAName);
    }
    Ok(())
}

/// Name-like: between the inferred minimum and maximum length, no administrative words, not a number.
pub(crate) fn looks_like_name(text: &str, config: &ExtractConfig) -> bool {
    let length = text.chars().count();
    length >= config.limits.min_inferred_name_len
        && length <= config.limits.max_name_len
        && !is_admin_text(text, config)
        && !is_all_digits(text)
}

fn is_admin_text(text: &str, config: &ExtractConfig) -> bool {
    contains_any(&compact(text), &config.keywords.admin)
}

fn is_all_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|character| character.is_ascii_digit())
}

/// Two weight percentages adding up to 100, such as a 60/40 row under the header.
pub(crate) fn is_weight_row(usual: Option<f64>, exam: Option<f64>, config: &ExtractConfig) -> bool {
    let percentage = |value: f64| {
        (value.fract() == 0.0 && value >= 0.0)
            .then_some(value as u32)
            .filter(|value| config.limits.weight_row_percentages.contains(value))
    };
    match (usual.and_then(percentage), exam.and_then(percentage)) {
        (Some(usual), Some(exam)) => usual + exam == 100,
        _ => false,
    }
}
