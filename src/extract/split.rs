//! Detects whether a single header row describes two record blocks side by side.
//!
//! The strategies run in order and the first one that answers wins. Strategies
//! that only guess from label positions must see the right-hand block resolve
//! both score columns on its own before their answer counts.

use crate::extract::config::ExtractConfig;
use crate::extract::table::pick_column;
use crate::extract::table::Label;

type SplitStrategy = fn(&[Label], &ExtractConfig) -> Option<usize>;

const STRATEGIES: &[(&str, SplitStrategy)] = &[
    ("repeated sequence column", repeated_sequence),
    ("repeated name column", repeated_name),
    ("suffixed label", suffixed_label),
    ("repeated usual column", repeated_usual),
    ("blank column", blank_column),
];

/// Column where the right-hand block starts, with the strategy that found it.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Split {
    pub(crate) column: usize,
    pub(crate) strategy: &'static str,
}

pub(crate) fn detect_split(labels: &[Label], config: &ExtractConfig) -> Option<Split> {
    STRATEGIES.iter().find_map(|(strategy, detect)| {
        let column = detect(labels, config).filter(|column| *column > 0 && *column < labels.len())?;
        tracing::debug!("Double-column split at {} by {}", column, strategy);
        Some(Split { column, strategy: *strategy })
    })
}

fn positions(labels: &[Label], aliases: &[String]) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, label)| label.is(aliases))
        .map(|(index, _)| index)
        .collect()
}

fn repeated_sequence(labels: &[Label], config: &ExtractConfig) -> Option<usize> {
    positions(labels, &config.keywords.sequence).get(1).copied()
}

fn repeated_name(labels: &[Label], config: &ExtractConfig) -> Option<usize> {
    let keywords = &config.keywords;
    let aliases: Vec<String> = keywords.name.iter().chain(&keywords.name_headers).cloned().collect();
    let names = positions(labels, &aliases);
    let (first, second) = (*names.first()?, *names.get(1)?);
    let before = second - 1;
    if before > first && labels[before].is(&keywords.sequence) {
        Some(before)
    } else {
        Some(second)
    }
}

fn suffixed_label(labels: &[Label], config: &ExtractConfig) -> Option<usize> {
    labels
        .iter()
        .enumerate()
        .skip(2)
        .filter(|(_, label)| label.suffixed && !label.is_placeholder(config))
        .map(|(index, _)| index - 2)
        .find(|candidate| resolves_scores(&labels[*candidate..], config))
}

fn repeated_usual(labels: &[Label], config: &ExtractConfig) -> Option<usize> {
    let usual: Vec<usize> = (0..labels.len())
        .filter(|index| pick_column(&labels[*index..=*index], &config.keywords.usual).is_some())
        .collect();
    let candidate = usual.get(1)?.checked_sub(2)?;
    resolves_scores(&labels[candidate..], config).then_some(candidate)
}

fn blank_column(labels: &[Label], config: &ExtractConfig) -> Option<usize> {
    (1..labels.len()).find(|index| {
        labels[*index].is_placeholder(config)
            && labels[index + 1..].iter().any(|label| !label.is_placeholder(config))
            && names_a_column(&labels[*index..], config)
    })
}

/// True when the slice holds a student or score column; notes and remarks alone do not count.
fn names_a_column(labels: &[Label], config: &ExtractConfig) -> bool {
    let keywords = &config.keywords;
    [&keywords.name, &keywords.student, &keywords.usual, &keywords.exam]
        .into_iter()
        .any(|aliases| pick_column(labels, aliases).is_some())
}

fn resolves_scores(labels: &[Label], config: &ExtractConfig) -> bool {
    pick_column(labels, &config.keywords.usual).is_some() && pick_column(labels, &config.keywords.exam).is_some()
}
