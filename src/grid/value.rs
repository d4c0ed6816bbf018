//! Canonical cell values and the conversions every heuristic reads through.

use serde::Serialize;
use std::fmt::Display;

/// A single grid value. Formatting and merge information never reach the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Builds a value from loose input: NaN becomes empty, text is kept verbatim.
    pub fn from_number(value: f64) -> Self {
        if value.is_nan() {
            CellValue::Empty
        } else {
            CellValue::Number(value)
        }
    }

    /// Returns true for absent values, including whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(value) => value.is_nan(),
            CellValue::Text(text) => text.trim().is_empty(),
        }
    }

    /// Trimmed text form; empty string for absent values.
    pub fn text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(value) => number_text(*value),
            CellValue::Text(text) => text.trim().to_owned(),
        }
    }

    /// Text form with every whitespace variant removed, used for keyword matching.
    pub fn compact(&self) -> String {
        compact(&self.text())
    }

    /// Finite numeric form. Text is parsed after trimming.
    pub fn number(&self) -> Option<f64> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(value) => Some(*value).filter(|value| value.is_finite()),
            CellValue::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
        }
    }

    /// Score form: rounded to the nearest integer and clamped to [0, 100].
    pub fn score(&self) -> Option<u32> {
        self.number().and_then(to_score)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_owned())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::from(value.as_str())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::from_number(value)
    }
}

impl Display for CellValue {
    /// Displays the untrimmed original text.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(value) => write!(f, "{}", number_text(*value)),
            CellValue::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Integral numbers print without a fractional part so that `1.0` and `"1"` read alike.
fn number_text(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Removes all whitespace, including the full-width space and line breaks.
pub fn compact(text: &str) -> String {
    text.chars()
        .filter(|character| !character.is_whitespace() && *character != '\u{3000}')
        .collect()
}

/// Rounds half to even and clamps into [0, 100]; non-finite input is absent.
pub fn to_score(value: f64) -> Option<u32> {
    if value.is_finite() {
        Some(value.clamp(0.0, 100.0).round_ties_even() as u32)
    } else {
        None
    }
}
