use crate::error::ScoreSheetError;
use crate::grid::CellValue;
use crate::spreadsheet::reference::index_to_reference;
use chrono::Duration;
use chrono::NaiveDate;

/// Types of cell data in spreadsheet files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// Time values, epoch independent
    NumberTime,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values (#N/A, #DIV/0! ...)
    Error,
}

impl CellType {
    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(Self::NumberTime),
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Quoted literals, escapes and bracketed sections (colors, locales) are skipped.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, _) => Self::NumberTime,
            (false, false, _) => Self::Number,
        }
    }
}

/// A raw cell as stored in the workbook, before normalization.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell value as stored (shared strings already resolved)
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Converts the stored value into a grid value.
    ///
    /// Numbers stay numeric so scores and weights survive untouched; dates and
    /// times become ISO text; error cells and unparsable numbers become empty.
    pub(crate) fn to_value(&self) -> CellValue {
        match self.kind {
            CellType::Empty | CellType::Error => CellValue::Empty,
            CellType::Boolean => CellValue::from(if self.value == "1" { "TRUE" } else { "FALSE" }),
            CellType::Number => self
                .value
                .trim()
                .parse::<f64>()
                .map(CellValue::from_number)
                .unwrap_or_else(|_| CellValue::from(self.value.as_str())),
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => {
                let is_1904 = self.kind == CellType::NumberDateTime1904;
                self.rendered(to_datetime_string(&self.value, is_1904))
            }
            CellType::NumberDate1900 | CellType::NumberDate1904 => {
                let is_1904 = self.kind == CellType::NumberDate1904;
                self.rendered(to_date_string(&self.value, is_1904))
            }
            CellType::NumberTime => self.rendered(to_time_string(&self.value)),
            CellType::IsoDateTime => CellValue::from(self.value.replace('T', " ")),
            CellType::InlineString | CellType::SharedString => CellValue::from(self.value.as_str()),
        }
    }

    fn rendered(&self, text: Result<String, ScoreSheetError>) -> CellValue {
        match text {
            Ok(text) => CellValue::Text(text),
            Err(error) => {
                tracing::debug!("Keep raw value of {}: {}", self.reference(), error);
                CellValue::from(self.value.as_str())
            }
        }
    }
}

/// Converts Excel numeric date to ISO date string.
/// Handles the Lotus 1-2-3 leap year bug for the 1900 epoch.
fn to_date_string(value: &str, is_1904: bool) -> Result<String, ScoreSheetError> {
    let days = value.trim().parse::<f64>()?.trunc() as i64;
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).expect("NaiveDate Literal");
    let date = epoch
        .checked_add_signed(Duration::days(days + offset))
        .ok_or_else(|| ScoreSheetError::WithContextError(format!("date serial '{}' out of range", value)))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Converts Excel day fraction to ISO time string.
fn to_time_string(value: &str) -> Result<String, ScoreSheetError> {
    let fraction = value.trim().parse::<f64>()?.fract();
    let mut seconds = (fraction * 86_400f64).round() as i64;
    let hours = seconds / 3600;
    seconds %= 3600;
    Ok(format!("{:02}:{:02}:{:02}", hours, seconds / 60, seconds % 60))
}

/// Converts Excel numeric datetime to ISO datetime string.
fn to_datetime_string(value: &str, is_1904: bool) -> Result<String, ScoreSheetError> {
    let date = to_date_string(value, is_1904)?;
    let time = to_time_string(value)?;
    Ok(format!("{date} {time}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kind: CellType, value: &str) -> Cell {
        Cell { row: 0, col: 0, kind, value: value.to_owned() }
    }

    #[test]
    fn custom_formats() {
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd", false), CellType::NumberDate1900);
        assert_eq!(CellType::parse_custom_number_format("h:mm:ss", false), CellType::NumberTime);
        assert_eq!(CellType::parse_custom_number_format("[Red]0.00", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("0\"d\"", true), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("yyyy/m/d h:mm", true), CellType::NumberDateTime1904);
    }

    #[test]
    fn numbers_stay_numeric() {
        assert_eq!(cell(CellType::Number, "0.6").to_value(), CellValue::Number(0.6));
        assert_eq!(cell(CellType::Number, "88").to_value(), CellValue::Number(88.0));
    }

    #[test]
    fn dates_render_as_text() {
        assert_eq!(cell(CellType::NumberDate1900, "45292").to_value(), CellValue::from("2024-01-01"));
        assert_eq!(cell(CellType::NumberTime, "0.5").to_value(), CellValue::from("12:00:00"));
        assert_eq!(
            cell(CellType::NumberDateTime1900, "45292.75").to_value(),
            CellValue::from("2024-01-01 18:00:00")
        );
    }

    #[test]
    fn errors_and_booleans() {
        assert_eq!(cell(CellType::Error, "#N/A").to_value(), CellValue::Empty);
        assert_eq!(cell(CellType::Boolean, "1").to_value(), CellValue::from("TRUE"));
        assert_eq!(cell(CellType::SharedString, " 张三 ").to_value(), CellValue::from(" 张三 "));
    }
}
