use thiserror::Error;

/// Main error type for the score sheet crate.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum ScoreSheetError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    #[error("{0}")]
    ConfigError(#[from] toml::de::Error),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Extraction errors
    /// No row in the scan window carries a name header; nothing else can be located.
    #[error("No name header found in the first {rows_scanned} rows; the sheet may be a scan or image rather than a table")]
    NameHeaderNotFound { rows_scanned: usize },
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, ScoreSheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| ScoreSheetError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_wraps_message() {
        let result: Result<(), ScoreSheetError> = Err(ScoreSheetError::NameHeaderNotFound { rows_scanned: 40 });
        let error = result.with_prefix("grades.xlsx").unwrap_err();
        assert!(error.to_string().starts_with("grades.xlsx: No name header found in the first 40 rows"));
    }
}
