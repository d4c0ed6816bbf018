use crate::error::ScoreSheetError;
use glob::Pattern;

/// Selects which sheets of a workbook get extracted.
#[derive(Clone, Debug, Default)]
pub struct SheetFilter {
    /// Sheet name patterns; `None` accepts every sheet.
    sheet_name_patterns: Option<Vec<Pattern>>,
}

impl SheetFilter {
    /// Builds a filter from glob patterns. An empty list accepts every sheet.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ScoreSheetError> {
        if patterns.is_empty() {
            return Ok(SheetFilter::default());
        }
        let patterns = patterns
            .iter()
            .map(|pattern| Pattern::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SheetFilter {
            sheet_name_patterns: Some(patterns),
        })
    }

    /// Checks if a sheet name matches any pattern.
    pub fn accept(&self, sheet_name: &str) -> bool {
        match &self.sheet_name_patterns {
            Some(patterns) => patterns.iter().any(|pattern| pattern.matches(sheet_name)),
            None => true,
        }
    }

    /// Keeps the accepted names, preserving workbook order.
    pub fn select(&self, sheet_names: Vec<String>) -> Vec<String> {
        sheet_names.into_iter().filter(|name| self.accept(name)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_accepts_all() -> Result<(), ScoreSheetError> {
        let filter = SheetFilter::new::<&str>(&[])?;
        assert!(filter.accept("Sheet1"));
        Ok(())
    }

    #[test]
    fn patterns_select_sheets() -> Result<(), ScoreSheetError> {
        let filter = SheetFilter::new(&["*考查*", "Sheet?"])?;
        let names = vec!["Sheet1".to_owned(), "封面".to_owned(), "计算机考查科目".to_owned(), "Sheet10".to_owned()];
        assert_eq!(filter.select(names), vec!["Sheet1", "计算机考查科目"]);
        Ok(())
    }

    #[test]
    fn invalid_pattern_is_error() {
        assert!(matches!(SheetFilter::new(&["***"]), Err(ScoreSheetError::PatternError(_))));
    }
}
