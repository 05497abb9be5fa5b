//! Classification outcome for a single statement

use crate::taxonomy::Category;
use crate::ERROR_LABEL;
use std::fmt;

/// Value written to the `Category` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// The model produced a valid taxonomy category
    Category(Category),

    /// Every attempt failed; the reason holds diagnostic text
    Error,
}

impl Label {
    /// Get the label text as written to output files
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Category(category) => category.as_str(),
            Label::Error => ERROR_LABEL,
        }
    }

    /// Parse a label read back from an output file
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim() == ERROR_LABEL {
            return Some(Label::Error);
        }
        Category::parse(s).map(Label::Category)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Category> for Label {
    fn from(category: Category) -> Self {
        Label::Category(category)
    }
}

/// Terminal result of classifying one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Category or the `ERROR` sentinel
    pub label: Label,

    /// Model rationale, or the last raw model output on failure
    pub reason: String,

    /// Number of model invocations performed
    pub attempts: u32,
}

impl ClassificationResult {
    /// A successful classification
    pub fn classified(category: Category, reason: impl Into<String>, attempts: u32) -> Self {
        Self {
            label: Label::Category(category),
            reason: reason.into(),
            attempts,
        }
    }

    /// A classification whose retries were exhausted
    pub fn failed(last_output: impl Into<String>, attempts: u32) -> Self {
        Self {
            label: Label::Error,
            reason: last_output.into(),
            attempts,
        }
    }

    /// Whether this is the `ERROR` sentinel
    pub fn is_error(&self) -> bool {
        self.label == Label::Error
    }

    /// The category, if classification succeeded
    pub fn category(&self) -> Option<Category> {
        match self.label {
            Label::Category(category) => Some(category),
            Label::Error => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_label_text() {
        assert_eq!(Label::Error.as_str(), "ERROR");
        assert_eq!(Label::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_label_parse() {
        assert_eq!(Label::parse("ERROR"), Some(Label::Error));
        assert_eq!(
            Label::parse("Author Upon Request Only"),
            Some(Label::Category(Category::AuthorRequestOnly))
        );
        assert_eq!(Label::parse("error"), None);
    }

    #[test]
    fn test_result_constructors() {
        let ok = ClassificationResult::classified(Category::ControlledAccess, "dbGaP", 2);
        assert!(!ok.is_error());
        assert_eq!(ok.category(), Some(Category::ControlledAccess));
        assert_eq!(ok.attempts, 2);

        let failed = ClassificationResult::failed("garbage", 3);
        assert!(failed.is_error());
        assert_eq!(failed.category(), None);
        assert_eq!(failed.reason, "garbage");
    }
}
