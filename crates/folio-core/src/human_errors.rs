// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for document authors.
//
// Every technical error is mapped to plain English with a concrete suggestion.
// Severity tells a front-end whether the fix is in the layout, the inputs, or
// the environment.

use crate::error::FolioError;

/// Where the author should look to fix the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Content does not fit the drawable area; move or shrink it.
    Layout,
    /// A bad argument: negative size, missing page, missing file.
    Input,
    /// Disk, PDF parsing, or font loading failed.
    Storage,
}

/// A human-readable error with a plain English message and suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `FolioError` into something an author can act on.
pub fn humanize_error(err: &FolioError) -> HumanError {
    match err {
        FolioError::OutOfRangeColumn { value, limit, unit } => HumanError {
            message: format!("The item at {value}{unit} from the top is outside the page margins."),
            suggestion: format!("Keep the vertical position within the margin boundary at {limit}{unit}."),
            severity: Severity::Layout,
        },
        FolioError::OutOfRangeColumnWithHeight { value, limit, unit } => HumanError {
            message: format!("The item at {value}{unit} runs past the bottom margin."),
            suggestion: format!("Move it up or make it shorter; the bottom margin is at {limit}{unit}."),
            severity: Severity::Layout,
        },
        FolioError::OutOfRangeLine { value, limit, unit } => HumanError {
            message: format!("The item at {value}{unit} from the left is outside the page margins."),
            suggestion: format!("Keep the horizontal position within the margin boundary at {limit}{unit}."),
            severity: Severity::Layout,
        },
        FolioError::OutOfRangeLineWithWidth { value, limit, unit } => HumanError {
            message: format!("The item starting at {value}{unit} runs past the right margin."),
            suggestion: format!("Move it left, shorten it, or use a smaller font; the right margin is at {limit}{unit}."),
            severity: Severity::Layout,
        },
        FolioError::NegativeValue { name, value } => HumanError {
            message: format!("The {name} cannot be negative (got {value})."),
            suggestion: "Use zero or a positive number.".into(),
            severity: Severity::Input,
        },
        FolioError::NonFiniteValue { name, value } => HumanError {
            message: format!("The {name} is not a usable number (got {value})."),
            suggestion: "Check the calculation that produced it; use a finite number.".into(),
            severity: Severity::Input,
        },
        FolioError::PageNotFound(page) => HumanError {
            message: format!("Page {page} does not exist."),
            suggestion: "Check the page count before selecting or removing a page.".into(),
            severity: Severity::Input,
        },
        FolioError::NoPagesToSave => HumanError {
            message: "There is nothing to save yet.".into(),
            suggestion: "Add at least one page before saving.".into(),
            severity: Severity::Input,
        },
        FolioError::EmptyFileList => HumanError {
            message: "No files were given to merge.".into(),
            suggestion: "Pass at least one PDF path.".into(),
            severity: Severity::Input,
        },
        FolioError::SourceFileNotFound(path) => HumanError {
            message: format!("The file {} could not be found.", path.display()),
            suggestion: "Check the path and try again.".into(),
            severity: Severity::Input,
        },
        FolioError::Pdf(detail) => HumanError {
            message: "The PDF could not be processed.".into(),
            suggestion: format!("Make sure the file is a valid PDF. ({detail})"),
            severity: Severity::Storage,
        },
        FolioError::Font(detail) => HumanError {
            message: "The font could not be used.".into(),
            suggestion: format!("Try a different font file or remove unsupported characters. ({detail})"),
            severity: Severity::Storage,
        },
        FolioError::Io(err) => HumanError {
            message: "Reading or writing a file failed.".into(),
            suggestion: format!("Check free disk space and folder permissions. ({err})"),
            severity: Severity::Storage,
        },
        FolioError::Serialization(err) => HumanError {
            message: "The settings could not be read.".into(),
            suggestion: format!("Fix the configuration file. ({err})"),
            severity: Severity::Input,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    #[test]
    fn bounds_violation_is_layout() {
        let err = FolioError::OutOfRangeLineWithWidth {
            value: 180.0,
            limit: 200.0,
            unit: Unit::Millimeter,
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Layout);
        assert!(human.suggestion.contains("200mm"));
    }

    #[test]
    fn missing_page_is_input() {
        let human = humanize_error(&FolioError::PageNotFound(4));
        assert_eq!(human.severity, Severity::Input);
        assert!(human.message.contains('4'));
    }

    #[test]
    fn non_finite_value_is_input() {
        let err = FolioError::NonFiniteValue {
            name: "font size",
            value: f64::NAN,
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Input);
        assert!(human.message.contains("font size"));
    }

    #[test]
    fn io_is_storage() {
        let err = FolioError::Io(std::io::Error::other("disk full"));
        assert_eq!(humanize_error(&err).severity, Severity::Storage);
    }
}
