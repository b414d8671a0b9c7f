// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use std::path::PathBuf;

use thiserror::Error;

use crate::units::Unit;

/// Top-level error type for all Folio operations.
///
/// Bounds violations carry the offending value and the violated limit, both
/// expressed in the caller's unit.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Bounds violations --
    #[error("column position {value}{unit} is outside the drawable area (limit {limit}{unit})")]
    OutOfRangeColumn { value: f64, limit: f64, unit: Unit },

    #[error(
        "content starting at column {value}{unit} overflows the bottom margin once its height is applied (limit {limit}{unit})"
    )]
    OutOfRangeColumnWithHeight { value: f64, limit: f64, unit: Unit },

    #[error("line position {value}{unit} is outside the drawable area (limit {limit}{unit})")]
    OutOfRangeLine { value: f64, limit: f64, unit: Unit },

    #[error(
        "content starting at line {value}{unit} overflows the right margin once its width is applied (limit {limit}{unit})"
    )]
    OutOfRangeLineWithWidth { value: f64, limit: f64, unit: Unit },

    #[error("{name} must not be negative, got {value}")]
    NegativeValue { name: &'static str, value: f64 },

    #[error("{name} must be a finite number, got {value}")]
    NonFiniteValue { name: &'static str, value: f64 },

    // -- Page lifecycle --
    #[error("page {0} not found")]
    PageNotFound(usize),

    #[error("nothing to save: the document has no pages")]
    NoPagesToSave,

    #[error("no files given to merge")]
    EmptyFileList,

    #[error("source file not found: {}", .0.display())]
    SourceFileNotFound(PathBuf),

    // -- Collaborator --
    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("font error: {0}")]
    Font(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FolioError {
    /// Whether this error is one of the four drawable-area violations.
    pub fn is_bounds_violation(&self) -> bool {
        matches!(
            self,
            Self::OutOfRangeColumn { .. }
                | Self::OutOfRangeColumnWithHeight { .. }
                | Self::OutOfRangeLine { .. }
                | Self::OutOfRangeLineWithWidth { .. }
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
