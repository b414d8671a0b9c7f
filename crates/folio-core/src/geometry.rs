// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry — framing and drawable limits derived from page size and
// margins. All values are in points.

use serde::{Deserialize, Serialize};

use crate::types::PageSpacing;

/// The full page rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageFraming {
    pub line_start: f64,
    pub line_end: f64,
    pub column_start: f64,
    pub column_end: f64,
}

impl PageFraming {
    pub fn for_page(width: f64, height: f64) -> Self {
        Self {
            line_start: 0.0,
            line_end: width,
            column_start: 0.0,
            column_end: height,
        }
    }
}

/// The drawable sub-rectangle in PDF's bottom-origin frame.
///
/// `start_column` is the top boundary and `end_column` the bottom boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageLimits {
    pub start_line: f64,
    pub end_line: f64,
    pub start_column: f64,
    pub end_column: f64,
}

impl PageLimits {
    pub fn derive(framing: &PageFraming, spacing: &PageSpacing) -> Self {
        Self {
            start_line: framing.line_start + spacing.left,
            end_line: framing.line_end - spacing.right,
            start_column: framing.column_end - spacing.top,
            end_column: framing.column_start + spacing.bottom,
        }
    }
}

/// Size, margins, and the framing/limits derived from them for the active
/// page. Built through [`PageGeometry::new`] only, so the derived parts can
/// never drift from their inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    width: f64,
    height: f64,
    spacing: PageSpacing,
    framing: PageFraming,
    limits: PageLimits,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64, spacing: PageSpacing) -> Self {
        let framing = PageFraming::for_page(width, height);
        let limits = PageLimits::derive(&framing, &spacing);
        Self {
            width,
            height,
            spacing,
            framing,
            limits,
        }
    }

    /// Same page size with new margins (points).
    pub fn with_spacing(&self, spacing: PageSpacing) -> Self {
        Self::new(self.width, self.height, spacing)
    }

    /// Same margins on a page of a different size.
    pub fn with_size(&self, width: f64, height: f64) -> Self {
        Self::new(width, height, self.spacing)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn spacing(&self) -> &PageSpacing {
        &self.spacing
    }

    pub fn framing(&self) -> &PageFraming {
        &self.framing
    }

    pub fn limits(&self) -> &PageLimits {
        &self.limits
    }

    /// Flip a top-down column offset (points) into the bottom-origin frame.
    pub fn column_normalize(&self, column: f64) -> f64 {
        self.limits.start_column + self.spacing.top - column
    }
}
