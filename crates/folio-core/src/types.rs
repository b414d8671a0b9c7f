// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Folio page composition.

use serde::{Deserialize, Serialize};

use crate::units::{self, Unit};

/// A caller-facing position in the document's current unit.
///
/// `line` is the horizontal offset from the left page edge. `column` is the
/// vertical offset measured from the top page edge; it is flipped into PDF's
/// bottom-origin frame during normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: f64,
    pub column: f64,
}

impl Position {
    pub fn new(line: f64, column: f64) -> Self {
        Self { line, column }
    }
}

/// Page margins. Caller-facing values are in the document unit; the composer
/// keeps them in points once normalised.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageSpacing {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
}

impl PageSpacing {
    /// The same margin on all four sides.
    pub fn uniform(margin: f64) -> Self {
        Self {
            top: margin,
            bottom: margin,
            left: margin,
            right: margin,
        }
    }

    /// Convert every side from `unit` to points.
    pub fn to_points(&self, unit: Unit) -> Self {
        Self {
            top: units::to_points(unit, self.top),
            bottom: units::to_points(unit, self.bottom),
            left: units::to_points(unit, self.left),
            right: units::to_points(unit, self.right),
        }
    }
}

/// Horizontal alignment of text relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl PaperSize {
    /// Portrait dimensions in points (width, height).
    pub fn dimensions_pt(&self) -> (f64, f64) {
        match self {
            Self::A4 => (595.28, 841.89),
            Self::A3 => (841.89, 1190.55),
            Self::A5 => (419.53, 595.28),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Tabloid => (792.0, 1224.0),
        }
    }
}

/// Requested page size: a named paper or explicit dimensions in the
/// document unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageSize {
    Paper(PaperSize),
    Custom { line: f64, column: f64 },
}

impl Default for PageSize {
    fn default() -> Self {
        Self::Paper(PaperSize::A4)
    }
}

impl PageSize {
    /// Resolve to portrait-as-given (width, height) in points.
    ///
    /// Custom sizes with a non-positive or non-finite side fall back to A4.
    pub fn resolve(&self, unit: Unit) -> (f64, f64) {
        match self {
            Self::Paper(paper) => paper.dimensions_pt(),
            Self::Custom { line, column } => {
                let width = units::to_points(unit, *line);
                let height = units::to_points(unit, *column);
                if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
                    (width, height)
                } else {
                    PaperSize::A4.dimensions_pt()
                }
            }
        }
    }

    /// Resolve and apply `orientation`. Landscape puts the longer side
    /// horizontally by swapping width and height.
    pub fn resolve_oriented(&self, unit: Unit, orientation: Orientation) -> (f64, f64) {
        let (width, height) = self.resolve(unit);
        match orientation {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        }
    }
}

/// RGBA colour with every component in `[0, 1]`.
///
/// Deserialised values are clamped the same way [`Rgba::new`] clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRgba")]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Wire form of [`Rgba`] before clamping.
#[derive(Deserialize)]
struct RawRgba {
    r: f64,
    g: f64,
    b: f64,
    #[serde(default = "opaque")]
    a: f64,
}

impl From<RawRgba> for Rgba {
    fn from(raw: RawRgba) -> Self {
        Self::new(raw.r, raw.g, raw.b, raw.a)
    }
}

fn opaque() -> f64 {
    1.0
}

/// NaN counts as 0.
fn unit_interval(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl Rgba {
    /// Create a colour, clamping each component into `[0, 1]`.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: unit_interval(r),
            g: unit_interval(g),
            b: unit_interval(b),
            a: unit_interval(a),
        }
    }

    /// Opaque colour.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Colour from 0-255 channels, opaque.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Same colour with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

/// Area fill for shapes. `None` leaves the interior unpainted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    #[default]
    None,
    Color(Rgba),
}

/// Stroke style for rectangle borders.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    /// Dash and gap lengths in the document unit.
    Dashed { dash: f64, gap: f64 },
}
