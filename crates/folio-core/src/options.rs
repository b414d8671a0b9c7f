// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caller-facing options for document/page creation and drawing calls.
//
// Every field is optional; the composer falls back independently per field to
// the settings of the previous page or to the documented default.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{Alignment, BorderStyle, Fill, Orientation, PageSize, PageSpacing, Position, Rgba};
use crate::units::Unit;

/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 7.5;

/// The standard PDF fonts with built-in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StandardFont {
    #[default]
    Helvetica,
    #[serde(rename = "Helvetica-Bold")]
    HelveticaBold,
    Courier,
    #[serde(rename = "Courier-Bold")]
    CourierBold,
}

impl StandardFont {
    /// PostScript base font name.
    pub fn base_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
        }
    }
}

/// Where a font comes from: one of the standard fonts, or the raw bytes of a
/// TrueType/OpenType file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FontSource {
    Standard(StandardFont),
    #[serde(skip)]
    Custom(Arc<Vec<u8>>),
}

impl Default for FontSource {
    fn default() -> Self {
        Self::Standard(StandardFont::default())
    }
}

impl From<StandardFont> for FontSource {
    fn from(font: StandardFont) -> Self {
        Self::Standard(font)
    }
}

/// Options for `create` and `add_page`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentOptions {
    pub unit: Option<Unit>,
    pub orientation: Option<Orientation>,
    pub page_size: Option<PageSize>,
    pub page_spacing: Option<PageSpacing>,
    pub font: Option<FontSource>,
    pub font_size: Option<f64>,
    pub font_color: Option<Rgba>,
}

impl DocumentOptions {
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_page_spacing(mut self, spacing: PageSpacing) -> Self {
        self.page_spacing = Some(spacing);
        self
    }

    pub fn with_font(mut self, font: impl Into<FontSource>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_font_color(mut self, color: Rgba) -> Self {
        self.font_color = Some(color);
        self
    }
}

/// Options for a single `write_text` call. Font size is in points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOptions {
    pub position: Position,
    pub align: Alignment,
    pub font_size: Option<f64>,
    pub font: Option<FontSource>,
    pub color: Option<Rgba>,
}

impl TextOptions {
    pub fn at(line: f64, column: f64) -> Self {
        Self {
            position: Position::new(line, column),
            ..Self::default()
        }
    }

    pub fn aligned(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn sized(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn colored(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }
}

/// Options for `write_line`. Thickness is in the document unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineOptions {
    pub start: Position,
    pub end: Position,
    pub thickness: Option<f64>,
    pub color: Option<Rgba>,
}

/// Options for `write_rectangle`. `position` is the top-left corner; width,
/// height and border width are in the document unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RectangleOptions {
    pub position: Position,
    pub width: f64,
    pub height: f64,
    pub fill: Fill,
    pub border_color: Option<Rgba>,
    pub border_width: Option<f64>,
    pub border_style: BorderStyle,
}
