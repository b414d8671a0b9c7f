// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font metrics and text encoding.
//
// Standard fonts are measured from built-in AFM tables and encoded as single
// bytes. Custom TrueType/OpenType fonts are measured with `ttf-parser` and
// encoded as two-byte glyph ids (Identity-H).

pub(crate) mod standard;

use std::sync::Arc;

use folio_core::error::FolioError;
use folio_core::{FontSource, StandardFont};
use sha2::{Digest, Sha256};
use ttf_parser::{Face, GlyphId};

use self::standard::StandardMetrics;

/// A loaded font: its source plus the metrics needed for layout.
#[derive(Clone)]
pub struct Font {
    source: FontSource,
    kind: FontKind,
}

#[derive(Clone)]
enum FontKind {
    Standard {
        font: StandardFont,
        metrics: &'static StandardMetrics,
    },
    Custom {
        data: Arc<Vec<u8>>,
        units_per_em: f64,
        ascender: f64,
        descender: f64,
        key: String,
    },
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font").field("key", &self.key()).finish()
    }
}

impl Font {
    /// Load metrics for `source`. Custom font bytes are parsed here, so an
    /// invalid file fails early.
    pub fn load(source: FontSource) -> Result<Self, FolioError> {
        let kind = match &source {
            FontSource::Standard(font) => FontKind::Standard {
                font: *font,
                metrics: standard::metrics(*font),
            },
            FontSource::Custom(data) => {
                let face = Face::parse(data, 0)
                    .map_err(|err| FolioError::Font(format!("failed to parse font: {err}")))?;
                let digest = Sha256::digest(data.as_slice());
                FontKind::Custom {
                    units_per_em: face.units_per_em() as f64,
                    ascender: face.ascender() as f64,
                    descender: face.descender() as f64,
                    key: format!("Folio-{}", hex::encode(&digest[..6])),
                    data: Arc::clone(data),
                }
            }
        };
        Ok(Self { source, kind })
    }

    /// Load a font from raw TrueType/OpenType bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FolioError> {
        Self::load(FontSource::Custom(Arc::new(bytes)))
    }

    pub fn standard(font: StandardFont) -> Self {
        Self {
            source: FontSource::Standard(font),
            kind: FontKind::Standard {
                font,
                metrics: standard::metrics(font),
            },
        }
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    /// Stable identity used to embed each font once per document. For
    /// custom fonts this is derived from a hash of the file.
    pub fn key(&self) -> &str {
        match &self.kind {
            FontKind::Standard { font, .. } => font.base_name(),
            FontKind::Custom { key, .. } => key,
        }
    }

    /// Line height (ascent to descent) at `size` points.
    pub fn height_at_size(&self, size: f64) -> f64 {
        let (ascender, descender) = self.vertical_metrics();
        (ascender - descender) * size
    }

    /// Depth of the descender below the baseline at `size`, as a positive
    /// number.
    pub fn descent_at_size(&self, size: f64) -> f64 {
        -self.vertical_metrics().1 * size
    }

    /// Advance width of `text` at `size` points.
    pub fn width_of_text_at_size(&self, text: &str, size: f64) -> Result<f64, FolioError> {
        let units = match &self.kind {
            FontKind::Standard { font, metrics } => {
                let mut total = 0u32;
                for ch in text.chars() {
                    let width = metrics.width(ch).ok_or_else(|| unencodable(ch, *font))?;
                    total += width as u32;
                }
                total as f64 / 1000.0
            }
            FontKind::Custom {
                data, units_per_em, ..
            } => {
                let face = parse_face(data)?;
                let total: u32 = text
                    .chars()
                    .map(|ch| {
                        let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
                        face.glyph_hor_advance(glyph).unwrap_or(0) as u32
                    })
                    .sum();
                total as f64 / units_per_em
            }
        };
        Ok(units * size)
    }

    /// Encode `text` as the bytes of a PDF string operand for this font.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, FolioError> {
        match &self.kind {
            FontKind::Standard { font, metrics } => text
                .chars()
                .map(|ch| match metrics.width(ch) {
                    Some(_) => Ok(ch as u8),
                    None => Err(unencodable(ch, *font)),
                })
                .collect(),
            FontKind::Custom { data, .. } => {
                let face = parse_face(data)?;
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
                    bytes.extend_from_slice(&glyph.0.to_be_bytes());
                }
                Ok(bytes)
            }
        }
    }

    /// Raw font file bytes, for custom fonts.
    pub(crate) fn custom_data(&self) -> Option<&Arc<Vec<u8>>> {
        match &self.kind {
            FontKind::Custom { data, .. } => Some(data),
            FontKind::Standard { .. } => None,
        }
    }

    /// (ascender, descender) as fractions of the em.
    fn vertical_metrics(&self) -> (f64, f64) {
        match &self.kind {
            FontKind::Standard { metrics, .. } => {
                (metrics.ascender / 1000.0, metrics.descender / 1000.0)
            }
            FontKind::Custom {
                units_per_em,
                ascender,
                descender,
                ..
            } => (ascender / units_per_em, descender / units_per_em),
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::standard(StandardFont::default())
    }
}

pub(crate) fn parse_face(data: &[u8]) -> Result<Face<'_>, FolioError> {
    Face::parse(data, 0).map_err(|err| FolioError::Font(format!("failed to parse font: {err}")))
}

fn unencodable(ch: char, font: StandardFont) -> FolioError {
    FolioError::Font(format!(
        "character {ch:?} cannot be encoded in {}; use a custom font",
        font.base_name()
    ))
}
