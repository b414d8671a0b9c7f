// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// AFM metrics for the standard fonts, printable ASCII only (0x20..=0x7E).

use folio_core::StandardFont;

/// Glyph widths and vertical metrics in 1/1000 em.
pub(crate) struct StandardMetrics {
    pub ascender: f64,
    pub descender: f64,
    widths: &'static [u16; 95],
}

impl StandardMetrics {
    /// Width of `ch`, or `None` when the font has no glyph for it.
    pub fn width(&self, ch: char) -> Option<u16> {
        let code = ch as u32;
        if (0x20..=0x7E).contains(&code) {
            Some(self.widths[(code - 0x20) as usize])
        } else {
            None
        }
    }
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const COURIER_WIDTHS: [u16; 95] = [600; 95];

static HELVETICA: StandardMetrics = StandardMetrics {
    ascender: 718.0,
    descender: -207.0,
    widths: &HELVETICA_WIDTHS,
};

static HELVETICA_BOLD: StandardMetrics = StandardMetrics {
    ascender: 718.0,
    descender: -207.0,
    widths: &HELVETICA_BOLD_WIDTHS,
};

static COURIER: StandardMetrics = StandardMetrics {
    ascender: 629.0,
    descender: -157.0,
    widths: &COURIER_WIDTHS,
};

pub(crate) fn metrics(font: StandardFont) -> &'static StandardMetrics {
    match font {
        StandardFont::Helvetica => &HELVETICA,
        StandardFont::HelveticaBold => &HELVETICA_BOLD,
        StandardFont::Courier | StandardFont::CourierBold => &COURIER,
    }
}
