// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Horizontal alignment resolution.

use crate::types::Alignment;

/// Shift `anchor` so content of width `extent` sits at the requested
/// alignment. Only meaningful on the horizontal axis.
pub fn resolve(align: Alignment, anchor: f64, extent: f64) -> f64 {
    match align {
        Alignment::Left => anchor,
        Alignment::Center => anchor - extent / 2.0,
        Alignment::Right => anchor - extent,
    }
}
