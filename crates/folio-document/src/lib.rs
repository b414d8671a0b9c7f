// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document — Page composition on top of lopdf.
//
// Provides the page composer (create, select, clear, remove, add, load, merge,
// save), margin-checked drawing of text, lines and rectangles in caller units,
// font metrics for standard and TrueType fonts, and the lopdf canvas the
// composer draws on.

pub mod composer;
pub mod font;
pub mod layout;
pub mod pdf;

// Re-export the primary structs so callers can use `folio_document::Composer` etc.
pub use composer::Composer;
pub use font::Font;
pub use pdf::{PdfCanvas, SourceDocument};
