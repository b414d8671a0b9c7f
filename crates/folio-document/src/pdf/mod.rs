// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — the lopdf-backed page canvas, page copying, and font
// embedding.

pub mod canvas;
mod copy;
mod embed;

pub use canvas::{PdfCanvas, SourceDocument, Stroke};

use folio_core::error::FolioError;

/// Wrap a lopdf error with a short description of what was being done.
pub(crate) fn pdf_error(context: &'static str) -> impl Fn(lopdf::Error) -> FolioError {
    move |err| FolioError::Pdf(format!("{context}: {err}"))
}
