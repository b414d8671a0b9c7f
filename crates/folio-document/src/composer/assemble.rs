// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document assembly — concatenates the first page of every scratch file, in
// record order, into one clean output document.

use std::path::PathBuf;

use folio_core::ComposerConfig;
use folio_core::error::FolioError;
use tracing::{debug, instrument};

use crate::pdf::{PdfCanvas, SourceDocument};

/// Build the final document bytes from `record`. Nothing on disk is touched
/// besides reading the scratch files.
#[instrument(skip_all, fields(pages = record.len()))]
pub(crate) async fn assemble(
    record: &[PathBuf],
    config: &ComposerConfig,
) -> Result<Vec<u8>, FolioError> {
    let mut output = PdfCanvas::new(&config.pdf_version);
    for (index, path) in record.iter().enumerate() {
        let bytes = tokio::fs::read(path).await?;
        let source = SourceDocument::from_bytes(&bytes)?;
        let first = source
            .page_numbers()
            .first()
            .copied()
            .ok_or(FolioError::PageNotFound(index + 1))?;
        output.copy_page_from(&source, first)?;
        debug!(page = index + 1, path = %path.display(), "Page assembled");
    }
    output.finish(config.compress_output)
}

/// Build the final document from the serialised active page alone, for
/// documents that never left their first page.
pub(crate) fn single(page: &[u8], config: &ComposerConfig) -> Result<Vec<u8>, FolioError> {
    let source = SourceDocument::from_bytes(page)?;
    let first = source
        .page_numbers()
        .first()
        .copied()
        .ok_or(FolioError::NoPagesToSave)?;
    let mut output = PdfCanvas::new(&config.pdf_version);
    output.copy_page_from(&source, first)?;
    output.finish(config.compress_output)
}
