// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scratch storage — one single-page PDF file per finished page, kept in
// document order until assembly.
//
// Files are named `<prefix>.pdfpart<N>`. The prefix is ten random hex chars
// per composer instance. N is a per-instance serial that matches the page
// index until a page in the middle is removed; after that the record order,
// not the file name, defines the page order.

use std::path::{Path, PathBuf};

use folio_core::error::FolioError;
use tracing::{debug, warn};
use uuid::Uuid;

pub(crate) struct ScratchStore {
    dir: PathBuf,
    prefix: String,
    /// Scratch file per page, in document order. Index 0 is page 1.
    record: Vec<PathBuf>,
    next_serial: usize,
}

impl ScratchStore {
    /// Prepare `dir` (created if absent) with a fresh random prefix.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, FolioError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        let prefix = hex::encode(&Uuid::new_v4().as_bytes()[..5]);
        debug!(dir = %dir.display(), %prefix, "Scratch store ready");
        Ok(Self {
            dir,
            prefix,
            record: Vec::new(),
            next_serial: 1,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Scratch files in document order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.record
    }

    /// Persist page `index` (1-based). An existing slot is overwritten in
    /// place; the slot directly after the last one is appended.
    pub async fn store(&mut self, index: usize, bytes: &[u8]) -> Result<(), FolioError> {
        if index == 0 || index > self.record.len() + 1 {
            return Err(FolioError::PageNotFound(index));
        }
        if index <= self.record.len() {
            let path = &self.record[index - 1];
            tokio::fs::write(path, bytes).await?;
            debug!(index, path = %path.display(), "Scratch page overwritten");
        } else {
            let path = self
                .dir
                .join(format!("{}.pdfpart{}", self.prefix, self.next_serial));
            tokio::fs::write(&path, bytes).await?;
            debug!(index, path = %path.display(), "Scratch page appended");
            self.next_serial += 1;
            self.record.push(path);
        }
        Ok(())
    }

    /// Read page `index` (1-based) back from disk.
    pub async fn load(&self, index: usize) -> Result<Vec<u8>, FolioError> {
        let path = self.slot(index)?;
        Ok(tokio::fs::read(path).await?)
    }

    /// Delete page `index` (1-based) and drop it from the record.
    pub async fn remove(&mut self, index: usize) -> Result<(), FolioError> {
        let path = self.slot(index)?.to_path_buf();
        tokio::fs::remove_file(&path).await?;
        self.record.remove(index - 1);
        debug!(index, path = %path.display(), "Scratch page removed");
        Ok(())
    }

    /// Delete every scratch file still on disk, then clear the record.
    pub async fn purge(&mut self) -> Result<(), FolioError> {
        for path in &self.record {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    warn!(path = %path.display(), "Scratch file already gone");
                }
                Err(err) => return Err(err.into()),
            }
        }
        self.record.clear();
        Ok(())
    }

    fn slot(&self, index: usize) -> Result<&Path, FolioError> {
        index
            .checked_sub(1)
            .and_then(|i| self.record.get(i))
            .map(PathBuf::as_path)
            .ok_or(FolioError::PageNotFound(index))
    }
}
