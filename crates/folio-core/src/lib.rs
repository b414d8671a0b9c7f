// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — Core types, unit conversion, page geometry, and error definitions
// shared by the document composer.

pub mod align;
pub mod config;
pub mod error;
pub mod geometry;
pub mod human_errors;
pub mod options;
pub mod types;
pub mod units;

pub use config::ComposerConfig;
pub use error::{FolioError, Result};
pub use geometry::{PageFraming, PageGeometry, PageLimits};
pub use options::*;
pub use types::*;
pub use units::Unit;
