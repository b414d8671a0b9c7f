// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Composer configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the scratch subdirectory under the platform temp location.
pub const SCRATCH_SUBDIR: &str = "folio-scratch";

/// Settings that apply to a composer instance for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Where finished pages are parked until assembly. `None` uses
    /// `<temp>/folio-scratch`.
    pub scratch_dir: Option<PathBuf>,
    /// PDF header version written into every document.
    pub pdf_version: String,
    /// Compress content streams of the final assembled file.
    pub compress_output: bool,
}

impl ComposerConfig {
    /// Scratch directory to use, resolving the default.
    pub fn resolved_scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(SCRATCH_SUBDIR))
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            pdf_version: "1.7".to_string(),
            compress_output: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scratch_dir_is_under_temp() {
        let config = ComposerConfig::default();
        assert_eq!(
            config.resolved_scratch_dir(),
            std::env::temp_dir().join(SCRATCH_SUBDIR)
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ComposerConfig::from_json(r#"{ "scratch_dir": "/var/tmp/x" }"#)
            .expect("parse config");
        assert_eq!(config.resolved_scratch_dir(), PathBuf::from("/var/tmp/x"));
        assert_eq!(config.pdf_version, "1.7");
        assert!(config.compress_output);
    }
}
