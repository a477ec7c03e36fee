//! JSON export to the output directory.
//!
//! Writes any serializable structure as human-readable, 2-space-indented
//! UTF-8 JSON. `serde_json` leaves non-ASCII characters unescaped, so titles
//! and author names survive verbatim. Filesystem errors propagate; nothing
//! here is retried.

use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Exporter bound to one output directory.
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    /// Create an exporter, creating the output directory if absent.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Directory all exports are written into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `data` as indented JSON to `filename` inside the output
    /// directory, returning the full path written.
    pub fn export<T: Serialize>(&self, data: &T, filename: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(filename);
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&path, json)?;
        info!(path = %path.display(), "Exported JSON file");
        Ok(path)
    }
}
