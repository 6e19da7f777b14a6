//! Diagnostics bundle metadata and pure helpers around it.
//!
//! This module is intentionally free of I/O, async, and external layer imports.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One row extracted from the device's file table, as rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawFileRow {
    pub name: String,
    #[serde(default)]
    pub size: Option<String>,
}

/// The generated bundle once it is visible in the device's file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsArtifact {
    /// Server-assigned file name, contains the bundle marker token.
    pub name: String,
    /// Size reported by the file table, `None` when the cell is not numeric.
    pub size_bytes: Option<u64>,
}

impl DiagnosticsArtifact {
    /// Build artifact metadata from a table row if its name carries `marker`.
    #[must_use]
    pub fn from_row(row: &RawFileRow, marker: &str) -> Option<Self> {
        let name = row.name.trim();
        if marker.is_empty() || !name.contains(marker) {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            size_bytes: row.size.as_deref().and_then(parse_reported_size),
        })
    }

    /// Human-readable size for progress lines, e.g. `"50.0 MB"`.
    #[must_use]
    pub fn size_display(&self) -> String {
        self.size_bytes
            .map_or_else(|| "size unknown".to_string(), |b| format!("{} MB", megabytes(b)))
    }
}

/// A completed transfer staged by the UI adapter, not yet in the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// File name suggested by the device for the download.
    pub suggested_name: String,
    /// Where the adapter staged the completed bytes.
    pub staged_path: PathBuf,
}

/// Parse a size cell such as `"52428800"` or `"52,428,800"`.
#[must_use]
pub fn parse_reported_size(cell: &str) -> Option<u64> {
    let digits: String = cell
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '_')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Format a byte count as megabytes with one decimal, e.g. `52428800` → `"50.0"`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn megabytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / (1024.0 * 1024.0))
}

/// Reduce a device-suggested download name to a plain file name.
///
/// Any directory components are dropped. Falls back to `fallback` when
/// nothing usable remains.
#[must_use]
pub fn destination_file_name(suggested: &str, fallback: &str) -> String {
    let candidate = suggested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if candidate.is_empty() || candidate == "." || candidate == ".." {
        return fallback.to_string();
    }
    Path::new(candidate)
        .file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| fallback.to_string(), str::to_string)
}
