//! Collection status as shown by the device console.
//!
//! This module is intentionally free of I/O, async, and external layer imports.

use std::fmt;

use serde::Serialize;

/// Job state read from the live diagnostics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    /// No collection running; the start control is available.
    Standby,
    /// A collection job is in progress on the device.
    Collecting,
    /// Neither marker was found on the page.
    Unknown,
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standby => "standby",
            Self::Collecting => "collecting",
            Self::Unknown => "unknown",
        })
    }
}

/// Text markers that identify each status in rendered page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMarkers<'a> {
    pub collecting: &'a str,
    pub standby: &'a str,
}

/// Classify rendered body text.
///
/// The collecting marker wins over the standby marker when both are present.
/// Empty markers never match.
#[must_use]
pub fn classify(body_text: &str, markers: &StatusMarkers<'_>) -> CollectionStatus {
    if contains_marker(body_text, markers.collecting) {
        return CollectionStatus::Collecting;
    }
    if contains_marker(body_text, markers.standby) {
        return CollectionStatus::Standby;
    }
    CollectionStatus::Unknown
}

fn contains_marker(text: &str, marker: &str) -> bool {
    !marker.is_empty() && text.contains(marker)
}
