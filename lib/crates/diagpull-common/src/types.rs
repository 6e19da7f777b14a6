use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a collection run ended without a downloaded bundle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Credentials rejected, or the login page was still active after the bound.
    AuthenticationFailed,
    /// The diagnostics view was never reached.
    NavigationFailed,
    /// The device was still collecting when the polling bound ran out.
    CollectionTimedOut,
    /// The console showed a status the workflow cannot act on.
    UnexpectedDeviceState,
    /// No file carrying the bundle marker was listed after collection.
    ArtifactNotFound,
    /// The transfer did not complete within the download bound.
    DownloadTimedOut,
    /// Selecting, transferring or saving the bundle failed.
    DownloadFailed,
}

impl ReasonCode {
    /// Stable machine-readable identifier, identical to the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::NavigationFailed => "navigation_failed",
            Self::CollectionTimedOut => "collection_timed_out",
            Self::UnexpectedDeviceState => "unexpected_device_state",
            Self::ArtifactNotFound => "artifact_not_found",
            Self::DownloadTimedOut => "download_timed_out",
            Self::DownloadFailed => "download_failed",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal status of a run as reported to machines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failure,
}

/// `--json` output of a single collection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
    pub elapsed_seconds: u64,
    pub finished_at: DateTime<Utc>,
}
