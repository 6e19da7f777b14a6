//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::time::Duration;

use thiserror::Error;

use crate::domain::outcome::ReasonCode;
use crate::domain::status::CollectionStatus;

// ── UI collaborator errors ────────────────────────────────────────────────────

/// Failures reported by a `UiActionPort` implementation.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("page {address} did not load within {}s", .timeout.as_secs())]
    Navigation { address: String, timeout: Duration },

    #[error("element {selector} not found within {}ms", .timeout.as_millis())]
    ElementNotFound { selector: String, timeout: Duration },

    #[error("download did not complete within {}s", .0.as_secs())]
    DownloadTimeout(Duration),

    #[error("page script failed: {0}")]
    Script(String),

    #[error("browser driver error: {0}")]
    Driver(String),
}

// ── Workflow errors ───────────────────────────────────────────────────────────

/// Terminal failures of the diagnostics workflow, one per reason code.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Login failed. Please check username/password.")]
    AuthenticationRejected,

    #[error("Login page could not be used: {0}")]
    LoginUnavailable(#[source] UiError),

    #[error("Failed to navigate to Diagnostics page.")]
    NavigationFailed,

    #[error("Failed to navigate to Diagnostics page: {0}")]
    MenuUnavailable(#[source] UiError),

    #[error("Collection timed out after {} seconds.", .timeout.as_secs())]
    CollectionTimedOut { timeout: Duration },

    #[error("Unexpected status: {status}")]
    UnexpectedDeviceState { status: CollectionStatus },

    #[error("Could not find the collection trigger control: {0}")]
    TriggerUnavailable(#[source] UiError),

    #[error("No diagnostics file found in the file list.")]
    ArtifactNotFound,

    #[error("Could not read the file list: {0}")]
    FileListUnreadable(#[source] UiError),

    #[error("Download timed out: {0}")]
    DownloadTimedOut(#[source] UiError),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Device status could not be read: {0}")]
    StatusUnreadable(#[source] UiError),
}

impl WorkflowError {
    /// Reason code surfaced to the caller for this failure.
    #[must_use]
    pub fn reason(&self) -> ReasonCode {
        match self {
            Self::AuthenticationRejected | Self::LoginUnavailable(_) => {
                ReasonCode::AuthenticationFailed
            }
            Self::NavigationFailed | Self::MenuUnavailable(_) => ReasonCode::NavigationFailed,
            Self::CollectionTimedOut { .. } => ReasonCode::CollectionTimedOut,
            Self::UnexpectedDeviceState { .. }
            | Self::TriggerUnavailable(_)
            | Self::StatusUnreadable(_) => ReasonCode::UnexpectedDeviceState,
            Self::ArtifactNotFound | Self::FileListUnreadable(_) => ReasonCode::ArtifactNotFound,
            Self::DownloadTimedOut(_) => ReasonCode::DownloadTimedOut,
            Self::DownloadFailed(_) => ReasonCode::DownloadFailed,
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: must not be empty")]
    EmptyValue { key: &'static str },

    #[error("Invalid value for {key}: must be greater than zero")]
    ZeroDuration { key: &'static str },

    #[error("Invalid file table layout: cell {index} is outside the {min_cells} required cells")]
    CellOutOfRange { index: usize, min_cells: usize },
}

// ── Session errors ────────────────────────────────────────────────────────────

/// Errors raised while building a device session from user input.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Device address must not be empty.")]
    EmptyAddress,

    #[error("Username and password must not be empty.")]
    MissingCredentials,
}
