//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

use crate::domain::{
    ClickOptions, CollectionStatus, DiagpullConfig, DownloadedFile, RawFileRow, RowQuery,
    Selector, UiError,
};

// ── Config Store Port ─────────────────────────────────────────────────────────

/// Abstracts configuration loading.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file is present.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read, parsed or validated.
    fn load(&self) -> Result<DiagpullConfig>;
    /// Path the configuration is read from.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

// ── Browser UI Port ───────────────────────────────────────────────────────────

/// Capabilities the workflow needs from a rendered, stateful web console.
///
/// Every wait is bounded by the timeout passed in; implementations must not
/// block indefinitely.
#[allow(async_fn_in_trait)]
pub trait UiActionPort {
    /// Load `address`, failing with `UiError::Navigation` past `timeout`.
    async fn open(&self, address: &str, timeout: Duration) -> Result<(), UiError>;
    /// Wait for `selector` to match, failing with `UiError::ElementNotFound` past `timeout`.
    async fn wait_for_element(&self, selector: &Selector, timeout: Duration) -> Result<(), UiError>;
    /// Replace the value of a form field.
    async fn fill_field(&self, selector: &Selector, value: &str) -> Result<(), UiError>;
    /// Click an element, waiting up to `options.timeout` for it to appear.
    async fn click(&self, selector: &Selector, options: ClickOptions) -> Result<(), UiError>;
    /// Address of the page currently shown.
    async fn current_address(&self) -> Result<String, UiError>;
    /// Full rendered text of the page body.
    async fn body_text(&self) -> Result<String, UiError>;
    /// Run a structured row extraction; at most one match.
    async fn evaluate_structured(&self, query: &RowQuery) -> Result<Option<RawFileRow>, UiError>;
    /// Click `trigger` (bounded by `click`) with a download listener armed and
    /// wait for the transfer to complete, failing with
    /// `UiError::DownloadTimeout` once the transfer outlasts `timeout`.
    async fn await_download(
        &self,
        trigger: &Selector,
        click: ClickOptions,
        timeout: Duration,
    ) -> Result<DownloadedFile, UiError>;
    /// Best-effort capture of the current page; failures are ignored.
    async fn screenshot(&self, path: &Path);
    /// Tear down the session. Calling it more than once is harmless.
    async fn close(&self);
}

// ── Status Sensor Port ────────────────────────────────────────────────────────

/// Reads the device's collection job state.
#[allow(async_fn_in_trait)]
pub trait StatusSensor {
    /// Sense the current status through `ui`.
    async fn read_status(&self, ui: &impl UiActionPort) -> Result<CollectionStatus, UiError>;
}

// ── Artifact Storage Port ─────────────────────────────────────────────────────

/// Moves completed downloads into their final location.
#[allow(async_fn_in_trait)]
pub trait ArtifactStore {
    /// Move `download` into `output_dir` as `file_name` and return the final path.
    ///
    /// The file appears at the final path only once fully written.
    async fn persist(
        &self,
        download: &DownloadedFile,
        output_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf>;
    /// On-disk size of a persisted file.
    async fn file_size(&self, path: &Path) -> Result<u64>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a periodic update that replaces the previous one where possible.
    fn progress(&self, message: &str) {
        self.step(message);
    }
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an error message.
    fn error(&self, message: &str);
}
