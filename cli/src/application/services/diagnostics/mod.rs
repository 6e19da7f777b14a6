//! Application service: diagnostics bundle collection use-case.
//!
//! Drives a device console from login to a downloaded bundle:
//! authenticate, open the diagnostics view, start or join a collection,
//! poll until it finishes, then locate and download the bundle.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

mod auth;
mod collection;
mod navigate;
mod retrieval;
mod sensor;

use std::path::PathBuf;
use std::time::Duration;

use crate::application::ports::{ArtifactStore, ProgressReporter, StatusSensor, UiActionPort};
use crate::domain::{DiagpullConfig, Session, WorkflowError, WorkflowOutcome};

pub use sensor::TextMarkerSensor;

/// Screenshot written when the diagnostics view cannot be reached.
pub const NAVIGATION_SCREENSHOT: &str = "error_nav.png";
/// Screenshot written when no bundle shows up in the file list.
pub const MISSING_FILE_SCREENSHOT: &str = "error_nofile.png";

/// Per-run inputs of the workflow.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub session: Session,
    /// Directory that receives the bundle and any failure screenshots.
    pub output_dir: PathBuf,
    /// Upper bound on time spent waiting for the collection to finish.
    pub collection_timeout: Duration,
    pub config: DiagpullConfig,
}

/// A bundle that made it to disk.
#[derive(Debug)]
struct SavedArtifact {
    path: PathBuf,
    size_bytes: u64,
}

/// One run of the collection workflow against one device.
///
/// Owns the UI session for the duration of the run and closes it on every
/// exit path.
pub struct DiagnosticsWorkflow<'a, U, S, A, R> {
    ui: U,
    sensor: &'a S,
    store: &'a A,
    reporter: &'a R,
    settings: WorkflowSettings,
}

impl<'a, U, S, A, R> DiagnosticsWorkflow<'a, U, S, A, R>
where
    U: UiActionPort,
    S: StatusSensor,
    A: ArtifactStore,
    R: ProgressReporter,
{
    pub fn new(
        ui: U,
        sensor: &'a S,
        store: &'a A,
        reporter: &'a R,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            ui,
            sensor,
            store,
            reporter,
            settings,
        }
    }

    /// Run every phase in order and close the UI session.
    ///
    /// Never returns an error: phase failures are reported once and folded
    /// into [`WorkflowOutcome::Failure`].
    pub async fn run(self) -> WorkflowOutcome {
        let result = self.execute().await;
        self.ui.close().await;
        match result {
            Ok(saved) => {
                tracing::debug!(path = %saved.path.display(), size = saved.size_bytes, "workflow finished");
                WorkflowOutcome::Success {
                    path: saved.path,
                    size_bytes: saved.size_bytes,
                }
            }
            Err(err) => {
                let reason = err.reason();
                tracing::debug!(%reason, error = ?err, "workflow failed");
                self.reporter.error(&err.to_string());
                WorkflowOutcome::Failure(reason)
            }
        }
    }

    async fn execute(&self) -> Result<SavedArtifact, WorkflowError> {
        tracing::debug!(address = self.settings.session.base_address(), "authenticating");
        self.authenticate().await?;
        tracing::debug!("navigating to diagnostics view");
        self.open_diagnostics().await?;
        tracing::debug!("inspecting collection status");
        self.collect().await?;
        tracing::debug!("locating artifact");
        let artifact = self.locate_artifact().await?;
        tracing::debug!(name = %artifact.name, "downloading artifact");
        self.download(&artifact).await
    }

    /// Best-effort page capture into the output directory.
    async fn capture(&self, file_name: &str) {
        let path = self.settings.output_dir.join(file_name);
        self.ui.screenshot(&path).await;
        self.reporter
            .warn(&format!("Page captured to {}", path.display()));
    }
}
