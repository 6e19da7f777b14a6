//! Finding the generated bundle in the file list and downloading it.

use tokio::time::sleep;

use super::{DiagnosticsWorkflow, MISSING_FILE_SCREENSHOT, SavedArtifact};
use crate::application::ports::{ArtifactStore, ProgressReporter, StatusSensor, UiActionPort};
use crate::domain::artifact::{destination_file_name, megabytes};
use crate::domain::{ClickOptions, DiagnosticsArtifact, UiError, WorkflowError};

impl<U, S, A, R> DiagnosticsWorkflow<'_, U, S, A, R>
where
    U: UiActionPort,
    S: StatusSensor,
    A: ArtifactStore,
    R: ProgressReporter,
{
    /// First file-table row whose name carries the bundle marker.
    pub(super) async fn locate_artifact(&self) -> Result<DiagnosticsArtifact, WorkflowError> {
        let device = &self.settings.config.device;
        sleep(self.settings.config.timings.artifact_settle()).await;

        let row = match self.ui.evaluate_structured(&device.artifact_query()).await {
            Ok(row) => row,
            Err(e) => {
                self.capture(MISSING_FILE_SCREENSHOT).await;
                return Err(WorkflowError::FileListUnreadable(e));
            }
        };
        let Some(artifact) = row
            .as_ref()
            .and_then(|row| DiagnosticsArtifact::from_row(row, &device.artifact_marker))
        else {
            self.capture(MISSING_FILE_SCREENSHOT).await;
            return Err(WorkflowError::ArtifactNotFound);
        };

        self.reporter.success(&format!(
            "File ready: {} ({})",
            artifact.name,
            artifact.size_display()
        ));
        Ok(artifact)
    }

    /// Select the bundle's row, download it and move it into the output directory.
    pub(super) async fn download(
        &self,
        artifact: &DiagnosticsArtifact,
    ) -> Result<SavedArtifact, WorkflowError> {
        let timings = &self.settings.config.timings;
        let device = &self.settings.config.device;

        self.ui
            .click(
                &device.artifact_checkbox(&artifact.name),
                ClickOptions {
                    force: true,
                    timeout: timings.menu_click(),
                },
            )
            .await
            .map_err(|e| {
                WorkflowError::DownloadFailed(format!("could not select {}: {e}", artifact.name))
            })?;
        sleep(timings.selection_settle()).await;

        self.reporter.step("Downloading...");
        let staged = self
            .ui
            .await_download(
                &device.download_button,
                ClickOptions {
                    force: false,
                    timeout: timings.menu_click(),
                },
                timings.download(),
            )
            .await
            .map_err(|e| match e {
                UiError::DownloadTimeout(_) => WorkflowError::DownloadTimedOut(e),
                other => WorkflowError::DownloadFailed(other.to_string()),
            })?;

        let file_name = destination_file_name(&staged.suggested_name, &artifact.name);
        let path = self
            .store
            .persist(&staged, &self.settings.output_dir, &file_name)
            .await
            .map_err(|e| WorkflowError::DownloadFailed(format!("{e:#}")))?;
        self.reporter
            .success(&format!("Download complete: {}", path.display()));

        let size_bytes = self
            .store
            .file_size(&path)
            .await
            .map_err(|e| WorkflowError::DownloadFailed(format!("{e:#}")))?;
        self.reporter
            .step(&format!("File size: {} MB", megabytes(size_bytes)));

        Ok(SavedArtifact { path, size_bytes })
    }
}
