//! Starting a collection job and waiting for it to finish.

use tokio::time::{Instant, sleep};

use super::DiagnosticsWorkflow;
use crate::application::ports::{ArtifactStore, ProgressReporter, StatusSensor, UiActionPort};
use crate::domain::policy::{
    TriggerVerdict, next_poll_delay, poll_deadline_exceeded, trigger_verdict,
};
use crate::domain::{ClickOptions, CollectionStatus, WorkflowError};

impl<U, S, A, R> DiagnosticsWorkflow<'_, U, S, A, R>
where
    U: UiActionPort,
    S: StatusSensor,
    A: ArtifactStore,
    R: ProgressReporter,
{
    /// Make sure a collection runs, then wait until the device is back in
    /// standby.
    pub(super) async fn collect(&self) -> Result<(), WorkflowError> {
        let status = match self.read_status().await? {
            CollectionStatus::Collecting => {
                self.reporter
                    .step("Collection already in progress, waiting for it to finish...");
                CollectionStatus::Collecting
            }
            CollectionStatus::Standby => {
                self.reporter.step("Status is Standby. Starting collection...");
                self.trigger().await?
            }
            CollectionStatus::Unknown => {
                tracing::warn!("collection status not recognised, trying the start control");
                self.reporter
                    .warn("Unexpected status: unknown. Attempting to start collection...");
                self.trigger().await?
            }
        };
        self.poll_until_done(status).await
    }

    /// Click the start control and report what the console shows afterwards.
    ///
    /// A click that lands but does not visibly start a job is only a warning.
    async fn trigger(&self) -> Result<CollectionStatus, WorkflowError> {
        let timings = &self.settings.config.timings;
        self.ui
            .click(
                &self.settings.config.device.collect_button,
                ClickOptions {
                    force: false,
                    timeout: timings.trigger_click(),
                },
            )
            .await
            .map_err(WorkflowError::TriggerUnavailable)?;
        sleep(timings.trigger_settle()).await;

        let status = self.read_status().await?;
        if let TriggerVerdict::SoftFailure(seen) = trigger_verdict(status) {
            tracing::warn!(status = %seen, "collection did not start after trigger");
            self.reporter.warn(&format!(
                "Status did not change to 'collecting'. Current: {seen}"
            ));
        }
        Ok(status)
    }

    /// Re-read the status at the poll interval while a collection runs.
    ///
    /// Fails once more than the collection timeout has elapsed, checked
    /// before each wait.
    async fn poll_until_done(&self, mut status: CollectionStatus) -> Result<(), WorkflowError> {
        let timeout = self.settings.collection_timeout;
        let interval = self.settings.config.timings.poll_interval();
        let started = Instant::now();

        while status == CollectionStatus::Collecting {
            let elapsed = started.elapsed();
            if poll_deadline_exceeded(elapsed, timeout) {
                return Err(WorkflowError::CollectionTimedOut { timeout });
            }
            let remaining = timeout.saturating_sub(elapsed);
            self.reporter.progress(&format!(
                "Collecting... ({}s elapsed, timeout in {}s)",
                elapsed.as_secs(),
                remaining.as_secs()
            ));
            sleep(next_poll_delay(elapsed, timeout, interval)).await;
            status = self.read_status().await?;
        }

        if status != CollectionStatus::Standby {
            return Err(WorkflowError::UnexpectedDeviceState { status });
        }
        self.reporter.success("Collection complete");
        Ok(())
    }

    async fn read_status(&self) -> Result<CollectionStatus, WorkflowError> {
        let status = self
            .sensor
            .read_status(&self.ui)
            .await
            .map_err(WorkflowError::StatusUnreadable)?;
        tracing::debug!(%status, "status read");
        Ok(status)
    }
}
