//! Menu navigation to the diagnostics view.

use tokio::time::sleep;

use super::{DiagnosticsWorkflow, NAVIGATION_SCREENSHOT};
use crate::application::ports::{ArtifactStore, ProgressReporter, StatusSensor, UiActionPort};
use crate::domain::policy::address_matches;
use crate::domain::{ClickOptions, UiError, WorkflowError};

impl<U, S, A, R> DiagnosticsWorkflow<'_, U, S, A, R>
where
    U: UiActionPort,
    S: StatusSensor,
    A: ArtifactStore,
    R: ProgressReporter,
{
    pub(super) async fn open_diagnostics(&self) -> Result<(), WorkflowError> {
        self.reporter.step("Navigating to Diagnostics...");

        let address = match self.walk_menus().await {
            Ok(address) => address,
            Err(err) => {
                self.capture(NAVIGATION_SCREENSHOT).await;
                return Err(WorkflowError::MenuUnavailable(err));
            }
        };

        if !address_matches(&address, &self.settings.config.device.diagnostics_address) {
            tracing::debug!(%address, "diagnostics view not reached");
            self.capture(NAVIGATION_SCREENSHOT).await;
            return Err(WorkflowError::NavigationFailed);
        }

        self.reporter.success("On Diagnostics page");
        Ok(())
    }

    /// Click through section and sub-section, returning the address reached.
    async fn walk_menus(&self) -> Result<String, UiError> {
        let timings = &self.settings.config.timings;
        let device = &self.settings.config.device;
        let click = ClickOptions {
            force: false,
            timeout: timings.menu_click(),
        };

        self.ui.click(&device.section_menu, click).await?;
        sleep(timings.section_settle()).await;
        self.ui.click(&device.diagnostics_menu, click).await?;
        sleep(timings.subsection_settle()).await;
        self.ui.current_address().await
    }
}
