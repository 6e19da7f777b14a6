//! Login phase.

use std::time::Duration;

use tokio::time::{Instant, sleep};

use super::DiagnosticsWorkflow;
use crate::application::ports::{ArtifactStore, ProgressReporter, StatusSensor, UiActionPort};
use crate::domain::policy::{LoginProbe, LoginVerdict, address_matches, login_timeout_verdict};
use crate::domain::{ClickOptions, WorkflowError};

impl<U, S, A, R> DiagnosticsWorkflow<'_, U, S, A, R>
where
    U: UiActionPort,
    S: StatusSensor,
    A: ArtifactStore,
    R: ProgressReporter,
{
    /// Submit the credentials once and wait for the console to leave the
    /// login page.
    pub(super) async fn authenticate(&self) -> Result<(), WorkflowError> {
        let timings = &self.settings.config.timings;
        let device = &self.settings.config.device;
        let session = &self.settings.session;

        self.reporter
            .step(&format!("Logging in to {}...", session.base_address()));
        self.ui
            .open(session.base_address(), timings.page_load())
            .await
            .map_err(WorkflowError::LoginUnavailable)?;
        self.ui
            .wait_for_element(&device.username_field, timings.login_form())
            .await
            .map_err(WorkflowError::LoginUnavailable)?;
        self.ui
            .fill_field(&device.username_field, &session.credentials().username)
            .await
            .map_err(WorkflowError::LoginUnavailable)?;
        self.ui
            .fill_field(&device.password_field, &session.credentials().password)
            .await
            .map_err(WorkflowError::LoginUnavailable)?;
        self.ui
            .click(
                &device.login_button,
                ClickOptions {
                    force: false,
                    timeout: timings.login_form(),
                },
            )
            .await
            .map_err(WorkflowError::LoginUnavailable)?;

        if self
            .wait_for_address(&device.post_login_address, timings.login_redirect())
            .await
        {
            self.reporter.success("Login successful");
            return Ok(());
        }

        let current_address = self
            .ui
            .current_address()
            .await
            .map_err(WorkflowError::LoginUnavailable)?;
        let body_text = match device.login_text {
            Some(_) => self
                .ui
                .body_text()
                .await
                .map_err(WorkflowError::LoginUnavailable)?,
            None => String::new(),
        };
        let verdict = login_timeout_verdict(&LoginProbe {
            current_address: &current_address,
            body_text: &body_text,
            login_address: &device.login_address,
            login_text: device.login_text.as_deref(),
        });
        match verdict {
            LoginVerdict::Rejected => Err(WorkflowError::AuthenticationRejected),
            LoginVerdict::ProceedOptimistically => {
                tracing::warn!(address = %current_address, "post-login address not reached");
                self.reporter.warn(&format!(
                    "Dashboard not reached, continuing from {current_address}"
                ));
                Ok(())
            }
        }
    }

    /// Poll the current address until it contains `fragment` or `bound` runs out.
    ///
    /// A failed read counts as "not there yet": the page is usually between
    /// documents right after the login submit.
    async fn wait_for_address(&self, fragment: &str, bound: Duration) -> bool {
        let interval = self.settings.config.timings.address_poll();
        let deadline = Instant::now() + bound;
        loop {
            match self.ui.current_address().await {
                Ok(address) if address_matches(&address, fragment) => return true,
                Ok(_) => {}
                Err(e) => tracing::debug!(error = %e, "address unreadable during login redirect"),
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            sleep(interval.min(deadline - now)).await;
        }
    }
}
