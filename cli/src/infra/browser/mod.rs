//! Headless Chromium implementation of `UiActionPort` over the DevTools protocol.

mod locate;
mod script;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::browser::{
    DownloadProgressState, EventDownloadProgress, EventDownloadWillBegin,
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, timeout};

use crate::application::ports::UiActionPort;
use crate::domain::{ClickOptions, DownloadedFile, RawFileRow, RowQuery, Selector, UiError};

pub use locate::{find_in_bundle, resolve_executable};
use script::Presence;

/// How often element waits re-run the resolver.
const ELEMENT_POLL: Duration = Duration::from_millis(100);

/// Browser launch settings.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Browser binary; `None` lets chromiumoxide find one.
    pub executable: Option<PathBuf>,
    /// Show the browser window.
    pub headful: bool,
    /// Pass `--no-sandbox` (needed when running as root in containers).
    pub no_sandbox: bool,
    /// Directory that receives the hidden download staging directory.
    pub download_root: PathBuf,
}

/// One browser process with a single page, driven through injected scripts.
pub struct ChromeSession {
    browser: Mutex<Option<Browser>>,
    page: Page,
    handler: JoinHandle<()>,
    staging: TempDir,
}

impl ChromeSession {
    /// Launch the browser and open a blank page with downloads routed to a
    /// staging directory under `options.download_root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot be started or configured.
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        let staging = tempfile::Builder::new()
            .prefix(".diagpull-")
            .tempdir_in(&options.download_root)
            .with_context(|| {
                format!(
                    "creating download staging directory in {}",
                    options.download_root.display()
                )
            })?;

        let mut builder = BrowserConfig::builder().arg("--ignore-certificate-errors");
        if options.headful {
            builder = builder.with_head();
        }
        if options.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &options.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("invalid browser configuration: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch browser")?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "browser handler event error");
                }
            }
        });

        let staging_path = staging
            .path()
            .canonicalize()
            .with_context(|| format!("resolving {}", staging.path().display()))?;
        let download_behavior = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::AllowAndName)
            .download_path(staging_path.to_string_lossy().into_owned())
            .events_enabled(true)
            .build()
            .map_err(|e| anyhow::anyhow!("invalid download behavior: {e}"))?;
        browser
            .execute(download_behavior)
            .await
            .context("failed to configure downloads")?;

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to open browser page")?;
        tracing::debug!(staging = %staging_path.display(), "browser ready");

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            page,
            handler,
            staging,
        })
    }

    async fn eval<T: DeserializeOwned>(&self, expression: String) -> Result<T, UiError> {
        self.page
            .evaluate(expression)
            .await
            .map_err(|e| UiError::Script(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| UiError::Script(e.to_string()))
    }

    /// Poll until the presence of `selector` satisfies `accept` or `bound` runs out.
    async fn wait_until(
        &self,
        selector: &Selector,
        bound: Duration,
        accept: fn(Presence) -> bool,
    ) -> Result<(), UiError> {
        let probe = script::probe(selector)?;
        let deadline = Instant::now() + bound;
        loop {
            let presence: Presence = self.eval(probe.clone()).await?;
            if accept(presence) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(UiError::ElementNotFound {
                    selector: selector.to_string(),
                    timeout: bound,
                });
            }
            sleep(ELEMENT_POLL).await;
        }
    }
}

impl UiActionPort for ChromeSession {
    async fn open(&self, address: &str, bound: Duration) -> Result<(), UiError> {
        match timeout(bound, self.page.goto(address)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(UiError::Driver(format!("loading {address}: {e}"))),
            Err(_) => Err(UiError::Navigation {
                address: address.to_string(),
                timeout: bound,
            }),
        }
    }

    async fn wait_for_element(&self, selector: &Selector, bound: Duration) -> Result<(), UiError> {
        self.wait_until(selector, bound, |p| p != Presence::Missing)
            .await
    }

    async fn fill_field(&self, selector: &Selector, value: &str) -> Result<(), UiError> {
        let filled: bool = self.eval(script::fill(selector, value)?).await?;
        if filled {
            Ok(())
        } else {
            Err(UiError::ElementNotFound {
                selector: selector.to_string(),
                timeout: Duration::ZERO,
            })
        }
    }

    async fn click(&self, selector: &Selector, options: ClickOptions) -> Result<(), UiError> {
        if options.force {
            self.wait_until(selector, options.timeout, |p| p != Presence::Missing)
                .await?;
        } else {
            self.wait_until(selector, options.timeout, |p| p == Presence::Visible)
                .await?;
        }
        let clicked: bool = self.eval(script::click(selector)?).await?;
        if clicked {
            Ok(())
        } else {
            Err(UiError::ElementNotFound {
                selector: selector.to_string(),
                timeout: options.timeout,
            })
        }
    }

    async fn current_address(&self) -> Result<String, UiError> {
        // Target info survives navigations that destroy the page's script context.
        self.page
            .url()
            .await
            .map_err(|e| UiError::Driver(e.to_string()))?
            .ok_or_else(|| UiError::Driver("page has no address".to_string()))
    }

    async fn body_text(&self) -> Result<String, UiError> {
        self.eval(script::BODY_TEXT.to_string()).await
    }

    async fn evaluate_structured(&self, query: &RowQuery) -> Result<Option<RawFileRow>, UiError> {
        let rows: Vec<RawFileRow> = self.eval(script::first_row(query)?).await?;
        Ok(rows.into_iter().next())
    }

    async fn await_download(
        &self,
        trigger: &Selector,
        click: ClickOptions,
        bound: Duration,
    ) -> Result<DownloadedFile, UiError> {
        let driver = |e: chromiumoxide::error::CdpError| UiError::Driver(e.to_string());
        let (mut begins, mut progress) = {
            let guard = self.browser.lock().await;
            let browser = guard
                .as_ref()
                .ok_or_else(|| UiError::Driver("browser already closed".to_string()))?;
            (
                browser
                    .event_listener::<EventDownloadWillBegin>()
                    .await
                    .map_err(driver)?,
                browser
                    .event_listener::<EventDownloadProgress>()
                    .await
                    .map_err(driver)?,
            )
        };

        self.click(trigger, click).await?;

        let staging = self.staging.path().to_path_buf();
        let completion = async move {
            let begin = begins
                .next()
                .await
                .ok_or_else(|| UiError::Driver("download events closed".to_string()))?;
            tracing::debug!(guid = %begin.guid, name = %begin.suggested_filename, "download started");
            while let Some(event) = progress.next().await {
                if event.guid != begin.guid {
                    continue;
                }
                match event.state {
                    DownloadProgressState::Completed => {
                        return Ok(DownloadedFile {
                            suggested_name: begin.suggested_filename.clone(),
                            staged_path: staging.join(&begin.guid),
                        });
                    }
                    DownloadProgressState::Canceled => {
                        return Err(UiError::Driver("download was canceled".to_string()));
                    }
                    DownloadProgressState::InProgress => {}
                }
            }
            Err(UiError::Driver("download events closed".to_string()))
        };

        timeout(bound, completion)
            .await
            .map_err(|_| UiError::DownloadTimeout(bound))?
    }

    async fn screenshot(&self, path: &Path) {
        let params = ScreenshotParams::builder().full_page(true).build();
        if let Err(e) = self.page.save_screenshot(params, path).await {
            tracing::warn!(path = %path.display(), error = %e, "screenshot failed");
        }
    }

    async fn close(&self) {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return;
        };
        if let Err(e) = browser.close().await {
            tracing::debug!(error = %e, "browser close failed");
        }
        if let Err(e) = browser.wait().await {
            tracing::debug!(error = %e, "browser wait failed");
        }
        self.handler.abort();
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
