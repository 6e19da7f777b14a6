//! Shared fakes of the workflow ports for unit tests.
//!
//! `FakeConsole` plays a scripted device console: it tracks the address the
//! browser would show, serves the next scripted status on every body read,
//! and records every call so tests can assert what the workflow did.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use diagpull::application::ports::{ArtifactStore, ProgressReporter, UiActionPort};
use diagpull::domain::{
    ClickOptions, CollectionStatus, DeviceProfile, DownloadedFile, RawFileRow, RowQuery, Selector,
    UiError,
};

pub const BASE: &str = "https://192.168.1.1";

// ── FakeConsole ──────────────────────────────────────────────────────────────

/// How the fake answers the download request.
#[derive(Debug, Clone)]
pub enum DownloadBehavior {
    Complete { suggested_name: String },
    NeverCompletes,
    Fails,
}

/// Scripted behaviour of the fake console.
#[derive(Debug, Clone)]
pub struct ConsoleScript {
    /// `open` fails with a navigation timeout.
    pub page_unreachable: bool,
    /// Address shown after the login button is clicked; `None` stays on the login page.
    pub after_login: Option<String>,
    /// Address reads that fail right after the login click, as while the
    /// page is between documents.
    pub unreadable_address_reads: usize,
    /// Address shown after the diagnostics menu is clicked.
    pub after_diagnostics: String,
    /// Menu entries that cannot be found.
    pub missing_controls: Vec<Selector>,
    /// Status served by successive body reads; the last one repeats.
    pub statuses: VecDeque<CollectionStatus>,
    pub file_row: Option<RawFileRow>,
    /// The file-list query fails with a script error.
    pub file_list_unreadable: bool,
    pub download: DownloadBehavior,
}

impl Default for ConsoleScript {
    fn default() -> Self {
        Self {
            page_unreachable: false,
            after_login: Some(format!("{BASE}/#/dashboard/")),
            unreadable_address_reads: 0,
            after_diagnostics: format!("{BASE}/#/maintenance/diagnostics"),
            missing_controls: Vec::new(),
            statuses: VecDeque::from([CollectionStatus::Standby]),
            file_row: Some(RawFileRow {
                name: "diaginfo_20240101.tar.gz".to_string(),
                size: Some("52428800".to_string()),
            }),
            file_list_unreadable: false,
            download: DownloadBehavior::Complete {
                suggested_name: "diaginfo_20240101.tar.gz".to_string(),
            },
        }
    }
}

impl ConsoleScript {
    pub fn with_statuses(statuses: &[CollectionStatus]) -> Self {
        Self {
            statuses: statuses.iter().copied().collect(),
            ..Self::default()
        }
    }
}

/// Everything the fake saw, in order.
#[derive(Debug, Default)]
pub struct ConsoleLog {
    pub calls: Vec<String>,
    pub filled: Vec<(Selector, String)>,
    pub clicks: Vec<(Selector, ClickOptions)>,
    pub status_reads: usize,
    pub screenshots: Vec<PathBuf>,
    pub downloads: usize,
    /// Click options the download trigger was given.
    pub download_clicks: Vec<ClickOptions>,
    pub closes: usize,
}

struct ConsoleState {
    script: ConsoleScript,
    address: String,
    pending_unreadable: usize,
    log: ConsoleLog,
}

/// Scripted, recording implementation of `UiActionPort`.
///
/// Clones share state, so a test keeps one handle while the workflow owns
/// the other.
#[derive(Clone)]
pub struct FakeConsole {
    profile: DeviceProfile,
    state: Arc<Mutex<ConsoleState>>,
}

impl FakeConsole {
    pub fn new(script: ConsoleScript) -> Self {
        Self {
            profile: DeviceProfile::default(),
            state: Arc::new(Mutex::new(ConsoleState {
                script,
                address: "about:blank".to_string(),
                pending_unreadable: 0,
                log: ConsoleLog::default(),
            })),
        }
    }

    /// Inspect the call log.
    pub fn log<T>(&self, f: impl FnOnce(&ConsoleLog) -> T) -> T {
        f(&self.state.lock().unwrap().log)
    }

    pub fn clicked(&self, selector: &Selector) -> bool {
        self.log(|log| log.clicks.iter().any(|(s, _)| s == selector))
    }

    fn record(&self, call: impl Into<String>) {
        self.state.lock().unwrap().log.calls.push(call.into());
    }

    fn body_for(status: CollectionStatus) -> &'static str {
        match status {
            CollectionStatus::Collecting => "Diagnostics Data collection in progress Cancel",
            CollectionStatus::Standby => "Diagnostics Status: Standby Collect Now",
            CollectionStatus::Unknown => "Diagnostics Loading...",
        }
    }
}

impl UiActionPort for FakeConsole {
    async fn open(&self, address: &str, timeout: Duration) -> Result<(), UiError> {
        self.record(format!("open {address}"));
        let mut state = self.state.lock().unwrap();
        if state.script.page_unreachable {
            return Err(UiError::Navigation {
                address: address.to_string(),
                timeout,
            });
        }
        state.address = format!("{address}/#/login");
        Ok(())
    }

    async fn wait_for_element(&self, selector: &Selector, timeout: Duration) -> Result<(), UiError> {
        self.record(format!("wait {selector}"));
        if self.state.lock().unwrap().script.missing_controls.contains(selector) {
            return Err(UiError::ElementNotFound {
                selector: selector.to_string(),
                timeout,
            });
        }
        Ok(())
    }

    async fn fill_field(&self, selector: &Selector, value: &str) -> Result<(), UiError> {
        self.record(format!("fill {selector}"));
        self.state
            .lock()
            .unwrap()
            .log
            .filled
            .push((selector.clone(), value.to_string()));
        Ok(())
    }

    async fn click(&self, selector: &Selector, options: ClickOptions) -> Result<(), UiError> {
        self.record(format!("click {selector}"));
        let mut state = self.state.lock().unwrap();
        if state.script.missing_controls.contains(selector) {
            return Err(UiError::ElementNotFound {
                selector: selector.to_string(),
                timeout: options.timeout,
            });
        }
        state.log.clicks.push((selector.clone(), options));
        if *selector == self.profile.login_button {
            state.pending_unreadable = state.script.unreadable_address_reads;
            if let Some(next) = state.script.after_login.clone() {
                state.address = next;
            }
        } else if *selector == self.profile.diagnostics_menu {
            state.address = state.script.after_diagnostics.clone();
        }
        Ok(())
    }

    async fn current_address(&self) -> Result<String, UiError> {
        let mut state = self.state.lock().unwrap();
        if state.pending_unreadable > 0 {
            state.pending_unreadable -= 1;
            return Err(UiError::Script(
                "Execution context was destroyed".to_string(),
            ));
        }
        Ok(state.address.clone())
    }

    async fn body_text(&self) -> Result<String, UiError> {
        let mut state = self.state.lock().unwrap();
        state.log.status_reads += 1;
        let next = if state.script.statuses.len() > 1 {
            state.script.statuses.pop_front()
        } else {
            state.script.statuses.front().copied()
        };
        let status = next.unwrap_or(CollectionStatus::Unknown);
        state.log.calls.push(format!("status {status}"));
        Ok(Self::body_for(status).to_string())
    }

    async fn evaluate_structured(&self, query: &RowQuery) -> Result<Option<RawFileRow>, UiError> {
        self.record(format!("rows {}", query.marker));
        let state = self.state.lock().unwrap();
        if state.script.file_list_unreadable {
            return Err(UiError::Script("file table not rendered".to_string()));
        }
        Ok(state.script.file_row.clone())
    }

    async fn await_download(
        &self,
        trigger: &Selector,
        click: ClickOptions,
        timeout: Duration,
    ) -> Result<DownloadedFile, UiError> {
        self.record(format!("download via {trigger}"));
        let behavior = {
            let mut state = self.state.lock().unwrap();
            state.log.downloads += 1;
            state.log.download_clicks.push(click);
            state.script.download.clone()
        };
        match behavior {
            DownloadBehavior::Complete { suggested_name } => Ok(DownloadedFile {
                suggested_name,
                staged_path: PathBuf::from("/staging/8d1f0c2e"),
            }),
            DownloadBehavior::NeverCompletes => {
                tokio::time::sleep(timeout).await;
                Err(UiError::DownloadTimeout(timeout))
            }
            DownloadBehavior::Fails => Err(UiError::Driver("download was canceled".to_string())),
        }
    }

    async fn screenshot(&self, path: &Path) {
        self.record("screenshot");
        self.state
            .lock()
            .unwrap()
            .log
            .screenshots
            .push(path.to_path_buf());
    }

    async fn close(&self) {
        self.record("close");
        self.state.lock().unwrap().log.closes += 1;
    }
}

// ── RecordingReporter ────────────────────────────────────────────────────────

/// Kind of progress event emitted by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Step,
    Progress,
    Success,
    Warn,
    Error,
}

/// `ProgressReporter` that keeps every message.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<(Event, String)>>,
}

impl RecordingReporter {
    pub fn messages(&self, kind: Event) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn any(&self, kind: Event, needle: &str) -> bool {
        self.messages(kind).iter().any(|m| m.contains(needle))
    }

    fn push(&self, kind: Event, message: &str) {
        self.events.lock().unwrap().push((kind, message.to_string()));
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push(Event::Step, message);
    }
    fn progress(&self, message: &str) {
        self.push(Event::Progress, message);
    }
    fn success(&self, message: &str) {
        self.push(Event::Success, message);
    }
    fn warn(&self, message: &str) {
        self.push(Event::Warn, message);
    }
    fn error(&self, message: &str) {
        self.push(Event::Error, message);
    }
}

/// No-op reporter for tests that only check outcomes.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn error(&self, _: &str) {}
}

// ── MemoryArtifactStore ──────────────────────────────────────────────────────

/// `ArtifactStore` that records persisted files instead of touching disk.
pub struct MemoryArtifactStore {
    size_bytes: u64,
    fail: bool,
    saved: Mutex<Vec<(DownloadedFile, PathBuf)>>,
}

impl MemoryArtifactStore {
    pub fn with_size(size_bytes: u64) -> Self {
        Self {
            size_bytes,
            fail: false,
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_size(0)
        }
    }

    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    async fn persist(
        &self,
        download: &DownloadedFile,
        output_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf> {
        anyhow::ensure!(!self.fail, "no space left on device");
        let dest = output_dir.join(file_name);
        self.saved
            .lock()
            .unwrap()
            .push((download.clone(), dest.clone()));
        Ok(dest)
    }

    async fn file_size(&self, path: &Path) -> Result<u64> {
        anyhow::ensure!(
            self.saved_paths().iter().any(|p| p == path),
            "{} was never persisted",
            path.display()
        );
        Ok(self.size_bytes)
    }
}
