//! Collect command: wires the real adapters into the diagnostics workflow.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use diagpull_common::{RunReport, RunStatus};

use crate::app::AppContext;
use crate::application::ports::{ConfigStore, ProgressReporter};
use crate::application::services::diagnostics::{
    DiagnosticsWorkflow, TextMarkerSensor, WorkflowSettings,
};
use crate::domain::{Credentials, Session, WorkflowOutcome};
use crate::infra::browser::{ChromeSession, LaunchOptions, resolve_executable};
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalArtifactStore;
use crate::output::{TerminalReporter, json};

/// Arguments for a collection run.
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Device address (e.g. 192.168.1.1)
    pub host: String,

    /// Admin username
    pub username: String,

    /// Admin password
    pub password: String,

    /// Output directory for the downloaded file
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Max wait time in seconds for collection
    #[arg(
        short,
        long,
        default_value_t = 900,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Configuration file (default: ~/.diagpull/config.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Browser executable to launch
    #[arg(long, env = "DIAGPULL_BROWSER")]
    pub browser: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Launch the browser without its sandbox
    #[arg(long)]
    pub no_sandbox: bool,
}

/// Run one collection and render its outcome.
///
/// Returns the process exit code of the run.
///
/// # Errors
///
/// Returns an error if setup fails before the workflow starts: invalid
/// arguments, an unreadable config, an unusable output directory, or a
/// browser that cannot be found or launched.
pub async fn run(app: &AppContext, args: &CollectArgs) -> Result<i32> {
    let started = std::time::Instant::now();

    let session = Session::new(
        &args.host,
        Credentials {
            username: args.username.clone(),
            password: args.password.clone(),
        },
    )?;
    let config = YamlConfigStore::new(args.config.clone()).load()?;
    let output_dir = prepare_output_dir(&args.output_dir)?;
    let executable = resolve_executable(args.browser.as_deref())?;

    let reporter = TerminalReporter::new(&app.output);
    reporter.step("Launching browser...");
    if let Some(path) = &executable {
        reporter.step(&format!("Using browser: {}", path.display()));
    }
    let browser = ChromeSession::launch(&LaunchOptions {
        executable,
        headful: args.headful,
        no_sandbox: args.no_sandbox,
        download_root: output_dir.clone(),
    })
    .await?;

    let sensor = TextMarkerSensor::from_profile(&config.device);
    let store = LocalArtifactStore;
    let settings = WorkflowSettings {
        session,
        output_dir,
        collection_timeout: Duration::from_secs(args.timeout),
        config,
    };
    let outcome = DiagnosticsWorkflow::new(browser, &sensor, &store, &reporter, settings)
        .run()
        .await;
    drop(reporter);

    let report = build_report(&args.host, &outcome, started.elapsed());
    if app.is_json() {
        println!("{}", json::format_report(&report)?);
    } else if outcome.is_success() {
        app.output.verdict("Done!");
    } else {
        app.output.verdict("Failed.");
    }
    Ok(outcome.exit_code())
}

/// Create the output directory if missing and return its absolute path.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or resolved.
pub fn prepare_output_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create output directory {}", dir.display()))?;
    dir.canonicalize()
        .with_context(|| format!("cannot resolve output directory {}", dir.display()))
}

/// Machine-readable summary of a finished run.
#[must_use]
pub fn build_report(host: &str, outcome: &WorkflowOutcome, elapsed: Duration) -> RunReport {
    let (status, path, size_bytes, reason) = match outcome {
        WorkflowOutcome::Success { path, size_bytes } => (
            RunStatus::Success,
            Some(path.display().to_string()),
            Some(*size_bytes),
            None,
        ),
        WorkflowOutcome::Failure(reason) => (RunStatus::Failure, None, None, Some(*reason)),
    };
    RunReport {
        status,
        host: host.to_string(),
        path,
        size_bytes,
        reason,
        elapsed_seconds: elapsed.as_secs(),
        finished_at: Utc::now(),
    }
}
