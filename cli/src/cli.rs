//! CLI argument parsing with clap derive

use clap::Parser;

use crate::app::{AppContext, OutputFlags};
use crate::commands;
use crate::output::json;

/// Collect and download a diagnostics bundle from a Zyxel USG Flex H device
#[derive(Parser, Debug)]
#[command(name = "diagpull", version, arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub collect: commands::collect::CollectArgs,

    /// Output the run report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log workflow details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Execute the collection and return the process exit code.
    ///
    /// Setup errors are printed here: as a JSON error object in `--json`
    /// mode, otherwise on stderr.
    pub async fn run(self) -> i32 {
        let Cli {
            collect,
            json,
            quiet,
            no_color,
            ..
        } = self;
        let app = AppContext::new(&OutputFlags {
            no_color,
            quiet,
            json,
        });
        match commands::collect::run(&app, &collect).await {
            Ok(code) => code,
            Err(e) => {
                report_setup_error(&app, &e);
                1
            }
        }
    }
}

fn report_setup_error(app: &AppContext, err: &anyhow::Error) {
    let message = format!("{err:#}");
    if app.is_json() {
        match json::format_error(&message, "setup_failed") {
            Ok(out) => println!("{out}"),
            Err(_) => eprintln!("Error: {message}"),
        }
    } else {
        app.output.error(&message);
        app.output.verdict("Failed.");
    }
}
