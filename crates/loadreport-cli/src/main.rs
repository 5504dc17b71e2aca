mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use loadreport_core::handler::DEFAULT_JUNIT_PATH;
use loadreport_core::report::DEFAULT_SUITE_NAME;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "loadreport", version, about = "Threshold reports for load test runs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a JUnit XML file and a console summary from a run result document.
    Report(ReportArgs),
    /// Check a load options file (stages, thresholds) for mistakes.
    Validate {
        /// Load options JSON file.
        options: PathBuf,
    },
}

#[derive(Args)]
pub struct ReportArgs {
    /// Run result JSON file, or `-` to read from stdin.
    pub summary: String,

    /// Where to write the JUnit XML report.
    #[arg(long, default_value = DEFAULT_JUNIT_PATH)]
    pub junit: PathBuf,

    /// Name of the JUnit test suite.
    #[arg(long, default_value = DEFAULT_SUITE_NAME)]
    pub suite_name: String,

    /// Where the console summary goes: `stdout`, `stderr`, or a file path.
    #[arg(long, default_value = "stdout")]
    pub summary_output: String,

    /// Prefix for every console summary line.
    #[arg(long, default_value = " ")]
    pub indent: String,

    /// Disable colored console output.
    #[arg(long)]
    pub no_color: bool,

    /// Load options file; it is validated and declared thresholds the run
    /// result does not report are logged as warnings.
    #[arg(long)]
    pub options: Option<PathBuf>,
}

fn init_tracing() {
    // stdout carries the summary by default, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Report(args) => commands::report(args).await,
        Command::Validate { options } => commands::validate(options).await,
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
