use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use loadreport_core::handler::{write_outputs, Destination, SummaryHandler};
use loadreport_core::options::{describe_options, read_options, validate_options};
use loadreport_core::report::SummaryOptions;
use loadreport_core::results::io::read_run_result;
use loadreport_core::results::RunResult;
use loadreport_core::thresholds::unreported_thresholds;

use crate::ReportArgs;

/// Exit code the load runtime uses when thresholds were crossed.
const EXIT_THRESHOLDS_FAILED: u8 = 99;

/// Execute the `report` command.
///
/// Loads the run result, renders the JUnit file and console summary, and maps
/// threshold failures to exit code 99. Only the outcomes in the run result
/// decide the exit code; load options are checked for consistency.
pub async fn report(args: ReportArgs) -> Result<ExitCode> {
    let result = load_run_result(&args.summary).await?;

    if let Some(path) = &args.options {
        let options = read_options(path)
            .await
            .with_context(|| format!("Failed to load options '{}'", path.display()))?;
        let errors = validate_options(&options);
        if !errors.is_empty() {
            let listed: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::bail!(
                "Invalid options '{}': {}",
                path.display(),
                listed.join("; ")
            );
        }
        let missing = unreported_thresholds(&result, &options);
        for m in &missing {
            warn!(metric = %m.metric, threshold = %m.threshold, "declared threshold not reported by the run result");
        }
        info!(declared = options.threshold_count(), unreported = missing.len(), "load options checked");
    }

    let summary_destination = Destination::parse(&args.summary_output);
    let on_terminal = match &summary_destination {
        Destination::Stdout => std::io::stdout().is_terminal(),
        Destination::Stderr => std::io::stderr().is_terminal(),
        Destination::File(_) => false,
    };
    let document_no_color = result.options.as_ref().is_some_and(|o| o.no_color);
    let enable_colors = !args.no_color && !document_no_color && on_terminal;
    if !enable_colors {
        colored::control::set_override(false);
    }

    let handler = SummaryHandler {
        junit_path: args.junit,
        suite_name: args.suite_name,
        summary_destination,
        summary: SummaryOptions {
            indent: args.indent,
            enable_colors,
        },
    };

    let outputs = handler.outputs(&result)?;
    write_outputs(&outputs)
        .await
        .context("Failed to write summary outputs")?;

    if result.thresholds_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        let failed = result.cases().iter().filter(|c| !c.passed).count();
        warn!(failed, "thresholds crossed");
        Ok(ExitCode::from(EXIT_THRESHOLDS_FAILED))
    }
}

async fn load_run_result(source: &str) -> Result<RunResult> {
    if source == "-" {
        let mut content = String::new();
        tokio::io::stdin()
            .read_to_string(&mut content)
            .await
            .context("Failed to read run result from stdin")?;
        Ok(RunResult::from_json(&content)?)
    } else {
        read_run_result(source)
            .await
            .with_context(|| format!("Failed to load run result '{source}'"))
    }
}

/// Execute the `validate` command.
pub async fn validate(path: PathBuf) -> Result<ExitCode> {
    let options = read_options(&path)
        .await
        .with_context(|| format!("Failed to load options '{}'", path.display()))?;

    let errors = validate_options(&options);
    if errors.is_empty() {
        println!("{}: ok ({})", path.display(), describe_options(&options));
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!("{}: {} problem(s)", path.display(), errors.len());
    for e in &errors {
        eprintln!("  - {e}");
    }
    Ok(ExitCode::FAILURE)
}
