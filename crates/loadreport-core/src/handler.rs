//! End-of-run summary hook: turns a [`RunResult`] into output artifacts and
//! writes them.

use std::fmt;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::ReportError;
use crate::report::{build_junit_report, text_summary, SummaryOptions, DEFAULT_SUITE_NAME};
use crate::results::RunResult;

pub const DEFAULT_JUNIT_PATH: &str = "results/junit.xml";

// ---------------------------------------------------------------------------
// Destination
// ---------------------------------------------------------------------------

/// Where a summary artifact goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl Destination {
    /// `"stdout"` and `"stderr"` name the console streams; anything else is a path.
    pub fn parse(key: &str) -> Self {
        match key {
            "stdout" => Destination::Stdout,
            "stderr" => Destination::Stderr,
            path => Destination::File(PathBuf::from(path)),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => write!(f, "stdout"),
            Destination::Stderr => write!(f, "stderr"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One rendered artifact and its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutput {
    pub destination: Destination,
    pub content: String,
}

// ---------------------------------------------------------------------------
// SummaryHandler
// ---------------------------------------------------------------------------

/// Configuration of the summary hook.
#[derive(Debug, Clone)]
pub struct SummaryHandler {
    pub junit_path: PathBuf,
    pub suite_name: String,
    /// Where the console summary goes.
    pub summary_destination: Destination,
    pub summary: SummaryOptions,
}

impl Default for SummaryHandler {
    fn default() -> Self {
        Self {
            junit_path: PathBuf::from(DEFAULT_JUNIT_PATH),
            suite_name: DEFAULT_SUITE_NAME.to_string(),
            summary_destination: Destination::Stdout,
            summary: SummaryOptions::default(),
        }
    }
}

impl SummaryHandler {
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.suite_name.trim().is_empty() {
            return Err(ReportError::Validation(
                "suite name must not be empty".to_string(),
            ));
        }
        if self.junit_path.as_os_str().is_empty() {
            return Err(ReportError::Validation(
                "JUnit output path must not be empty".to_string(),
            ));
        }
        if self.summary_destination == Destination::File(self.junit_path.clone()) {
            return Err(ReportError::Validation(format!(
                "console summary and JUnit report both target {}",
                self.junit_path.display()
            )));
        }
        Ok(())
    }

    /// Render the JUnit file and the console summary for `result`.
    pub fn outputs(&self, result: &RunResult) -> Result<Vec<SummaryOutput>, ReportError> {
        self.validate()?;
        Ok(vec![
            SummaryOutput {
                destination: Destination::File(self.junit_path.clone()),
                content: build_junit_report(&self.suite_name, result),
            },
            SummaryOutput {
                destination: self.summary_destination.clone(),
                content: text_summary(result, &self.summary),
            },
        ])
    }
}

/// Write every artifact to its destination, creating parent directories for files.
pub async fn write_outputs(outputs: &[SummaryOutput]) -> Result<(), ReportError> {
    for output in outputs {
        match &output.destination {
            Destination::Stdout => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(output.content.as_bytes()).await?;
                stdout.flush().await?;
            }
            Destination::Stderr => {
                let mut stderr = tokio::io::stderr();
                stderr.write_all(output.content.as_bytes()).await?;
                stderr.flush().await?;
            }
            Destination::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(path, &output.content).await?;
                info!(path = %path.display(), bytes = output.content.len(), "summary written");
            }
        }
    }
    Ok(())
}
