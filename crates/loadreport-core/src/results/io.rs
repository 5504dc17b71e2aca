use std::path::Path;

use crate::error::ReportError;
use crate::results::RunResult;

/// Read a run result document from disk.
///
/// The file is the JSON document the load runtime passes to its summary hook.
pub async fn read_run_result(path: impl AsRef<Path>) -> Result<RunResult, ReportError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    RunResult::from_json(&content)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
