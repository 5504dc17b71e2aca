use std::path::Path;

use crate::error::ReportError;
use crate::options::model::LoadOptions;

/// Read a load options file from disk.
///
/// The file format is JSON serialized [`LoadOptions`].
pub async fn read_options(path: impl AsRef<Path>) -> Result<LoadOptions, ReportError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let options: LoadOptions = serde_json::from_str(&content)?;
    Ok(options)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
