pub mod format;
pub mod junit;
pub mod text;

pub use junit::{build_junit_report, DEFAULT_SUITE_NAME};
pub use text::{text_summary, SummaryOptions};

use serde::{Deserialize, Serialize};

/// One threshold of one metric, as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCase {
    /// `"<metric> + <threshold expression>"`.
    pub name: String,
    pub passed: bool,
}

impl ReportCase {
    pub fn new(metric: &str, threshold: &str, passed: bool) -> Self {
        Self {
            name: format!("{metric} + {threshold}"),
            passed,
        }
    }
}
