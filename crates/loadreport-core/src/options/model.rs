use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::options::duration::parse_duration;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// One step of the ramp schedule: move to `target` VUs over `duration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Duration string, e.g. `1m` or `30s`.
    pub duration: String,
    pub target: u32,
}

impl Stage {
    pub fn parsed_duration(&self) -> Result<Duration, ReportError> {
        parse_duration(&self.duration)
    }
}

// ---------------------------------------------------------------------------
// LoadOptions
// ---------------------------------------------------------------------------

/// Load profile handed to the load runtime: VUs, ramp stages and thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Initial number of virtual users.
    #[serde(default = "default_vus")]
    pub vus: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,
    #[serde(default)]
    pub stages: Vec<Stage>,
    /// Metric name → threshold expressions.
    #[serde(default)]
    pub thresholds: BTreeMap<String, Vec<String>>,
}

fn default_vus() -> u32 {
    1
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            vus: default_vus(),
            iterations: None,
            stages: Vec::new(),
            thresholds: BTreeMap::new(),
        }
    }
}

impl LoadOptions {
    pub fn has_stages(&self) -> bool {
        !self.stages.is_empty()
    }

    /// Sum of all stage durations.
    pub fn total_duration(&self) -> Result<Duration, ReportError> {
        self.stages
            .iter()
            .try_fold(Duration::ZERO, |acc, s| Ok(acc + s.parsed_duration()?))
    }

    /// Peak VU count across the initial VUs and every stage target.
    pub fn max_vus(&self) -> u32 {
        self.stages
            .iter()
            .map(|s| s.target)
            .fold(self.vus, u32::max)
    }

    /// Number of threshold expressions declared across all metrics.
    pub fn threshold_count(&self) -> usize {
        self.thresholds.values().map(Vec::len).sum()
    }
}
