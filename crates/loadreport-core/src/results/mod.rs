pub mod io;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::report::ReportCase;

// ---------------------------------------------------------------------------
// MetricType / ValueKind
// ---------------------------------------------------------------------------

/// How the load runtime aggregated a metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Counter,
    Gauge,
    Rate,
    #[default]
    Trend,
}

/// Unit of the values carried by a metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    #[default]
    Default,
    /// Values are durations in milliseconds.
    Time,
    /// Values are byte counts.
    Data,
}

// ---------------------------------------------------------------------------
// MetricResult
// ---------------------------------------------------------------------------

/// Outcome of a single threshold as evaluated by the load runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdOutcome {
    pub ok: bool,
}

/// Aggregated data for one metric at the end of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricResult {
    #[serde(rename = "type", default)]
    pub kind: MetricType,
    #[serde(default)]
    pub contains: ValueKind,
    /// Aggregated stats keyed by name (`avg`, `p(95)`, `count`, `rate`, ...).
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
    /// Threshold expression → outcome. Absent when the metric declares none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<BTreeMap<String, ThresholdOutcome>>,
}

impl MetricResult {
    /// `None` when the metric has no thresholds, otherwise whether all passed.
    pub fn thresholds_ok(&self) -> Option<bool> {
        self.thresholds
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(|t| t.values().all(|o| o.ok))
    }
}

// ---------------------------------------------------------------------------
// Groups and checks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Check {
    pub name: String,
    #[serde(default)]
    pub passes: u64,
    #[serde(default)]
    pub fails: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub checks: Vec<Check>,
}

// ---------------------------------------------------------------------------
// Run-level options and state
// ---------------------------------------------------------------------------

/// Summary-related options the runtime embeds in its result document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDataOptions {
    #[serde(default)]
    pub summary_trend_stats: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_time_unit: Option<String>,
    #[serde(default)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    /// Wall-clock duration of the test run.
    #[serde(rename = "testRunDurationMs", default)]
    pub test_run_duration_ms: f64,
}

// ---------------------------------------------------------------------------
// RunResult
// ---------------------------------------------------------------------------

/// End-of-run data handed over by the load runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResult {
    pub metrics: BTreeMap<String, MetricResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_group: Option<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<SummaryDataOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RunState>,
}

impl RunResult {
    /// Decode a result document, rejecting documents without a `metrics` object.
    pub fn from_json(content: &str) -> Result<Self, ReportError> {
        let raw: serde_json::Value = serde_json::from_str(content)?;
        let Some(root) = raw.as_object() else {
            return Err(ReportError::MalformedResult(
                "expected a JSON object at the top level".to_string(),
            ));
        };
        match root.get("metrics") {
            None => {
                return Err(ReportError::MalformedResult(
                    "missing `metrics` field".to_string(),
                ))
            }
            Some(m) if !m.is_object() => {
                return Err(ReportError::MalformedResult(format!(
                    "`metrics` must be an object, got {}",
                    json_kind(m)
                )))
            }
            Some(_) => {}
        }
        serde_json::from_value(raw).map_err(|e| ReportError::MalformedResult(e.to_string()))
    }

    /// One report case per threshold, ordered by metric name then expression.
    pub fn cases(&self) -> Vec<ReportCase> {
        self.metrics
            .iter()
            .filter_map(|(name, metric)| metric.thresholds.as_ref().map(|t| (name, t)))
            .flat_map(|(name, thresholds)| {
                thresholds
                    .iter()
                    .map(move |(expr, outcome)| ReportCase::new(name, expr, outcome.ok))
            })
            .collect()
    }

    /// `true` when no threshold of any metric failed.
    pub fn thresholds_passed(&self) -> bool {
        self.metrics
            .values()
            .filter_map(|m| m.thresholds.as_ref())
            .flat_map(|t| t.values())
            .all(|o| o.ok)
    }

    /// Trend stats to display, falling back to the runtime's defaults.
    pub fn trend_stats(&self) -> Vec<String> {
        match &self.options {
            Some(o) if !o.summary_trend_stats.is_empty() => o.summary_trend_stats.clone(),
            _ => DEFAULT_TREND_STATS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub const DEFAULT_TREND_STATS: [&str; 6] = ["avg", "min", "med", "max", "p(90)", "p(95)"];

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
