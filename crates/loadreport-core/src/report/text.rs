//! Console summary of a finished run.
//!
//! Produces the familiar dotted-row layout:
//!
//! ```text
//!  ✓ status is 200
//!
//!  ✓ http_req_duration...: avg=120.5ms min=80ms med=110ms max=900ms p(90)=300ms p(95)=410ms
//!    ✓ p(95)<500 (p(95)=410ms)
//!    iterations..........: 100 0.833333/s
//!
//!  running (2m0s)
//! ```
//!
//! Rendering is a pure function of the [`RunResult`]; colors are applied via
//! the `colored` crate only when [`SummaryOptions::enable_colors`] is set.

use colored::Colorize;

use crate::report::format::{format_bytes, format_duration_ms, format_number, trim_float, TimeUnit};
use crate::results::{Check, Group, MetricResult, MetricType, RunResult, ValueKind};
use crate::thresholds::ThresholdExpr;

const PASS_MARK: &str = "✓";
const FAIL_MARK: &str = "✗";

/// Options for [`text_summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Prefix for every line.
    pub indent: String,
    pub enable_colors: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            indent: " ".to_string(),
            enable_colors: true,
        }
    }
}

/// Render the human-readable summary of `result`.
pub fn text_summary(result: &RunResult, options: &SummaryOptions) -> String {
    let mut lines = Vec::new();

    if let Some(root) = &result.root_group {
        let before = lines.len();
        render_group(root, &options.indent, options, &mut lines);
        if lines.len() > before {
            lines.push(String::new());
        }
    }

    let time_unit = result
        .options
        .as_ref()
        .and_then(|o| o.summary_time_unit.as_deref())
        .and_then(TimeUnit::parse);
    let trend_stats = result.trend_stats();
    let width = result
        .metrics
        .keys()
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0)
        + 3;

    for (name, metric) in &result.metrics {
        let mark = match metric.thresholds_ok() {
            Some(ok) => paint(mark_for(ok), ok, options),
            None => " ".to_string(),
        };
        let values = metric_values(metric, &trend_stats, time_unit);
        lines.push(format!("{}{mark} {name:.<width$}: {values}", options.indent));

        if let Some(thresholds) = &metric.thresholds {
            for (source, outcome) in thresholds {
                lines.push(format!(
                    "{}  {} {source}{}",
                    options.indent,
                    paint(mark_for(outcome.ok), outcome.ok, options),
                    observed_suffix(source, metric, time_unit)
                ));
            }
        }
    }

    if let Some(ms) = result.state.as_ref().map(|s| s.test_run_duration_ms).filter(|ms| *ms > 0.0) {
        lines.push(String::new());
        lines.push(format!("{}running ({})", options.indent, format_duration_ms(ms, None)));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_group(group: &Group, indent: &str, options: &SummaryOptions, lines: &mut Vec<String>) {
    let child_indent = if group.name.is_empty() {
        indent.to_string()
    } else {
        lines.push(format!("{indent}█ {}", group.name));
        format!("{indent}  ")
    };

    for check in &group.checks {
        render_check(check, &child_indent, options, lines);
    }
    for sub in &group.groups {
        render_group(sub, &child_indent, options, lines);
    }
}

fn render_check(check: &Check, indent: &str, options: &SummaryOptions, lines: &mut Vec<String>) {
    let ok = check.fails == 0;
    lines.push(format!(
        "{indent}{} {}",
        paint(mark_for(ok), ok, options),
        check.name
    ));
    if !ok {
        let total = check.passes + check.fails;
        let pct = if total > 0 {
            check.passes as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        lines.push(format!(
            "{indent} ↳  {}% — {PASS_MARK} {} / {FAIL_MARK} {}",
            trim_float(pct, 2),
            check.passes,
            check.fails
        ));
    }
}

fn metric_values(metric: &MetricResult, trend_stats: &[String], unit: Option<TimeUnit>) -> String {
    let v = |key: &str| metric.values.get(key).copied();
    let fmt = |value: f64| format_value(metric.contains, value, unit);

    match metric.kind {
        MetricType::Trend => trend_stats
            .iter()
            .filter_map(|stat| v(stat.as_str()).map(|value| format!("{stat}={}", fmt(value))))
            .collect::<Vec<_>>()
            .join(" "),
        MetricType::Counter => {
            let mut parts = Vec::new();
            if let Some(count) = v("count") {
                parts.push(fmt(count));
            }
            if let Some(rate) = v("rate") {
                parts.push(format!("{}/s", fmt(rate)));
            }
            parts.join(" ")
        }
        MetricType::Rate => {
            let rate = v("rate").unwrap_or(0.0);
            format!(
                "{:.2}% {PASS_MARK} {} {FAIL_MARK} {}",
                rate * 100.0,
                format_number(v("passes").unwrap_or(0.0)),
                format_number(v("fails").unwrap_or(0.0))
            )
        }
        MetricType::Gauge => {
            let mut parts = Vec::new();
            if let Some(value) = v("value") {
                parts.push(fmt(value));
            }
            if let Some(min) = v("min") {
                parts.push(format!("min={}", fmt(min)));
            }
            if let Some(max) = v("max") {
                parts.push(format!("max={}", fmt(max)));
            }
            parts.join(" ")
        }
    }
}

/// ` (p(95)=410ms)` for a threshold whose stat is present; empty otherwise.
fn observed_suffix(source: &str, metric: &MetricResult, unit: Option<TimeUnit>) -> String {
    let Ok(expr) = ThresholdExpr::parse(source) else {
        return String::new();
    };
    match expr.observed(&metric.values) {
        Some(value) => format!(
            " ({}={})",
            expr.aggregation,
            format_value(metric.contains, value, unit)
        ),
        None => String::new(),
    }
}

fn format_value(kind: ValueKind, value: f64, unit: Option<TimeUnit>) -> String {
    match kind {
        ValueKind::Time => format_duration_ms(value, unit),
        ValueKind::Data => format_bytes(value),
        ValueKind::Default => format_number(value),
    }
}

fn mark_for(ok: bool) -> &'static str {
    if ok {
        PASS_MARK
    } else {
        FAIL_MARK
    }
}

fn paint(text: &str, ok: bool, options: &SummaryOptions) -> String {
    if !options.enable_colors {
        text.to_string()
    } else if ok {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}
