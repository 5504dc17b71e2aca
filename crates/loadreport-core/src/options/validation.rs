use std::time::Duration;

use crate::error::ReportError;
use crate::options::model::{LoadOptions, Stage};
use crate::thresholds::ThresholdExpr;

/// Validate [`LoadOptions`] and return a list of validation errors.
///
/// An empty `Vec` means the options are valid.
pub fn validate_options(options: &LoadOptions) -> Vec<ReportError> {
    let mut errors = Vec::new();

    if !options.has_stages() && options.vus == 0 {
        errors.push(ReportError::Validation(
            "vus must be at least 1 when no stages are defined".to_string(),
        ));
    }

    if options.iterations == Some(0) {
        errors.push(ReportError::Validation(
            "iterations must be at least 1 when set".to_string(),
        ));
    }

    errors.extend(validate_stages(&options.stages));

    for (metric, expressions) in &options.thresholds {
        errors.extend(validate_thresholds(metric, expressions));
    }

    errors
}

fn validate_stages(stages: &[Stage]) -> Vec<ReportError> {
    let mut errors = Vec::new();
    let mut total = Duration::ZERO;
    let mut all_parsed = true;

    for (idx, stage) in stages.iter().enumerate() {
        match stage.parsed_duration() {
            Ok(d) => total += d,
            Err(e) => {
                all_parsed = false;
                errors.push(ReportError::Validation(format!("Stage {}: {e}", idx + 1)));
            }
        }
    }

    if !stages.is_empty() && all_parsed && total.is_zero() {
        errors.push(ReportError::Validation(
            "stages must add up to a non-zero duration".to_string(),
        ));
    }

    errors
}

fn validate_thresholds(metric: &str, expressions: &[String]) -> Vec<ReportError> {
    let mut errors = Vec::new();

    if metric.trim().is_empty() {
        errors.push(ReportError::Validation(
            "threshold metric name must not be empty".to_string(),
        ));
    }

    if expressions.is_empty() {
        errors.push(ReportError::Validation(format!(
            "Metric '{metric}': threshold list must not be empty"
        )));
    }

    for source in expressions {
        if let Err(e) = ThresholdExpr::parse(source) {
            errors.push(ReportError::Validation(format!("Metric '{metric}': {e}")));
        }
    }

    errors
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
