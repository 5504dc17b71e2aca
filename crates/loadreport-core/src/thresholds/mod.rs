pub mod expr;

pub use expr::{Aggregation, Operator, ThresholdExpr};

use crate::options::LoadOptions;
use crate::results::RunResult;

/// A threshold declared in the load options that the run result does not report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreportedThreshold {
    pub metric: String,
    pub threshold: String,
}

/// List thresholds declared in `options` that have no outcome in `result`.
///
/// The run result is the only source of pass/fail: nothing is evaluated or
/// inserted here, callers only report the mismatch.
pub fn unreported_thresholds(result: &RunResult, options: &LoadOptions) -> Vec<UnreportedThreshold> {
    let mut missing = Vec::new();

    for (metric_name, expressions) in &options.thresholds {
        let reported = result
            .metrics
            .get(metric_name)
            .and_then(|m| m.thresholds.as_ref());
        for source in expressions {
            if !reported.is_some_and(|t| t.contains_key(source)) {
                missing.push(UnreportedThreshold {
                    metric: metric_name.clone(),
                    threshold: source.clone(),
                });
            }
        }
    }

    missing
}
