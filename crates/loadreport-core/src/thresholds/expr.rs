//! Threshold expressions such as `p(95)<500` or `rate<0.01`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// The aggregated stat a threshold is evaluated against.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    Avg,
    Min,
    Max,
    Med,
    Count,
    Rate,
    Value,
    /// `rank` is the parsed percentile; `text` is how it was written, e.g. `99.90`.
    Percentile { rank: f64, text: String },
}

impl Aggregation {
    /// Key of this stat in a metric's `values` map.
    pub fn key(&self) -> String {
        match self {
            Aggregation::Avg => "avg".to_string(),
            Aggregation::Min => "min".to_string(),
            Aggregation::Max => "max".to_string(),
            Aggregation::Med => "med".to_string(),
            Aggregation::Count => "count".to_string(),
            Aggregation::Rate => "rate".to_string(),
            Aggregation::Value => "value".to_string(),
            Aggregation::Percentile { text, .. } => format!("p({text})"),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    StrictEqual,
    NotEqual,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Equal => "==",
            Operator::StrictEqual => "===",
            Operator::NotEqual => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ThresholdExpr
// ---------------------------------------------------------------------------

/// A parsed threshold condition: `<aggregation> <operator> <bound>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdExpr {
    pub aggregation: Aggregation,
    pub operator: Operator,
    pub bound: f64,
}

fn expr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(avg|min|max|med|count|rate|value|p\(\s*([0-9]+(?:\.[0-9]+)?)\s*\))\s*(===|==|!=|<=|>=|<|>)\s*(-?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)\s*$",
        )
        .expect("threshold regex is valid")
    })
}

impl ThresholdExpr {
    pub fn parse(source: &str) -> Result<Self, ReportError> {
        let invalid = || ReportError::InvalidThreshold(source.to_string());
        let caps = expr_regex().captures(source).ok_or_else(invalid)?;

        let aggregation = match &caps[1] {
            "avg" => Aggregation::Avg,
            "min" => Aggregation::Min,
            "max" => Aggregation::Max,
            "med" => Aggregation::Med,
            "count" => Aggregation::Count,
            "rate" => Aggregation::Rate,
            "value" => Aggregation::Value,
            _ => {
                let text = caps[2].to_string();
                let rank: f64 = text.parse().map_err(|_| invalid())?;
                if !(0.0..=100.0).contains(&rank) {
                    return Err(ReportError::InvalidThreshold(format!(
                        "{source}: percentile must be between 0 and 100"
                    )));
                }
                Aggregation::Percentile { rank, text }
            }
        };

        let operator = match &caps[3] {
            "<" => Operator::Less,
            "<=" => Operator::LessOrEqual,
            ">" => Operator::Greater,
            ">=" => Operator::GreaterOrEqual,
            "==" => Operator::Equal,
            "===" => Operator::StrictEqual,
            _ => Operator::NotEqual,
        };

        let bound: f64 = caps[4].parse().map_err(|_| invalid())?;

        Ok(Self {
            aggregation,
            operator,
            bound,
        })
    }

    /// The value of this threshold's stat in a metric's aggregated values.
    ///
    /// Percentiles are looked up exactly as written, so `p(99.90)` only
    /// matches a `p(99.90)` stat. Returns `None` when the stat is absent.
    pub fn observed(&self, values: &BTreeMap<String, f64>) -> Option<f64> {
        values.get(&self.aggregation.key()).copied()
    }
}

impl FromStr for ThresholdExpr {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ThresholdExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.aggregation, self.operator, self.bound)
    }
}
