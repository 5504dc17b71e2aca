use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

use crate::error::ReportError;

fn segment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)(ms|h|m|s)").expect("duration regex is valid"))
}

/// Parse a stage duration such as `1m`, `1m30s`, `1.5s` or `500ms`.
pub fn parse_duration(source: &str) -> Result<Duration, ReportError> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(ReportError::InvalidDuration("empty duration".to_string()));
    }

    let mut total_ms = 0.0_f64;
    let mut consumed = 0;
    for caps in segment_regex().captures_iter(trimmed) {
        let whole = caps.get(0).map(|m| (m.start(), m.end()));
        // Segments must be contiguous: "1m 30s" or "1mx" are rejected.
        match whole {
            Some((start, end)) if start == consumed => consumed = end,
            _ => return Err(ReportError::InvalidDuration(source.to_string())),
        }
        let amount: f64 = caps[1]
            .parse()
            .map_err(|_| ReportError::InvalidDuration(source.to_string()))?;
        let unit_ms = match &caps[2] {
            "h" => 3_600_000.0,
            "m" => 60_000.0,
            "s" => 1_000.0,
            _ => 1.0,
        };
        total_ms += amount * unit_ms;
    }

    if consumed != trimmed.len() {
        return Err(ReportError::InvalidDuration(source.to_string()));
    }

    Ok(Duration::from_micros((total_ms * 1_000.0).round() as u64))
}

/// Render a duration the way stage durations are written, e.g. `1m30s`.
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    if total_ms == 0 {
        return "0s".to_string();
    }
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 {
        out.push_str(&format!("{seconds}s"));
    }
    if millis > 0 {
        out.push_str(&format!("{millis}ms"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_units() {
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn parses_compound_and_fractional() {
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("1h1m1s").unwrap(), Duration::from_secs(3661));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn zero_is_allowed() {
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn rejects_invalid_input() {
        for source in ["", "  ", "10", "1x", "m", "1m 30s", "1mfoo", "-1s"] {
            assert!(
                matches!(parse_duration(source), Err(ReportError::InvalidDuration(_))),
                "{source:?} should be rejected"
            );
        }
    }

    #[test]
    fn format_round_trips_common_values() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2m");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1s500ms");
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }
}
