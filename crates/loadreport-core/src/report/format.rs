//! Value formatting for the text summary.

/// Fixed unit for time values, from the run's `summaryTimeUnit` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Millis,
    Micros,
}

impl TimeUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "s" => Some(TimeUnit::Seconds),
            "ms" => Some(TimeUnit::Millis),
            "us" | "µs" => Some(TimeUnit::Micros),
            _ => None,
        }
    }
}

/// Format `value` with at most `decimals` places, dropping trailing zeros.
pub fn trim_float(value: f64, decimals: usize) -> String {
    let s = format!("{value:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Plain number: integers without decimals, fractions with up to six places.
pub fn format_number(value: f64) -> String {
    trim_float(value, 6)
}

/// Humanize a duration given in milliseconds: `512ns`, `24.5µs`, `125.46ms`,
/// `2.5s`, `1m3s`.
pub fn format_duration_ms(ms: f64, unit: Option<TimeUnit>) -> String {
    match unit {
        Some(TimeUnit::Seconds) => return format!("{}s", trim_float(ms / 1_000.0, 2)),
        Some(TimeUnit::Millis) => return format!("{}ms", trim_float(ms, 2)),
        Some(TimeUnit::Micros) => return format!("{}µs", trim_float(ms * 1_000.0, 2)),
        None => {}
    }

    if ms == 0.0 {
        return "0s".to_string();
    }
    let abs = ms.abs();
    if abs >= 60_000.0 {
        let minutes = (ms / 60_000.0).trunc();
        let seconds = (ms - minutes * 60_000.0) / 1_000.0;
        format!("{minutes}m{}s", trim_float(seconds, 1))
    } else if abs >= 1_000.0 {
        format!("{}s", trim_float(ms / 1_000.0, 2))
    } else if abs >= 1.0 {
        format!("{}ms", trim_float(ms, 2))
    } else if abs >= 0.001 {
        format!("{}µs", trim_float(ms * 1_000.0, 2))
    } else {
        format!("{}ns", trim_float(ms * 1_000_000.0, 2))
    }
}

/// SI byte sizes: `512 B`, `1.2 kB`, `3.4 MB`.
pub fn format_bytes(bytes: f64) -> String {
    const UNITS: [&str; 6] = ["B", "kB", "MB", "GB", "TB", "PB"];
    let mut value = bytes;
    let mut idx = 0;
    while value.abs() >= 1_000.0 && idx < UNITS.len() - 1 {
        value /= 1_000.0;
        idx += 1;
    }
    if idx == 0 {
        format!("{} B", trim_float(value, 0))
    } else {
        format!("{} {}", trim_float(value, 1), UNITS[idx])
    }
}
