pub mod duration;
pub mod io;
pub mod model;
pub mod validation;

pub use duration::{format_duration, parse_duration};
pub use io::read_options;
pub use model::{LoadOptions, Stage};
pub use validation::validate_options;

/// One-line description of a load profile, e.g. for `validate` output.
pub fn describe_options(options: &LoadOptions) -> String {
    let mut parts = vec![format!("vus={}", options.vus)];
    if options.has_stages() {
        parts.push(format!("max_vus={}", options.max_vus()));
        parts.push(format!("stages={}", options.stages.len()));
        if let Ok(total) = options.total_duration() {
            parts.push(format!("duration={}", format_duration(total)));
        }
    }
    if let Some(iterations) = options.iterations {
        parts.push(format!("iterations={iterations}"));
    }
    parts.push(format!("thresholds={}", options.threshold_count()));
    parts.join(" ")
}
