pub mod error;
pub mod handler;
pub mod options;
pub mod report;
pub mod results;
pub mod thresholds;

pub use error::ReportError;
