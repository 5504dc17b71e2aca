use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Malformed run result: {0}")]
    MalformedResult(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid threshold expression: {0}")]
    InvalidThreshold(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

impl Serialize for ReportError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
