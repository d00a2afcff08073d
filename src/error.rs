use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building an analyzer. Analysis itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid pattern in category '{category}': {source}")]
    InvalidPattern {
        category: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("cap for category '{category}' must be a finite non-negative number, got {value}")]
    InvalidCap { category: String, value: f64 },
}

/// A single detector failing on a particular input. The aggregator skips
/// the detector and keeps going.
#[derive(Debug, Error)]
#[error("detector '{category}' failed: {reason}")]
pub struct DetectorError {
    pub category: String,
    pub reason: String,
}

impl DetectorError {
    pub fn new(category: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            reason: reason.into(),
        }
    }
}
