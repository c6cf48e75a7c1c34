//! Error types for the library layer.

use std::fmt;

use crate::config::NameConfigError;

/// Errors produced by the library layer: configuration failures at startup
/// and caller input rejected by validation helpers.
///
/// Empty names, fuzzy searches with no match, and sources that supply no
/// records are normal outcomes and never surface here.
#[derive(Debug)]
pub enum HoopRankError {
    /// The name configuration could not be loaded or validated.
    Config(NameConfigError),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for HoopRankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for HoopRankError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<NameConfigError> for HoopRankError {
    fn from(e: NameConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<serde_json::Error> for HoopRankError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

/// Validate a similarity threshold supplied by a caller.
pub fn validate_threshold(threshold: f64) -> Result<f64, HoopRankError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(HoopRankError::InvalidInput(format!(
            "threshold must be between 0.0 and 1.0, got {}",
            threshold
        )));
    }
    Ok(threshold)
}
