//! Error types for CityTrotter

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CitytrotterError {
    // Site errors
    #[error("No location selected. Select a location on the map before analyzing")]
    NoLocationSelected,

    #[error("Invalid location ({lat}, {lng}): {reason}")]
    InvalidLocation { lat: f64, lng: f64, reason: String },

    #[error("Invalid building parameter {field}: {reason}")]
    InvalidParameters { field: &'static str, reason: String },

    // Analysis errors
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CitytrotterError {
    /// True for errors raised before any call to the analysis service
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CitytrotterError::NoLocationSelected
                | CitytrotterError::InvalidLocation { .. }
                | CitytrotterError::InvalidParameters { .. }
        )
    }
}

/// Coarse classification of an analysis service failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Server,
}

/// Failure reported by the analysis service or the transport reaching it.
///
/// Cloneable so the latest failure can be kept in the result store next to
/// the previously accepted result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Analysis service unreachable: {reason}")]
    Network { reason: String },

    #[error("Analysis request timed out after {}s", after.as_secs_f64())]
    Timeout { after: Duration },

    #[error("Analysis service returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode analysis response: {reason}")]
    Decode { reason: String },
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Network { .. } | AnalysisError::Timeout { .. } => ErrorKind::Network,
            AnalysisError::Server { .. } | AnalysisError::Decode { .. } => ErrorKind::Server,
        }
    }
}

pub type Result<T> = std::result::Result<T, CitytrotterError>;
