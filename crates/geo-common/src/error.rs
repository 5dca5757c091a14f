//! Error types for the GeoJSON ingestion services.

use thiserror::Error;

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;

/// Primary error type for ingestion operations.
///
/// Request-level errors abort the whole request before anything is
/// persisted; per-feature errors are collected by the orchestrator and
/// reported in the ingest summary instead of being raised to the caller.
#[derive(Debug, Error)]
pub enum GeoError {
    // === Request-level errors ===
    #[error("invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("invalid JSON: {0}")]
    Decode(String),

    // === Per-feature errors ===
    #[error("feature {index}: {message}")]
    FeatureInvalid { index: usize, message: String },

    // === Storage errors ===
    #[error("database error: {0}")]
    Database(String),

    #[error("database connection failed: {0}")]
    Connection(String),

    // === Infrastructure errors ===
    #[error("internal error: {0}")]
    Internal(String),
}

impl GeoError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            GeoError::InvalidGeoJson(_)
            | GeoError::Decode(_)
            | GeoError::FeatureInvalid { .. } => 400,

            GeoError::Connection(_) => 503,

            _ => 500,
        }
    }

    /// True for errors that fail the whole request rather than a single feature.
    pub fn is_request_fatal(&self) -> bool {
        matches!(self, GeoError::InvalidGeoJson(_) | GeoError::Decode(_))
    }
}

// Conversion from common error types
impl From<std::io::Error> for GeoError {
    fn from(err: std::io::Error) -> Self {
        GeoError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GeoError::InvalidGeoJson("no features".into()).http_status_code(), 400);
        assert_eq!(GeoError::Decode("bad json".into()).http_status_code(), 400);
        assert_eq!(GeoError::Database("insert failed".into()).http_status_code(), 500);
        assert_eq!(GeoError::Connection("refused".into()).http_status_code(), 503);
    }

    #[test]
    fn test_feature_error_message_carries_index() {
        let err = GeoError::FeatureInvalid {
            index: 3,
            message: "unsupported geometry type: Circle".into(),
        };
        assert_eq!(
            err.to_string(),
            "feature 3: unsupported geometry type: Circle"
        );
    }

    #[test]
    fn test_request_fatal_classification() {
        assert!(GeoError::Decode("x".into()).is_request_fatal());
        assert!(GeoError::InvalidGeoJson("x".into()).is_request_fatal());
        assert!(!GeoError::FeatureInvalid { index: 1, message: "x".into() }.is_request_fatal());
        assert!(!GeoError::Database("x".into()).is_request_fatal());
    }
}
