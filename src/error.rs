//! Error types for telemetry ingestion and queries.

use thiserror::Error;

/// Main error type for ingestion, processing and query operations.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Queue is closed")]
    QueueClosed,

    #[error("Failed to decode {kind} payload: {message}")]
    PayloadDecode { kind: String, message: String },

    #[error("Rocket not found: {0}")]
    NotFound(String),

    #[error("Store failure: {0}")]
    StoreFailure(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to spawn worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

impl TelemetryError {
    /// Whether the caller may retry the same request later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TelemetryError::QueueFull { .. })
    }
}

impl From<serde_json::Error> for TelemetryError {
    fn from(e: serde_json::Error) -> Self {
        TelemetryError::InvalidEvent(e.to_string())
    }
}

/// Result type for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_queue_full_is_recoverable() {
        assert!(TelemetryError::QueueFull { capacity: 4 }.is_recoverable());
        assert!(!TelemetryError::QueueClosed.is_recoverable());
        assert!(!TelemetryError::NotFound("x".into()).is_recoverable());
    }

    #[test]
    fn test_messages() {
        let err = TelemetryError::PayloadDecode {
            kind: "RocketLaunched".into(),
            message: "missing field".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to decode RocketLaunched payload: missing field"
        );
        assert_eq!(
            TelemetryError::NotFound("abc".into()).to_string(),
            "Rocket not found: abc"
        );
    }
}
