//! Common error types for Spectre components.

use thiserror::Error;

/// Common errors across Spectre components
#[derive(Debug, Error)]
pub enum SpectreError {
    /// Requested category has no template in the catalog
    #[error("Unknown mission category: {0}")]
    UnknownCategory(String),

    /// Malformed request input (bad difficulty, empty fields, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Mission document not found
    #[error("Mission not found: {0}")]
    MissionNotFound(String),

    /// Step id does not exist on the mission
    #[error("Step not found: {0}")]
    StepNotFound(String),

    /// Optimistic-concurrency write lost the race
    #[error("Concurrent update conflict on mission {0}")]
    CasConflict(String),

    /// Redis connection/operation error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SpectreError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownCategory(_) => 404,
            Self::InvalidInput(_) => 400,
            Self::MissionNotFound(_) => 404,
            Self::StepNotFound(_) => 404,
            Self::CasConflict(_) => 409,
            Self::Storage(_) => 503,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CasConflict(_) | Self::Storage(_))
    }
}
