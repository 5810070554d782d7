//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Ban not found: {0}")]
    BanNotFound(i32),

    #[error("Unban not found: {0}")]
    UnbanNotFound(i32),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    // =========================================================================
    // Notification Errors
    // =========================================================================
    #[error("Unknown notification channel: {0}")]
    UnknownChannel(String),

    #[error("Malformed notification payload: {0}")]
    MalformedPayload(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Unknown run level: {0}")]
    UnknownRunLevel(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::BanNotFound(_) => "UNKNOWN_BAN",
            Self::UnbanNotFound(_) => "UNKNOWN_UNBAN",
            Self::PlayerNotFound(_) => "UNKNOWN_PLAYER",
            Self::UnknownChannel(_) => "UNKNOWN_CHANNEL",
            Self::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            Self::UnknownRunLevel(_) => "UNKNOWN_RUN_LEVEL",
            Self::InvalidData(_) => "INVALID_DATA",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BanNotFound(_) | Self::UnbanNotFound(_) | Self::PlayerNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownChannel(_)
                | Self::MalformedPayload(_)
                | Self::UnknownRunLevel(_)
                | Self::InvalidData(_)
        )
    }
}
