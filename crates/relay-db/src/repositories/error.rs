//! Error handling utilities for repositories

use relay_core::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Report a row that could not be mapped to a domain entity
pub fn invalid_row(table: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::InvalidData(format!("{table}: {detail}"))
}
