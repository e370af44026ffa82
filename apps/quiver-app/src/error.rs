//! # Error Types
//!
//! Errors returned to the UI and errors raised while loading configuration.
//!
//! ## Error Translation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError ──────┐                                                      │
//! │  DbError ────────┼──► ApiError { code, message } ──► JSON ──► UI        │
//! │  ValidationError ┘                                                      │
//! │                                                                         │
//! │  The UI switches on `code`; `message` is shown to the renter.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use quiver_core::{CoreError, ValidationError};
use quiver_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// Error payload returned by every fallible command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error categories the UI reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Board or cart line not found
    NotFound,

    /// Input validation failed (dates, quantities, unknown extras)
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Cart rule violated (cart full)
    CartError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::ExtraNotOffered { .. } | CoreError::InvalidQuantity(_) => {
                ApiError::validation(err.to_string())
            }
            CoreError::CartTooLarge { .. } => ApiError::new(ErrorCode::CartError, err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::Validation(e) => ApiError::from(e),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::InvalidData(e) => {
                tracing::error!("Stored data could not be decoded: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Stored data is corrupt")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Failures while loading `quiver.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_codes() {
        let err = ApiError::from(CoreError::ItemNotFound { index: 2, len: 1 });
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = ApiError::from(CoreError::CartTooLarge { max: 50 });
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(err.message, "Cart cannot have more than 50 items");

        let err = ApiError::from(CoreError::Validation(ValidationError::InvalidDateRange {
            start: "2024-01-08".to_string(),
            end: "2024-01-01".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err = ApiError::from(DbError::QueryFailed("near \"SELEC\": syntax error".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");

        let err = ApiError::from(DbError::not_found("Board", "gun-1"));
        assert_eq!(err, ApiError::not_found("Board", "gun-1"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::validation("bad date")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "bad date");
    }
}
