//! # Error Types
//!
//! Domain-specific error types for quiver-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quiver-core errors (this file)                                        │
//! │  ├── CoreError        - Cart rule violations                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  quiver-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  quiver-app errors                                                     │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Missing rate data and delivery on an ineligible board are NOT errors.
//! They are coerced by the pricing and cart code.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and pricing errors.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// No rental line at the requested position.
    #[error("Cart has no item at position {index} (cart holds {len} items)")]
    ItemNotFound { index: usize, len: usize },

    /// The board does not offer the requested extra.
    ///
    /// ## When This Occurs
    /// - UI sends a stale extra id after the owner edited the board
    /// - Extra id belongs to a different board
    #[error("Board {board_id} does not offer extra {extra_id}")]
    ExtraNotOffered { board_id: String, extra_id: String },

    /// Extra quantity is zero or negative.
    ///
    /// ## User Workflow
    /// ```text
    /// Stepper: wetsuit x1 ──► tap "-" ──► quantity 0
    ///      │
    ///      ▼
    /// extra_price(.., quantity: 0) → InvalidQuantity
    ///      │
    ///      ▼
    /// Cart removes the selection (never shown to the renter)
    /// ```
    #[error("Invalid extra quantity: {0}")]
    InvalidQuantity(i64),

    /// Cart has reached the maximum number of rental lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before anything enters the cart.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Rental ends before it starts.
    #[error("End date {end} is before start date {start}")]
    InvalidDateRange { start: String, end: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid date, invalid id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ExtraNotOffered {
            board_id: "board-1".to_string(),
            extra_id: "wetsuit".to_string(),
        };
        assert_eq!(err.to_string(), "Board board-1 does not offer extra wetsuit");

        let err = CoreError::ItemNotFound { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "Cart has no item at position 4 (cart holds 2 items)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::InvalidDateRange {
            start: "2024-01-08".to_string(),
            end: "2024-01-01".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "End date 2024-01-01 is before start date 2024-01-08"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "board id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
