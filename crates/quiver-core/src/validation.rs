//! # Validation Module
//!
//! Input validation for boards, dates and extras.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Mobile UI                                                     │
//! │  ├── Date picker never offers an end before the start                  │
//! │  └── Extra stepper stops at the owner's stock                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: quiver-app command                                            │
//! │  ├── Date strings parsed here (parse_rental_date)                      │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite catalog                                                │
//! │  └── CHECK constraints on rates                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quiver_core::validation::{parse_rental_date, validate_date_range};
//!
//! let start = parse_rental_date("start date", "2024-01-01").unwrap();
//! let end = parse_rental_date("end date", "2024-01-08").unwrap();
//! assert!(validate_date_range(start, end).is_ok());
//! assert!(validate_date_range(end, start).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Board;
use crate::MAX_EXTRA_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest board or owner id accepted from the catalog.
const MAX_ID_LEN: usize = 64;

// =============================================================================
// Dates
// =============================================================================

/// Parses an ISO `YYYY-MM-DD` date as sent by the UI.
pub fn parse_rental_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected a date like 2024-01-31".to_string(),
    })
}

/// Validates that a rental does not end before it starts.
///
/// Same-day rentals (`start == end`) are valid and count as one day.
pub fn validate_date_range(start_date: NaiveDate, end_date: NaiveDate) -> ValidationResult<()> {
    if end_date < start_date {
        return Err(ValidationError::InvalidDateRange {
            start: start_date.to_string(),
            end: end_date.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numbers
// =============================================================================

/// Validates an extra quantity that is about to be stored.
///
/// ## Rules
/// - Must be between 1 and MAX_EXTRA_QUANTITY (20)
///
/// Zero and negative values never reach this check. The cart treats them as
/// removal first.
pub fn validate_extra_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_EXTRA_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "extra quantity".to_string(),
            min: 1,
            max: MAX_EXTRA_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a listed rate. Zero is allowed (free leash).
pub fn validate_rate(field: &str, rate: Money) -> ValidationResult<()> {
    if rate.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Catalog Data
// =============================================================================

/// Validates a catalog id (board, owner or extra).
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Letters, numbers, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use quiver_core::validation::validate_id;
///
/// assert!(validate_id("board id", "firewire-72").is_ok());
/// assert!(validate_id("board id", "").is_err());
/// assert!(validate_id("board id", "has space").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("must be at most {} characters", MAX_ID_LEN),
        });
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a board before it enters the cart or the catalog store.
///
/// Missing rates are fine. Negative rates are not.
pub fn validate_board(board: &Board) -> ValidationResult<()> {
    validate_id("board id", &board.id)?;
    validate_id("owner id", &board.owner_id)?;

    if let Some(daily) = board.daily_rate {
        validate_rate("daily rate", daily)?;
    }
    if let Some(weekly) = board.weekly_rate {
        validate_rate("weekly rate", weekly)?;
    }
    validate_rate("delivery rate", board.delivery_flat_rate)?;

    for extra in &board.extras {
        validate_id("extra id", &extra.id)?;
        validate_rate("extra daily rate", extra.daily_rate)?;
        validate_rate("extra weekly rate", extra.weekly_rate)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::*;

    #[test]
    fn test_parse_rental_date() {
        assert_eq!(
            parse_rental_date("start date", " 2024-03-09 "),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
        );
        assert!(matches!(
            parse_rental_date("start date", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_rental_date("start date", "03/09/2024"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(parse_rental_date("end date", "2024-02-30").is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        assert!(validate_date_range(day, day).is_ok());
        assert!(validate_date_range(day, next).is_ok());
        assert_eq!(
            validate_date_range(next, day),
            Err(ValidationError::InvalidDateRange {
                start: "2024-01-02".to_string(),
                end: "2024-01-01".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_extra_quantity() {
        assert!(validate_extra_quantity(1).is_ok());
        assert!(validate_extra_quantity(MAX_EXTRA_QUANTITY).is_ok());
        assert!(validate_extra_quantity(0).is_err());
        assert!(validate_extra_quantity(MAX_EXTRA_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("board id", "board_1").is_ok());
        assert!(validate_id("board id", "   ").is_err());
        assert!(validate_id("board id", &"b".repeat(65)).is_err());
        assert!(validate_id("board id", "board/1").is_err());
    }

    #[test]
    fn test_validate_board() {
        assert!(validate_board(&longboard()).is_ok());

        let mut unpriced = longboard();
        unpriced.daily_rate = None;
        unpriced.weekly_rate = None;
        assert!(validate_board(&unpriced).is_ok());

        let mut negative = longboard();
        negative.weekly_rate = Some(Money::from_cents(-1));
        assert_eq!(
            validate_board(&negative),
            Err(ValidationError::MustNotBeNegative {
                field: "weekly rate".to_string()
            })
        );

        let mut bad_extra = longboard();
        bad_extra.extras[0].daily_rate = Money::from_cents(-500);
        assert!(validate_board(&bad_extra).is_err());

        let mut no_owner = longboard();
        no_owner.owner_id = String::new();
        assert!(validate_board(&no_owner).is_err());
    }
}
