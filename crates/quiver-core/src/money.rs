//! # Money Module
//!
//! Provides the `Money` type for rental rates, fees and totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A board listed at $29.99/day for 3 days in floating point:            │
//! │    29.99 * 3 = 89.97000000000001  ❌                                    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    2999 cents * 3 = 8997 cents  ✅                                      │
//! │                                                                         │
//! │  Rental pricing only multiplies and adds, so integer cents are exact.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quiver_core::money::Money;
//!
//! let daily = Money::from_cents(2999); // $29.99
//! let three_days = daily * 3;
//! assert_eq!(three_days.cents(), 8997);
//!
//! let weekly = Money::from_major(150); // $150.00
//! assert_eq!((weekly + daily).to_string(), "$179.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Board.daily_rate ──┐                                                   │
/// │  Board.weekly_rate ─┴──► rental_price() ──► ItemPricing.rental_subtotal │
/// │                                                                         │
/// │  BoardExtra rates ──► extra_price() ──► ExtraSelection.computed_total   │
/// │                                                                         │
/// │  DeliveryPolicy ──► DeliveryPolicy::fee() ──► DeliveryGroup.total_fee   │
/// │                                                                         │
/// │  All of the above ──► grand_total() ──► shown on the checkout screen    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use quiver_core::money::Money;
    ///
    /// let rate = Money::from_cents(3050); // $30.50
    /// assert_eq!(rate.cents(), 3050);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use quiver_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(50).cents(), 5000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (dollars).
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a count (days, weeks, quantity).
    ///
    /// ## Example
    /// ```rust
    /// use quiver_core::money::Money;
    ///
    /// let wetsuit_daily = Money::from_major(10);
    /// assert_eq!(wetsuit_daily.times(2).cents(), 2000);
    /// ```
    #[inline]
    pub const fn times(&self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly `$12.34` rendering.
///
/// ## Note
/// The UI formats currency itself. `ConfigState::format_currency` in
/// quiver-app handles configured symbols.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        self.times(count)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}
