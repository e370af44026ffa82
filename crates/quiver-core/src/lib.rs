//! # quiver-core: Pure Pricing Logic for Quiver
//!
//! This crate prices a surfboard rental cart. It contains the rate blending,
//! delivery grouping and cart mutation rules as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Quiver Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Mobile UI (React Native)                       │   │
//! │  │    Map/List ──► Board Detail ──► Cart ──► Checkout              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    quiver-app commands                          │   │
//! │  │    add_to_cart, set_delivery, set_extra_quantity, get_cart      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ quiver-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │   cart    │  │ snapshot  │  │   │
//! │  │   │   Board   │  │  rental   │  │   Cart    │  │ rehydrate │  │   │
//! │  │   │  Extras   │  │ delivery  │  │RentalItem │  │  catalog  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              quiver-db (Catalog + Cart Store)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog types (Board, BoardExtra) and pricing outputs
//! - [`money`] - Money type with integer arithmetic
//! - [`pricing`] - Rental, extra, delivery and grand total calculators
//! - [`cart`] - The cart and its mutation operations
//! - [`catalog`] - Read-only board lookup
//! - [`snapshot`] - Persisted cart shape and rehydration
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use quiver_core::money::Money;
//! use quiver_core::pricing::rental_price;
//! use quiver_core::RateClassification;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
//!
//! // 8 days: one week at $150 plus one day at $30
//! let pricing = rental_price(
//!     start,
//!     end,
//!     Some(Money::from_major(30)),
//!     Some(Money::from_major(150)),
//! );
//! assert_eq!(pricing.days, 8);
//! assert_eq!(pricing.rental_subtotal, Money::from_major(180));
//! assert_eq!(pricing.rate_classification, RateClassification::Weekly);
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod snapshot;
pub mod types;
pub mod validation;

pub use cart::{Cart, ExtraRequest, ExtraSelection, RentalItem};
pub use catalog::{Catalog, InMemoryCatalog};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{CartTotals, DeliveryGroup, DeliveryPolicy, ItemPricing};
pub use snapshot::{rehydrate, CartSnapshot, DropReason, DroppedItem, Rehydration};
pub use types::*;

/// Maximum rental lines allowed in a single cart.
///
/// ## Business Reason
/// Carts are expected to hold low tens of boards. The cap stops a runaway
/// client from growing the cart without bound.
pub const MAX_CART_ITEMS: usize = 50;

/// Maximum quantity of a single extra on one rental line.
pub const MAX_EXTRA_QUANTITY: i64 = 20;

/// Number of days in a rental week.
pub const DAYS_PER_WEEK: i64 = 7;
