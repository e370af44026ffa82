//! # Pricing
//!
//! Rental, extra, delivery and grand total calculators.
//!
//! ## Rate Blending
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  days = (end - start) + 1            (same-day rental = 1 day)          │
//! │  weeks = days / 7, remainder = days % 7                                 │
//! │                                                                         │
//! │  weeks > 0 AND weekly rate?                                             │
//! │     ├── yes ──► weeks × weekly  (+ remainder × daily, if daily listed)  │
//! │     │           classification: Weekly                                  │
//! │     └── no ───► daily rate?                                             │
//! │                    ├── yes ──► days × daily        Daily                │
//! │                    └── no ───► 0                   Unavailable          │
//! │                                                                         │
//! │  Example: $30/day, $150/week, 8 days → 150 + 30 = $180                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The weekly path wins whenever it applies, even on the odd day count where
//! pure daily pricing would be cheaper. That is pricing policy.
//!
//! ## Delivery Tiers
//! ```text
//! Items per owner:   1     2     3     4     5
//! Fee:              $50   $50   $60   $70   $80
//! ```
//!
//! Everything here is a pure function of its inputs. Nothing is cached.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, ExtraSelection, RentalItem};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::RateClassification;
use crate::DAYS_PER_WEEK;

// =============================================================================
// Outputs
// =============================================================================

/// Price of one rental line, before extras and delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemPricing {
    pub days: i64,
    pub rental_subtotal: Money,
    pub rate_classification: RateClassification,
}

/// Delivery charge for all delivered items from one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryGroup {
    pub owner_id: String,
    pub owner_name: String,
    pub item_count: usize,
    pub total_fee: Money,
    /// Items in this group, in cart order.
    pub item_ids: Vec<String>,
}

/// Cart totals summary for the checkout screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub rental_subtotal: Money,
    pub extras_subtotal: Money,
    pub delivery_total: Money,
    pub grand_total: Money,
    /// Lines with no usable rate ("Price TBD").
    pub unpriced_item_count: usize,
}

// =============================================================================
// Delivery Policy
// =============================================================================

/// Tiered per-owner delivery fee.
///
/// `fee(n) = base_fee` for `n <= included_items`, then
/// `additional_item_fee` for each item beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPolicy {
    pub base_fee: Money,
    pub included_items: usize,
    pub additional_item_fee: Money,
}

impl DeliveryPolicy {
    /// Fee for one owner delivering `item_count` boards.
    ///
    /// ## Example
    /// ```rust
    /// use quiver_core::{DeliveryPolicy, Money};
    ///
    /// let policy = DeliveryPolicy::default();
    /// assert_eq!(policy.fee(2), Money::from_major(50));
    /// assert_eq!(policy.fee(5), Money::from_major(80));
    /// ```
    pub fn fee(&self, item_count: usize) -> Money {
        if item_count == 0 {
            return Money::zero();
        }
        let extra_items = item_count.saturating_sub(self.included_items) as i64;
        self.base_fee + self.additional_item_fee.times(extra_items)
    }
}

impl Default for DeliveryPolicy {
    /// $50 covers up to two boards, $10 per board after that.
    fn default() -> Self {
        DeliveryPolicy {
            base_fee: Money::from_major(50),
            included_items: 2,
            additional_item_fee: Money::from_major(10),
        }
    }
}

// =============================================================================
// Calculators
// =============================================================================

/// Inclusive day count. Does not validate ordering.
#[inline]
pub fn rental_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days() + 1
}

fn blend(
    days: i64,
    daily_rate: Option<Money>,
    weekly_rate: Option<Money>,
) -> (Money, RateClassification) {
    let weeks = days / DAYS_PER_WEEK;
    let remainder = days % DAYS_PER_WEEK;

    match (weekly_rate, daily_rate) {
        (Some(weekly), daily) if weeks > 0 => {
            let mut subtotal = weekly.times(weeks);
            if let Some(daily) = daily.filter(|_| remainder > 0) {
                subtotal += daily.times(remainder);
            }
            (subtotal, RateClassification::Weekly)
        }
        (_, Some(daily)) => (daily.times(days), RateClassification::Daily),
        _ => (Money::zero(), RateClassification::Unavailable),
    }
}

/// Prices a rental from its date range and rate table.
///
/// The caller guarantees `end_date >= start_date`. An inverted range yields a
/// zero or negative day count rather than an error.
pub fn rental_price(
    start_date: NaiveDate,
    end_date: NaiveDate,
    daily_rate: Option<Money>,
    weekly_rate: Option<Money>,
) -> ItemPricing {
    let days = rental_days(start_date, end_date);
    let (rental_subtotal, rate_classification) = blend(days, daily_rate, weekly_rate);
    ItemPricing {
        days,
        rental_subtotal,
        rate_classification,
    }
}

/// Prices an extra: the rental blending rule with both rates scaled by
/// `quantity`.
///
/// ## Errors
/// `CoreError::InvalidQuantity` for `quantity <= 0`. Cart code treats that
/// as "remove the extra".
pub fn extra_price(
    days: i64,
    daily_rate: Money,
    weekly_rate: Money,
    quantity: i64,
) -> CoreResult<Money> {
    if quantity <= 0 {
        return Err(CoreError::InvalidQuantity(quantity));
    }
    let (total, _) = blend(
        days,
        Some(daily_rate.times(quantity)),
        Some(weekly_rate.times(quantity)),
    );
    Ok(total)
}

// =============================================================================
// Cart Queries
// =============================================================================

/// Rental price of one cart line.
pub fn item_pricing(item: &RentalItem) -> ItemPricing {
    rental_price(
        item.start_date,
        item.end_date,
        item.board.daily_rate,
        item.board.weekly_rate,
    )
}

/// Price of one extra on a cart line, from the line's current day count.
pub fn extra_pricing(item: &RentalItem, extra: &ExtraSelection) -> CoreResult<Money> {
    extra_price(item.days(), extra.daily_rate, extra.weekly_rate, extra.quantity)
}

/// Sum of all extras on a line, recomputed from their rates.
pub fn extras_subtotal(item: &RentalItem) -> Money {
    item.extras
        .iter()
        .filter_map(|extra| extra_pricing(item, extra).ok())
        .sum()
}

/// Groups delivered lines by owner, in order of first appearance.
///
/// Lines without delivery selected, or on boards that are not delivered,
/// are left out.
pub fn delivery_breakdown(cart: &Cart, policy: &DeliveryPolicy) -> Vec<DeliveryGroup> {
    let mut groups: Vec<DeliveryGroup> = Vec::new();

    for item in cart.items().iter().filter(|item| item.delivers()) {
        let owner_id = &item.board.owner_id;
        match groups.iter_mut().find(|g| &g.owner_id == owner_id) {
            Some(group) => group.item_ids.push(item.item_id.clone()),
            None => groups.push(DeliveryGroup {
                owner_id: owner_id.clone(),
                owner_name: item.board.owner_name.clone(),
                item_count: 0,
                total_fee: Money::zero(),
                item_ids: vec![item.item_id.clone()],
            }),
        }
    }

    for group in &mut groups {
        group.item_count = group.item_ids.len();
        group.total_fee = policy.fee(group.item_count);
    }

    groups
}

/// Sum of all owner delivery fees.
pub fn delivery_total(cart: &Cart, policy: &DeliveryPolicy) -> Money {
    delivery_breakdown(cart, policy)
        .iter()
        .map(|g| g.total_fee)
        .sum()
}

/// The payable amount: rentals + extras + delivery.
pub fn grand_total(cart: &Cart, policy: &DeliveryPolicy) -> Money {
    cart_totals(cart, policy).grand_total
}

/// Full totals summary.
pub fn cart_totals(cart: &Cart, policy: &DeliveryPolicy) -> CartTotals {
    let mut rental_subtotal = Money::zero();
    let mut extras = Money::zero();
    let mut unpriced_item_count = 0;

    for item in cart.items() {
        let pricing = item_pricing(item);
        if !pricing.rate_classification.is_priced() {
            unpriced_item_count += 1;
        }
        rental_subtotal += pricing.rental_subtotal;
        extras += extras_subtotal(item);
    }

    let delivery_total = delivery_total(cart, policy);

    CartTotals {
        item_count: cart.len(),
        rental_subtotal,
        extras_subtotal: extras,
        delivery_total,
        grand_total: rental_subtotal + extras + delivery_total,
        unpriced_item_count,
    }
}
