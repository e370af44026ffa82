//! # Cart
//!
//! The renter's cart and every operation that changes it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Operations                                 │
//! │                                                                         │
//! │  UI Action                Cart Method                 State Change      │
//! │  ─────────                ───────────                 ────────────      │
//! │                                                                         │
//! │  Book board ────────────► add_rental_item() ────────► items.push(item)  │
//! │                                                                         │
//! │  Delivery toggle ───────► set_delivery_selected() ──► item.delivery     │
//! │                                                                         │
//! │  Extra stepper ─────────► set_extra_quantity() ─────► item.extras[..]   │
//! │                                                                         │
//! │  Size picker ───────────► set_extra_size() ─────────► extra.size        │
//! │                                                                         │
//! │  Swipe to delete ───────► remove_rental_item() ─────► items.remove(i)   │
//! │                                                                         │
//! │  Clear all ─────────────► clear() ──────────────────► items.clear()     │
//! │                                                                         │
//! │  Totals are NEVER cached here. `pricing` recomputes them on every read. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every item satisfies `end_date >= start_date`
//! - `delivery_selected` is only true on delivery-eligible boards
//! - Every extra selection has `quantity >= 1` and is offered by its board
//! - A failed mutation leaves the cart untouched

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{self, CartTotals, DeliveryPolicy};
use crate::types::Board;
use crate::validation;
use crate::MAX_CART_ITEMS;

// =============================================================================
// Extra Selection
// =============================================================================

/// One add-on attached to a rental line.
///
/// `computed_total` is a display cache. Totals recompute it from the rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExtraSelection {
    pub extra_id: String,
    pub name: String,
    pub daily_rate: Money,
    pub weekly_rate: Money,
    pub quantity: i64,
    pub size: Option<String>,
    pub computed_total: Money,
}

/// An extra the renter picked while adding a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExtraRequest {
    pub extra_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub size: Option<String>,
}

// =============================================================================
// Rental Item
// =============================================================================

/// One board rental line in the cart.
///
/// ## Design Notes
/// `board` is a frozen copy of the catalog entry taken when the line was
/// added. Rates shown in the cart do not shift while the renter is checking
/// out. Rehydration refreshes the copy from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RentalItem {
    /// Stable identity: board id plus insertion sequence.
    pub item_id: String,

    /// Board snapshot (rates, owner, offered extras).
    pub board: Board,

    /// First rental day (inclusive).
    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Last rental day (inclusive).
    #[ts(as = "String")]
    pub end_date: NaiveDate,

    /// Renter asked for delivery.
    pub delivery_selected: bool,

    /// Selected add-ons in the order they were picked.
    pub extras: Vec<ExtraSelection>,
}

impl RentalItem {
    /// Builds a line, coercing delivery off for boards that are not delivered.
    pub(crate) fn new(
        item_id: String,
        board: Board,
        start_date: NaiveDate,
        end_date: NaiveDate,
        delivery_selected: bool,
    ) -> Self {
        let delivery_selected = delivery_selected && board.delivery_eligible;
        RentalItem {
            item_id,
            board,
            start_date,
            end_date,
            delivery_selected,
            extras: Vec::new(),
        }
    }

    /// Number of rental days (inclusive range).
    pub fn days(&self) -> i64 {
        pricing::rental_days(self.start_date, self.end_date)
    }

    /// True when this line takes part in delivery grouping.
    pub fn delivers(&self) -> bool {
        self.delivery_selected && self.board.delivery_eligible
    }

    /// Looks up a selected extra by id.
    pub fn extra(&self, extra_id: &str) -> Option<&ExtraSelection> {
        self.extras.iter().find(|e| e.extra_id == extra_id)
    }

    /// Inserts, updates or (for `quantity <= 0`) removes an extra selection.
    pub(crate) fn apply_extra_quantity(&mut self, extra_id: &str, quantity: i64) -> CoreResult<()> {
        let offered = match self.board.extra(extra_id) {
            Some(extra) => extra,
            None if quantity <= 0 => {
                self.extras.retain(|e| e.extra_id != extra_id);
                return Ok(());
            }
            None => {
                return Err(CoreError::ExtraNotOffered {
                    board_id: self.board.id.clone(),
                    extra_id: extra_id.to_string(),
                })
            }
        };

        if quantity <= 0 {
            self.extras.retain(|e| e.extra_id != extra_id);
            return Ok(());
        }
        // Bounds first: pricing multiplies rates by the quantity.
        validation::validate_extra_quantity(quantity)?;
        let computed_total =
            pricing::extra_price(self.days(), offered.daily_rate, offered.weekly_rate, quantity)?;

        match self.extras.iter_mut().find(|e| e.extra_id == extra_id) {
            Some(selection) => {
                selection.quantity = quantity;
                selection.daily_rate = offered.daily_rate;
                selection.weekly_rate = offered.weekly_rate;
                selection.computed_total = computed_total;
            }
            None => self.extras.push(ExtraSelection {
                extra_id: offered.id.clone(),
                name: offered.name.clone(),
                daily_rate: offered.daily_rate,
                weekly_rate: offered.weekly_rate,
                quantity,
                size: None,
                computed_total,
            }),
        }

        Ok(())
    }

    /// Sets the size of an existing selection. Returns false if absent.
    pub(crate) fn apply_extra_size(&mut self, extra_id: &str, size: Option<&str>) -> bool {
        let days = self.days();
        let Some(selection) = self.extras.iter_mut().find(|e| e.extra_id == extra_id) else {
            return false;
        };

        selection.size = size
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        // Size never changes the price, the total is refreshed anyway.
        if let Ok(total) = pricing::extra_price(
            days,
            selection.daily_rate,
            selection.weekly_rate,
            selection.quantity,
        ) {
            selection.computed_total = total;
        }
        true
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The renter's cart: an ordered list of rental lines.
///
/// Not serializable. Persist a [`CartSnapshot`](crate::CartSnapshot) and
/// rebuild with [`rehydrate`](crate::rehydrate), which re-checks every line
/// against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    id: String,
    items: Vec<RentalItem>,
    /// Next insertion sequence used for item ids. Never reused.
    next_seq: u64,
}

impl Cart {
    /// Creates a new empty cart with a fresh id.
    pub fn new() -> Self {
        Cart {
            id: Uuid::new_v4().to_string(),
            items: Vec::new(),
            next_seq: 1,
        }
    }

    pub(crate) fn from_parts(id: String, items: Vec<RentalItem>, next_seq: u64) -> Self {
        Cart {
            id,
            items,
            next_seq,
        }
    }

    /// Cart session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Rental lines in insertion order.
    pub fn items(&self) -> &[RentalItem] {
        &self.items
    }

    /// Returns the line at `index`.
    pub fn item(&self, index: usize) -> CoreResult<&RentalItem> {
        let len = self.items.len();
        self.items
            .get(index)
            .ok_or(CoreError::ItemNotFound { index, len })
    }

    fn item_mut(&mut self, index: usize) -> CoreResult<&mut RentalItem> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(CoreError::ItemNotFound { index, len })
    }

    /// Number of rental lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a rental line for `board` and returns its item id.
    ///
    /// ## Behavior
    /// - `end_date < start_date` → `ValidationError::InvalidDateRange`
    /// - Delivery on a board that is not delivered → stored as not selected
    /// - `extras` are applied in order with `set_extra_quantity` semantics
    /// - On any error the cart is left unchanged
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use quiver_core::{Board, Cart, Money};
    ///
    /// let board = Board {
    ///     id: "b1".into(),
    ///     name: "Fish".into(),
    ///     owner_id: "o1".into(),
    ///     owner_name: "Kai".into(),
    ///     daily_rate: Some(Money::from_major(30)),
    ///     weekly_rate: None,
    ///     delivery_eligible: false,
    ///     delivery_flat_rate: Money::zero(),
    ///     extras: vec![],
    /// };
    /// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    ///
    /// let mut cart = Cart::new();
    /// let item_id = cart.add_rental_item(&board, day, day, true, &[]).unwrap();
    /// assert_eq!(item_id, "b1-1");
    /// assert!(!cart.items()[0].delivery_selected);
    /// ```
    pub fn add_rental_item(
        &mut self,
        board: &Board,
        start_date: NaiveDate,
        end_date: NaiveDate,
        delivery_selected: bool,
        extras: &[ExtraRequest],
    ) -> CoreResult<String> {
        validation::validate_board(board)?;
        validation::validate_date_range(start_date, end_date)?;

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        let item_id = format!("{}-{}", board.id, self.next_seq);
        let mut item = RentalItem::new(
            item_id.clone(),
            board.clone(),
            start_date,
            end_date,
            delivery_selected,
        );

        for request in extras {
            item.apply_extra_quantity(&request.extra_id, request.quantity)?;
            item.apply_extra_size(&request.extra_id, request.size.as_deref());
        }

        self.items.push(item);
        self.next_seq += 1;
        Ok(item_id)
    }

    /// Removes the line at `index` and returns it.
    pub fn remove_rental_item(&mut self, index: usize) -> CoreResult<RentalItem> {
        let len = self.items.len();
        if index >= len {
            return Err(CoreError::ItemNotFound { index, len });
        }
        Ok(self.items.remove(index))
    }

    /// Toggles delivery on a line and returns the value actually stored.
    ///
    /// Selecting delivery on a board the owner does not deliver stores
    /// `false`. This is a coercion, not an error.
    pub fn set_delivery_selected(&mut self, index: usize, selected: bool) -> CoreResult<bool> {
        let item = self.item_mut(index)?;
        item.delivery_selected = selected && item.board.delivery_eligible;
        Ok(item.delivery_selected)
    }

    /// Sets the quantity of an extra on a line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: removes the selection (no-op if absent)
    /// - otherwise: inserts or updates and recomputes `computed_total`
    pub fn set_extra_quantity(
        &mut self,
        index: usize,
        extra_id: &str,
        quantity: i64,
    ) -> CoreResult<()> {
        self.item_mut(index)?.apply_extra_quantity(extra_id, quantity)
    }

    /// Adds (or re-sets) an extra with quantity and size in one step.
    pub fn add_extra(
        &mut self,
        index: usize,
        extra_id: &str,
        quantity: i64,
        size: Option<&str>,
    ) -> CoreResult<()> {
        let item = self.item_mut(index)?;
        item.apply_extra_quantity(extra_id, quantity)?;
        item.apply_extra_size(extra_id, size);
        Ok(())
    }

    /// Sets the size of an extra that already has a quantity.
    ///
    /// Returns `Ok(false)` without changing anything when the extra is not
    /// selected on that line.
    pub fn set_extra_size(
        &mut self,
        index: usize,
        extra_id: &str,
        size: Option<&str>,
    ) -> CoreResult<bool> {
        Ok(self.item_mut(index)?.apply_extra_size(extra_id, size))
    }

    /// Empties the cart. Idempotent.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Recomputes all totals for this cart.
    pub fn totals(&self, policy: &DeliveryPolicy) -> CartTotals {
        pricing::cart_totals(self, policy)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::fixtures::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn eight_day_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_rental_item(&longboard(), date(2024, 1, 1), date(2024, 1, 8), false, &[])
            .unwrap();
        cart
    }

    #[test]
    fn test_add_rental_item_assigns_sequential_ids() {
        let mut cart = Cart::new();
        let board = longboard();

        let first = cart
            .add_rental_item(&board, date(2024, 1, 1), date(2024, 1, 3), false, &[])
            .unwrap();
        let second = cart
            .add_rental_item(&board, date(2024, 2, 1), date(2024, 2, 3), false, &[])
            .unwrap();

        assert_eq!(first, "board-long-1");
        assert_eq!(second, "board-long-2");
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_add_rejects_inverted_dates() {
        let mut cart = Cart::new();
        let result =
            cart.add_rental_item(&longboard(), date(2024, 1, 8), date(2024, 1, 1), false, &[]);

        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::InvalidDateRange { .. }))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_with_unknown_extra_leaves_cart_untouched() {
        let mut cart = Cart::new();
        let before = cart.clone();
        let extras = [ExtraRequest {
            extra_id: "surf-lesson".to_string(),
            quantity: 1,
            size: None,
        }];

        let result =
            cart.add_rental_item(&longboard(), date(2024, 1, 1), date(2024, 1, 2), false, &extras);

        assert!(matches!(result, Err(CoreError::ExtraNotOffered { .. })));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_with_initial_extras() {
        let mut cart = Cart::new();
        let extras = [ExtraRequest {
            extra_id: "wetsuit".to_string(),
            quantity: 2,
            size: Some("M".to_string()),
        }];

        cart.add_rental_item(&longboard(), date(2024, 1, 1), date(2024, 1, 8), false, &extras)
            .unwrap();

        let selection = cart.items()[0].extra("wetsuit").unwrap();
        assert_eq!(selection.quantity, 2);
        assert_eq!(selection.size.as_deref(), Some("M"));
        assert_eq!(selection.computed_total, Money::from_major(120));
    }

    #[test]
    fn test_cart_size_limit() {
        let mut cart = Cart::new();
        let board = longboard();
        for _ in 0..MAX_CART_ITEMS {
            cart.add_rental_item(&board, date(2024, 1, 1), date(2024, 1, 1), false, &[])
                .unwrap();
        }

        let result = cart.add_rental_item(&board, date(2024, 1, 1), date(2024, 1, 1), false, &[]);
        assert_eq!(
            result,
            Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS
            })
        );
    }

    #[test]
    fn test_remove_rental_item() {
        let mut cart = eight_day_cart();
        let removed = cart.remove_rental_item(0).unwrap();
        assert_eq!(removed.item_id, "board-long-1");
        assert!(cart.is_empty());

        assert_eq!(
            cart.remove_rental_item(0),
            Err(CoreError::ItemNotFound { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_item_ids_not_reused_after_removal() {
        let mut cart = eight_day_cart();
        cart.remove_rental_item(0).unwrap();
        let id = cart
            .add_rental_item(&longboard(), date(2024, 1, 1), date(2024, 1, 1), false, &[])
            .unwrap();
        assert_eq!(id, "board-long-2");
    }

    #[test]
    fn test_delivery_toggle_on_eligible_board() {
        let mut cart = eight_day_cart();
        assert_eq!(cart.set_delivery_selected(0, true), Ok(true));
        assert!(cart.items()[0].delivers());
        assert_eq!(cart.set_delivery_selected(0, false), Ok(false));
        assert!(!cart.items()[0].delivers());
    }

    #[test]
    fn test_delivery_toggle_coerced_on_ineligible_board() {
        let mut board = longboard();
        board.delivery_eligible = false;

        let mut cart = Cart::new();
        cart.add_rental_item(&board, date(2024, 1, 1), date(2024, 1, 2), true, &[])
            .unwrap();
        assert!(!cart.items()[0].delivery_selected);

        assert_eq!(cart.set_delivery_selected(0, true), Ok(false));
        assert!(!cart.items()[0].delivery_selected);
    }

    #[test]
    fn test_set_extra_quantity_inserts_and_updates() {
        let mut cart = eight_day_cart();

        cart.set_extra_quantity(0, "wetsuit", 1).unwrap();
        assert_eq!(
            cart.items()[0].extra("wetsuit").unwrap().computed_total,
            Money::from_major(60)
        );

        cart.set_extra_quantity(0, "wetsuit", 2).unwrap();
        let item = &cart.items()[0];
        assert_eq!(item.extras.len(), 1);
        assert_eq!(item.extra("wetsuit").unwrap().computed_total, Money::from_major(120));
    }

    #[test]
    fn test_set_extra_quantity_zero_equals_never_added() {
        let mut cart = eight_day_cart();
        let before = cart.clone();

        cart.add_extra(0, "wetsuit", 2, Some("L")).unwrap();
        assert_ne!(cart, before);

        cart.set_extra_quantity(0, "wetsuit", 0).unwrap();
        assert_eq!(cart, before);
    }

    #[test]
    fn test_negative_quantity_removes_extra() {
        let mut cart = eight_day_cart();
        cart.set_extra_quantity(0, "leash", 1).unwrap();
        cart.set_extra_quantity(0, "leash", -3).unwrap();
        assert!(cart.items()[0].extras.is_empty());
    }

    #[test]
    fn test_extra_quantity_above_limit_rejected() {
        let mut cart = eight_day_cart();
        let result = cart.set_extra_quantity(0, "leash", crate::MAX_EXTRA_QUANTITY + 1);
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert!(cart.items()[0].extras.is_empty());
    }

    #[test]
    fn test_huge_extra_quantity_rejected_before_pricing() {
        let mut cart = eight_day_cart();
        let before = cart.clone();
        let huge = i64::MAX / 100;

        let result = cart.set_extra_quantity(0, "wetsuit", huge);
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert_eq!(cart, before);

        let result = cart.add_extra(0, "wetsuit", huge, Some("M"));
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_extra_not_offered() {
        let mut cart = eight_day_cart();
        let result = cart.set_extra_quantity(0, "roof-rack", 1);
        assert_eq!(
            result,
            Err(CoreError::ExtraNotOffered {
                board_id: "board-long".to_string(),
                extra_id: "roof-rack".to_string(),
            })
        );
    }

    #[test]
    fn test_set_extra_size() {
        let mut cart = eight_day_cart();

        // No selection yet: nothing to size
        assert_eq!(cart.set_extra_size(0, "wetsuit", Some("M")), Ok(false));
        assert!(cart.items()[0].extras.is_empty());

        cart.set_extra_quantity(0, "wetsuit", 2).unwrap();
        assert_eq!(cart.set_extra_size(0, "wetsuit", Some(" XL ")), Ok(true));

        let selection = cart.items()[0].extra("wetsuit").unwrap();
        assert_eq!(selection.size.as_deref(), Some("XL"));
        assert_eq!(selection.computed_total, Money::from_major(120));

        assert_eq!(cart.set_extra_size(0, "wetsuit", Some("  ")), Ok(true));
        assert_eq!(cart.items()[0].extra("wetsuit").unwrap().size, None);
    }

    #[test]
    fn test_mutations_on_missing_item() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.set_delivery_selected(3, true),
            Err(CoreError::ItemNotFound { index: 3, len: 0 })
        ));
        assert!(cart.set_extra_quantity(0, "wetsuit", 1).is_err());
        assert!(cart.set_extra_size(0, "wetsuit", None).is_err());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = eight_day_cart();
        cart.clear();
        let once = cart.clone();
        cart.clear();
        assert_eq!(cart, once);
        assert!(cart.is_empty());
    }
}
