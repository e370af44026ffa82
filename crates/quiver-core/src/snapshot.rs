//! # Cart Snapshots
//!
//! The persisted shape of a cart and the rules for rebuilding it.
//!
//! ## Snapshot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart ──► CartSnapshot::from(&cart) ──► JSON ──► cart_snapshots table   │
//! │                                                                         │
//! │  App restart                                                            │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  cart_snapshots ──► CartSnapshot ──► rehydrate(&snapshot, &catalog)     │
//! │                                          │                              │
//! │                                          ├── board still listed ──► kept│
//! │                                          │   (rates refreshed)          │
//! │                                          │                              │
//! │                                          └── anything unusable ──►      │
//! │                                              Rehydration.dropped        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Snapshots store references (board id, dates, extra quantities) rather than
//! prices. Rates always come from the catalog at rehydration time.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, ExtraRequest, RentalItem};
use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::validation;
use crate::MAX_CART_ITEMS;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

// =============================================================================
// Snapshot Types
// =============================================================================

/// Serializable form of a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub cart_id: String,
    pub next_seq: u64,
    pub items: Vec<SnapshotItem>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// One rental line as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    pub item_id: String,
    pub board_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub delivery_selected: bool,
    #[serde(default)]
    pub extras: Vec<ExtraRequest>,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        CartSnapshot {
            version: SNAPSHOT_VERSION,
            cart_id: cart.id().to_string(),
            next_seq: cart.next_seq(),
            items: cart.items().iter().map(SnapshotItem::from).collect(),
        }
    }
}

impl From<&RentalItem> for SnapshotItem {
    fn from(item: &RentalItem) -> Self {
        SnapshotItem {
            item_id: item.item_id.clone(),
            board_id: item.board.id.clone(),
            start_date: item.start_date,
            end_date: item.end_date,
            delivery_selected: item.delivery_selected,
            extras: item
                .extras
                .iter()
                .map(|e| ExtraRequest {
                    extra_id: e.extra_id.clone(),
                    quantity: e.quantity,
                    size: e.size.clone(),
                })
                .collect(),
        }
    }
}

// =============================================================================
// Rehydration
// =============================================================================

/// Why part of a snapshot could not be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Board is no longer in the catalog (or its listing is invalid).
    BoardUnavailable,
    /// Stored dates end before they start.
    InvalidDateRange,
    /// The owner stopped offering this extra.
    ExtraUnavailable,
    /// Stored quantity is above the allowed maximum.
    InvalidExtraQuantity,
    /// Snapshot holds more lines than a cart may.
    CartFull,
    /// Another restored line already uses this item id.
    DuplicateItem,
}

/// A line or extra left out of a rehydrated cart.
///
/// `extra_id` is set when only one extra was dropped and the line was kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DroppedItem {
    pub item_id: String,
    pub board_id: String,
    pub extra_id: Option<String>,
    pub reason: DropReason,
}

/// Result of rebuilding a cart from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Rehydration {
    pub cart: Cart,
    pub dropped: Vec<DroppedItem>,
}

impl Rehydration {
    /// True when every stored line and extra came back.
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Rebuilds a cart from `snapshot`, refreshing every board from `catalog`.
///
/// Never fails. Whatever cannot be restored is reported in
/// [`Rehydration::dropped`] and the rest of the cart survives. Item ids and
/// the cart id are preserved; a repeated item id keeps only its first line.
/// The id sequence resumes past every restored id, whatever the stored
/// `next_seq` says.
pub fn rehydrate<C: Catalog + ?Sized>(snapshot: &CartSnapshot, catalog: &C) -> Rehydration {
    let mut items: Vec<RentalItem> = Vec::with_capacity(snapshot.items.len());
    let mut kept_ids: HashSet<&str> = HashSet::new();
    let mut dropped = Vec::new();

    for stored in &snapshot.items {
        let drop_line = |reason| DroppedItem {
            item_id: stored.item_id.clone(),
            board_id: stored.board_id.clone(),
            extra_id: None,
            reason,
        };

        if kept_ids.contains(stored.item_id.as_str()) {
            dropped.push(drop_line(DropReason::DuplicateItem));
            continue;
        }

        let board = match catalog.find_board(&stored.board_id) {
            Some(board) if validation::validate_board(board).is_ok() => board,
            _ => {
                dropped.push(drop_line(DropReason::BoardUnavailable));
                continue;
            }
        };

        if validation::validate_date_range(stored.start_date, stored.end_date).is_err() {
            dropped.push(drop_line(DropReason::InvalidDateRange));
            continue;
        }

        if items.len() >= MAX_CART_ITEMS {
            dropped.push(drop_line(DropReason::CartFull));
            continue;
        }

        let mut item = RentalItem::new(
            stored.item_id.clone(),
            board.clone(),
            stored.start_date,
            stored.end_date,
            stored.delivery_selected,
        );

        for request in &stored.extras {
            let reason = match item.apply_extra_quantity(&request.extra_id, request.quantity) {
                Ok(()) => {
                    item.apply_extra_size(&request.extra_id, request.size.as_deref());
                    continue;
                }
                Err(CoreError::ExtraNotOffered { .. }) => DropReason::ExtraUnavailable,
                Err(_) => DropReason::InvalidExtraQuantity,
            };
            dropped.push(DroppedItem {
                extra_id: Some(request.extra_id.clone()),
                ..drop_line(reason)
            });
        }

        kept_ids.insert(&stored.item_id);
        items.push(item);
    }

    let next_seq = items
        .iter()
        .filter_map(|item| item_sequence(&item.item_id))
        .map(|seq| seq.saturating_add(1))
        .fold(snapshot.next_seq.max(1), u64::max);
    Rehydration {
        cart: Cart::from_parts(snapshot.cart_id.clone(), items, next_seq),
        dropped,
    }
}

/// Sequence number at the end of an item id such as `board-7-12`.
fn item_sequence(item_id: &str) -> Option<u64> {
    item_id
        .rsplit_once('-')
        .and_then(|(_, seq)| seq.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::money::Money;
    use crate::pricing::{cart_totals, DeliveryPolicy};
    use crate::types::fixtures::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_rental_item(&longboard(), date(2024, 1, 1), date(2024, 1, 8), true, &[])
            .unwrap();
        cart.add_extra(0, "wetsuit", 2, Some("M")).unwrap();
        cart.add_rental_item(
            &board_for("fish", "owner-b"),
            date(2024, 1, 2),
            date(2024, 1, 4),
            false,
            &[],
        )
        .unwrap();
        cart
    }

    fn full_catalog() -> InMemoryCatalog {
        vec![longboard(), board_for("fish", "owner-b")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_round_trip_restores_cart() {
        let cart = sample_cart();
        let snapshot = CartSnapshot::from(&cart);
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: CartSnapshot = serde_json::from_str(&json).unwrap();

        let rehydration = rehydrate(&restored, &full_catalog());
        assert!(rehydration.is_complete());
        assert_eq!(rehydration.cart, cart);

        let policy = DeliveryPolicy::default();
        assert_eq!(
            cart_totals(&rehydration.cart, &policy),
            cart_totals(&cart, &policy)
        );
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = CartSnapshot::from(&sample_cart());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["nextSeq"], 3);
        assert_eq!(json["items"][0]["boardId"], "board-long");
        assert_eq!(json["items"][0]["startDate"], "2024-01-01");
        assert_eq!(json["items"][0]["extras"][0]["extraId"], "wetsuit");
    }

    #[test]
    fn test_missing_board_is_reported_not_truncated() {
        let snapshot = CartSnapshot::from(&sample_cart());
        let catalog: InMemoryCatalog = vec![board_for("fish", "owner-b")].into_iter().collect();

        let rehydration = rehydrate(&snapshot, &catalog);

        assert_eq!(rehydration.cart.len(), 1);
        assert_eq!(rehydration.cart.items()[0].item_id, "fish-2");
        assert_eq!(
            rehydration.dropped,
            vec![DroppedItem {
                item_id: "board-long-1".to_string(),
                board_id: "board-long".to_string(),
                extra_id: None,
                reason: DropReason::BoardUnavailable,
            }]
        );
    }

    #[test]
    fn test_rates_refreshed_from_catalog() {
        let snapshot = CartSnapshot::from(&sample_cart());
        let mut repriced = longboard();
        repriced.daily_rate = Some(Money::from_major(40));
        let catalog: InMemoryCatalog = vec![repriced, board_for("fish", "owner-b")]
            .into_iter()
            .collect();

        let cart = rehydrate(&snapshot, &catalog).cart;
        assert_eq!(
            cart.items()[0].board.daily_rate,
            Some(Money::from_major(40))
        );
    }

    #[test]
    fn test_withdrawn_extra_dropped_line_kept() {
        let snapshot = CartSnapshot::from(&sample_cart());
        let mut no_wetsuit = longboard();
        no_wetsuit.extras.retain(|e| e.id != "wetsuit");
        let catalog: InMemoryCatalog = vec![no_wetsuit, board_for("fish", "owner-b")]
            .into_iter()
            .collect();

        let rehydration = rehydrate(&snapshot, &catalog);

        assert_eq!(rehydration.cart.len(), 2);
        assert!(rehydration.cart.items()[0].extras.is_empty());
        assert_eq!(rehydration.dropped.len(), 1);
        assert_eq!(rehydration.dropped[0].extra_id.as_deref(), Some("wetsuit"));
        assert_eq!(rehydration.dropped[0].reason, DropReason::ExtraUnavailable);
    }

    #[test]
    fn test_delivery_coerced_when_owner_stops_delivering() {
        let snapshot = CartSnapshot::from(&sample_cart());
        let mut pickup_only = longboard();
        pickup_only.delivery_eligible = false;
        let catalog: InMemoryCatalog = vec![pickup_only, board_for("fish", "owner-b")]
            .into_iter()
            .collect();

        let cart = rehydrate(&snapshot, &catalog).cart;
        assert!(!cart.items()[0].delivery_selected);
    }

    #[test]
    fn test_corrupt_lines_dropped() {
        let mut snapshot = CartSnapshot::from(&sample_cart());
        snapshot.items[1].end_date = date(2023, 12, 1);
        snapshot.items[0].extras[0].quantity = 500;

        let rehydration = rehydrate(&snapshot, &full_catalog());

        assert_eq!(rehydration.cart.len(), 1);
        let reasons: Vec<DropReason> = rehydration.dropped.iter().map(|d| d.reason).collect();
        assert_eq!(
            reasons,
            vec![DropReason::InvalidExtraQuantity, DropReason::InvalidDateRange]
        );
    }

    #[test]
    fn test_item_ids_continue_after_rehydration() {
        let snapshot = CartSnapshot::from(&sample_cart());
        let mut cart = rehydrate(&snapshot, &full_catalog()).cart;

        let id = cart
            .add_rental_item(&longboard(), date(2024, 2, 1), date(2024, 2, 1), false, &[])
            .unwrap();
        assert_eq!(id, "board-long-3");
    }

    #[test]
    fn test_huge_stored_extra_quantity_dropped_line_kept() {
        let mut snapshot = CartSnapshot::from(&sample_cart());
        snapshot.items[0].extras[0].quantity = i64::MAX / 100;

        let rehydration = rehydrate(&snapshot, &full_catalog());

        assert_eq!(rehydration.cart.len(), 2);
        assert!(rehydration.cart.items()[0].extras.is_empty());
        assert_eq!(
            rehydration.dropped,
            vec![DroppedItem {
                item_id: "board-long-1".to_string(),
                board_id: "board-long".to_string(),
                extra_id: Some("wetsuit".to_string()),
                reason: DropReason::InvalidExtraQuantity,
            }]
        );
    }

    #[test]
    fn test_stale_next_seq_does_not_reissue_ids() {
        let mut snapshot = CartSnapshot::from(&sample_cart());
        snapshot.next_seq = 1;

        let mut cart = rehydrate(&snapshot, &full_catalog()).cart;
        let id = cart
            .add_rental_item(&longboard(), date(2024, 2, 1), date(2024, 2, 1), false, &[])
            .unwrap();

        assert_eq!(id, "board-long-3");
        let ids: HashSet<&str> = cart.items().iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids.len(), cart.len());
    }

    #[test]
    fn test_duplicate_item_ids_keep_first_line() {
        let mut snapshot = CartSnapshot::from(&sample_cart());
        let mut copy = snapshot.items[0].clone();
        copy.start_date = date(2024, 3, 1);
        copy.end_date = date(2024, 3, 2);
        snapshot.items.push(copy);

        let rehydration = rehydrate(&snapshot, &full_catalog());

        assert_eq!(rehydration.cart.len(), 2);
        assert_eq!(rehydration.cart.items()[0].start_date, date(2024, 1, 1));
        assert_eq!(
            rehydration.dropped,
            vec![DroppedItem {
                item_id: "board-long-1".to_string(),
                board_id: "board-long".to_string(),
                extra_id: None,
                reason: DropReason::DuplicateItem,
            }]
        );
    }

    #[test]
    fn test_item_sequence_parsing() {
        assert_eq!(item_sequence("board-long-12"), Some(12));
        assert_eq!(item_sequence("fish-2"), Some(2));
        assert_eq!(item_sequence("legacy"), None);
        assert_eq!(item_sequence("board-x"), None);
    }
}
