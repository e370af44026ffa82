//! # Cart Commands
//!
//! Commands for building and pricing the renter's cart.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  app start ──► hydrate_cart ──► ┌──────────┐ ──► checkout screen        │
//! │                                 │ In Cart  │                            │
//! │                 add_to_cart ──► │          │ ◄── set_delivery           │
//! │            remove_from_cart ──► │          │ ◄── set_extra_quantity     │
//! │                  clear_cart ──► └──────────┘ ◄── set_extra_size         │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                     snapshot saved under `store.cart_key`               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutating command returns the full repriced cart, then persists a
//! snapshot. A failed save is logged and the command still succeeds.

use quiver_core::pricing::{self, item_pricing};
use quiver_core::validation::parse_rental_date;
use quiver_core::{
    rehydrate, Cart, CartSnapshot, CartTotals, DeliveryGroup, DeliveryPolicy, DroppedItem,
    ExtraRequest, ItemPricing, Money, RentalItem,
};
use quiver_db::DbError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{CartState, ConfigState, DbState};

// =============================================================================
// Responses
// =============================================================================

/// One priced rental line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub item: RentalItem,
    pub pricing: ItemPricing,
    pub extras_subtotal: Money,
}

/// Cart response including lines, delivery groups and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart_id: String,
    pub items: Vec<CartLine>,
    pub delivery: Vec<DeliveryGroup>,
    pub totals: CartTotals,
    /// Grand total formatted with the configured currency.
    pub grand_total_display: String,
}

impl CartResponse {
    /// Prices `cart` for display.
    pub fn build(cart: &Cart, policy: &DeliveryPolicy, config: &ConfigState) -> Self {
        let totals = cart.totals(policy);

        CartResponse {
            cart_id: cart.id().to_string(),
            items: cart
                .items()
                .iter()
                .map(|item| CartLine {
                    pricing: item_pricing(item),
                    extras_subtotal: pricing::extras_subtotal(item),
                    item: item.clone(),
                })
                .collect(),
            delivery: pricing::delivery_breakdown(cart, policy),
            grand_total_display: config.format_currency(totals.grand_total),
            totals,
        }
    }
}

/// Result of restoring the saved cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrateResponse {
    pub cart: CartResponse,
    /// Lines and extras that could not be restored.
    pub dropped: Vec<DroppedItem>,
}

/// Payload of `add_to_cart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub board_id: String,
    /// ISO date, `YYYY-MM-DD`
    pub start_date: String,
    /// ISO date, `YYYY-MM-DD`
    pub end_date: String,
    #[serde(default)]
    pub delivery_selected: bool,
    #[serde(default)]
    pub extras: Vec<ExtraRequest>,
}

// =============================================================================
// Helpers
// =============================================================================

fn respond(cart: &CartState, config: &ConfigState) -> (CartResponse, CartSnapshot) {
    cart.with_cart(|c| {
        (
            CartResponse::build(c, cart.policy(), config),
            CartSnapshot::from(c),
        )
    })
}

async fn persist(db: &DbState, config: &ConfigState, snapshot: &CartSnapshot) {
    if let Err(e) = db.inner().carts().save(config.cart_key(), snapshot).await {
        warn!(error = %e, key = %config.cart_key(), "Failed to persist cart");
    }
}

/// Builds the response and saves the cart in the state it was returned in.
///
/// The save gate is taken before the snapshot, so the last save to land is
/// always the newest snapshot.
async fn commit(db: &DbState, cart: &CartState, config: &ConfigState) -> CartResponse {
    let _gate = cart.save_gate().await;
    let (response, snapshot) = respond(cart, config);
    persist(db, config, &snapshot).await;
    response
}

// =============================================================================
// Commands
// =============================================================================

/// Gets the current cart, repriced.
///
/// ## Returns
/// Current cart with lines, delivery groups and totals
pub fn get_cart(cart: &CartState, config: &ConfigState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::build(c, cart.policy(), config))
}

/// Adds a board rental to the cart.
///
/// ## Behavior
/// - The board is read from the catalog; delisted boards are not found
/// - Dates are inclusive; an end before the start is rejected
/// - Delivery on a board the owner does not deliver is stored as off
/// - The board's rates are frozen into the line
///
/// ## Example Payload
/// ```json
/// {
///   "boardId": "owner-kai-board-1",
///   "startDate": "2024-01-01",
///   "endDate": "2024-01-08",
///   "deliverySelected": true,
///   "extras": [{ "extraId": "wetsuit", "quantity": 1, "size": "M" }]
/// }
/// ```
pub async fn add_to_cart(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
    request: AddToCartRequest,
) -> Result<CartResponse, ApiError> {
    debug!(
        board_id = %request.board_id,
        start = %request.start_date,
        end = %request.end_date,
        "add_to_cart command"
    );

    let start_date = parse_rental_date("start_date", &request.start_date)?;
    let end_date = parse_rental_date("end_date", &request.end_date)?;

    let board = db
        .inner()
        .boards()
        .get_by_id(&request.board_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Board", &request.board_id))?;

    let item_id = cart.with_cart_mut(|c| {
        c.add_rental_item(
            &board,
            start_date,
            end_date,
            request.delivery_selected,
            &request.extras,
        )
    })?;
    debug!(item_id = %item_id, "Rental line added");

    Ok(commit(db, cart, config).await)
}

/// Removes the line at `index`.
pub async fn remove_from_cart(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
    index: usize,
) -> Result<CartResponse, ApiError> {
    debug!(index = %index, "remove_from_cart command");

    let removed = cart.with_cart_mut(|c| c.remove_rental_item(index))?;
    debug!(item_id = %removed.item_id, "Rental line removed");

    Ok(commit(db, cart, config).await)
}

/// Turns delivery on or off for one line.
///
/// Asking for delivery on a pickup-only board succeeds and leaves it off;
/// the response shows the stored value.
pub async fn set_delivery(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
    index: usize,
    selected: bool,
) -> Result<CartResponse, ApiError> {
    debug!(index = %index, selected = %selected, "set_delivery command");

    let stored = cart.with_cart_mut(|c| c.set_delivery_selected(index, selected))?;
    if selected && !stored {
        debug!(index = %index, "Board is pickup only, delivery left off");
    }

    Ok(commit(db, cart, config).await)
}

/// Sets how many of an extra go with a line. Zero or less removes it.
pub async fn set_extra_quantity(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
    index: usize,
    extra_id: String,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(index = %index, extra_id = %extra_id, quantity = %quantity, "set_extra_quantity command");

    cart.with_cart_mut(|c| c.set_extra_quantity(index, &extra_id, quantity))?;

    Ok(commit(db, cart, config).await)
}

/// Adds an extra to a line with its quantity and size in one step.
pub async fn add_extra(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
    index: usize,
    extra_id: String,
    quantity: i64,
    size: Option<String>,
) -> Result<CartResponse, ApiError> {
    debug!(index = %index, extra_id = %extra_id, quantity = %quantity, "add_extra command");

    cart.with_cart_mut(|c| c.add_extra(index, &extra_id, quantity, size.as_deref()))?;

    Ok(commit(db, cart, config).await)
}

/// Picks a size for an extra already on the line.
///
/// Does nothing when the extra is not selected.
pub async fn set_extra_size(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
    index: usize,
    extra_id: String,
    size: Option<String>,
) -> Result<CartResponse, ApiError> {
    debug!(index = %index, extra_id = %extra_id, "set_extra_size command");

    let changed = cart.with_cart_mut(|c| c.set_extra_size(index, &extra_id, size.as_deref()))?;
    if !changed {
        debug!(extra_id = %extra_id, "Extra not selected, size ignored");
        return Ok(get_cart(cart, config));
    }

    Ok(commit(db, cart, config).await)
}

/// Empties the cart.
pub async fn clear_cart(db: &DbState, cart: &CartState, config: &ConfigState) -> CartResponse {
    debug!("clear_cart command");

    cart.with_cart_mut(|c| c.clear());
    commit(db, cart, config).await
}

/// Restores the saved cart with current catalog rates.
///
/// ## What This Does
/// 1. Loads the snapshot saved under `store.cart_key`
/// 2. Fetches the boards it refers to
/// 3. Rebuilds the cart, dropping lines whose board is gone and extras the
///    owner no longer offers
/// 4. Replaces the in-memory cart and saves the pruned snapshot
///
/// A snapshot that no longer parses is discarded with a warning.
pub async fn hydrate_cart(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
) -> Result<HydrateResponse, ApiError> {
    debug!(key = %config.cart_key(), "hydrate_cart command");

    let snapshot = match db.inner().carts().load(config.cart_key()).await {
        Ok(snapshot) => snapshot,
        Err(DbError::InvalidData(e)) => {
            warn!(error = %e, "Saved cart is unreadable, starting empty");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let Some(snapshot) = snapshot else {
        debug!("No saved cart");
        return Ok(HydrateResponse {
            cart: get_cart(cart, config),
            dropped: Vec::new(),
        });
    };

    let board_ids: Vec<&str> = snapshot
        .items
        .iter()
        .map(|item| item.board_id.as_str())
        .collect();
    let catalog = db.inner().boards().load_catalog(&board_ids).await?;

    let restored = rehydrate(&snapshot, &catalog);
    for dropped in &restored.dropped {
        warn!(
            item_id = %dropped.item_id,
            board_id = %dropped.board_id,
            extra_id = ?dropped.extra_id,
            reason = ?dropped.reason,
            "Dropped from saved cart"
        );
    }

    let complete = restored.is_complete();
    let response = if complete {
        cart.replace(restored.cart);
        get_cart(cart, config)
    } else {
        let _gate = cart.save_gate().await;
        cart.replace(restored.cart);
        let (response, pruned) = respond(cart, config);
        persist(db, config, &pruned).await;
        response
    };

    info!(
        items = response.items.len(),
        dropped = restored.dropped.len(),
        "Cart restored"
    );

    Ok(HydrateResponse {
        cart: response,
        dropped: restored.dropped,
    })
}
