//! # Cart State
//!
//! Holds the renter's cart and publishes its totals.
//!
//! ## Thread Safety
//! The cart lives behind `Arc<Mutex<Cart>>`. Every mutation takes the lock
//! for its whole read-modify-write, so two commands never interleave on
//! the same cart.
//!
//! Saving is serialized separately by [`CartState::save_gate`]: a command
//! holds the gate while it snapshots the cart and writes the snapshot, so
//! saves reach the database in the order their snapshots were taken.
//!
//! ## Totals Channel
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  with_cart_mut(|cart| ...)                                              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  recompute totals ──► changed? ──► watch::Sender ──► subscribers        │
//! │                          │                            (header badge,    │
//! │                          └── no ──► nothing sent       checkout bar)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use quiver_core::{Cart, CartSnapshot, CartTotals, DeliveryPolicy};
use tokio::sync::{watch, Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};

/// Shared cart plus a channel carrying its latest totals.
#[derive(Debug)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
    totals: watch::Sender<CartTotals>,
    policy: DeliveryPolicy,
    save_lock: AsyncMutex<()>,
}

impl CartState {
    /// Creates an empty cart priced with `policy`.
    pub fn new(policy: DeliveryPolicy) -> Self {
        Self::with_initial(Cart::new(), policy)
    }

    /// Wraps an existing cart, e.g. one rebuilt from a snapshot.
    pub fn with_initial(cart: Cart, policy: DeliveryPolicy) -> Self {
        let (totals, _) = watch::channel(cart.totals(&policy));
        CartState {
            cart: Arc::new(Mutex::new(cart)),
            totals,
            policy,
            save_lock: AsyncMutex::new(()),
        }
    }

    /// Delivery policy the totals are computed with.
    pub fn policy(&self) -> &DeliveryPolicy {
        &self.policy
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = cart_state.with_cart(|cart| cart.len());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// Totals are recomputed afterwards and published if they changed.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.set_delivery_selected(0, true))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut cart);
        self.publish(&cart);
        result
    }

    /// Swaps in a whole new cart.
    pub fn replace(&self, cart: Cart) {
        self.with_cart_mut(|current| *current = cart);
    }

    /// Receiver that sees the totals after every change.
    pub fn subscribe(&self) -> watch::Receiver<CartTotals> {
        self.totals.subscribe()
    }

    /// Latest published totals.
    pub fn totals(&self) -> CartTotals {
        self.totals.borrow().clone()
    }

    /// Persistable form of the current cart.
    pub fn snapshot(&self) -> CartSnapshot {
        self.with_cart(|cart| CartSnapshot::from(cart))
    }

    /// Waits for any in-flight save to finish.
    ///
    /// Hold the guard from taking the snapshot until the save completes.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let _gate = cart_state.save_gate().await;
    /// let snapshot = cart_state.snapshot();
    /// db.carts().save(key, &snapshot).await?;
    /// ```
    pub async fn save_gate(&self) -> AsyncMutexGuard<'_, ()> {
        self.save_lock.lock().await
    }

    fn publish(&self, cart: &Cart) {
        let next = cart.totals(&self.policy);
        self.totals.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(DeliveryPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_core::validation::parse_rental_date;
    use quiver_core::{Board, Money};

    fn board(id: &str, owner: &str) -> Board {
        Board {
            id: id.to_string(),
            name: format!("Board {}", id),
            owner_id: owner.to_string(),
            owner_name: format!("Owner {}", owner),
            daily_rate: Some(Money::from_major(30)),
            weekly_rate: Some(Money::from_major(150)),
            delivery_eligible: true,
            delivery_flat_rate: Money::from_major(50),
            extras: Vec::new(),
        }
    }

    fn add(state: &CartState, board: &Board, start: &str, end: &str, delivery: bool) {
        let start = parse_rental_date("start", start).unwrap();
        let end = parse_rental_date("end", end).unwrap();
        state
            .with_cart_mut(|cart| cart.add_rental_item(board, start, end, delivery, &[]))
            .unwrap();
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = CartState::default();
        assert!(state.with_cart(|c| c.is_empty()));
        assert_eq!(state.totals().grand_total, Money::zero());
    }

    #[test]
    fn test_totals_follow_mutations() {
        let state = CartState::default();
        add(&state, &board("a", "o1"), "2024-01-01", "2024-01-08", true);

        let totals = state.totals();
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.rental_subtotal, Money::from_major(180));
        assert_eq!(totals.delivery_total, Money::from_major(50));
        assert_eq!(totals.grand_total, Money::from_major(230));

        state.with_cart_mut(|c| c.clear());
        assert_eq!(state.totals().grand_total, Money::zero());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let state = CartState::default();
        let mut rx = state.subscribe();
        assert!(!rx.has_changed().unwrap());

        add(&state, &board("a", "o1"), "2024-01-01", "2024-01-01", false);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().rental_subtotal, Money::from_major(30));

        // Toggling delivery off when it is already off changes nothing.
        state.with_cart_mut(|c| c.set_delivery_selected(0, false)).unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_policy_is_applied() {
        let policy = DeliveryPolicy {
            base_fee: Money::from_major(40),
            included_items: 1,
            additional_item_fee: Money::from_major(5),
        };
        let state = CartState::new(policy);
        add(&state, &board("a", "o1"), "2024-01-01", "2024-01-01", true);
        add(&state, &board("b", "o1"), "2024-01-01", "2024-01-01", true);

        assert_eq!(state.totals().delivery_total, Money::from_major(45));
    }

    #[test]
    fn test_replace_and_snapshot() {
        let state = CartState::default();
        add(&state, &board("a", "o1"), "2024-01-01", "2024-01-02", false);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].item_id, "a-1");

        state.replace(Cart::new());
        assert!(state.with_cart(|c| c.is_empty()));
        assert_eq!(state.totals().item_count, 0);
    }

    #[tokio::test]
    async fn test_save_gate_is_exclusive() {
        let state = CartState::default();
        let gate = state.save_gate().await;
        assert!(state.save_lock.try_lock().is_err());

        drop(gate);
        assert!(state.save_lock.try_lock().is_ok());
    }
}
