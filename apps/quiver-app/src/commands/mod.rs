//! # Commands Module
//!
//! Operations exposed to the mobile UI bridge.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── catalog.rs  ◄─── Board lookup for the detail screen
//! └── cart.rs     ◄─── Cart manipulation and rehydration
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! fn get_cart(cart: &CartState, config: &ConfigState) -> CartResponse
//!
//! // Reads the catalog and writes the cart
//! async fn add_to_cart(db: &DbState, cart: &CartState, config: &ConfigState, ...)
//! ```
//!
//! Every fallible command returns `Result<_, ApiError>`; the bridge
//! serializes either side to JSON.

pub mod cart;
pub mod catalog;
