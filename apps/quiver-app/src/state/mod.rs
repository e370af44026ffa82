//! # State Module
//!
//! Application state shared by the cart commands.
//!
//! Each concern gets its own state type so a command declares exactly what
//! it touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │    CartState     │  │   ConfigState    │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  Arc<Mutex<      │  │  delivery policy │          │
//! │  │  (SQLite     │  │    Cart>>        │  │  currency        │          │
//! │  │   pool)      │  │  watch totals    │  │  cart key        │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: connection pool is thread-safe                             │
//! │  • CartState: Arc<Mutex<T>> for exclusive access                       │
//! │  • ConfigState: read-only after startup                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod db;

pub use cart::CartState;
pub use config::{AppConfig, ConfigState, DisplaySettings, PricingSettings, StoreSettings};
pub use db::DbState;
