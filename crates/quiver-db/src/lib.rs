//! # quiver-db: Database Layer for Quiver
//!
//! SQLite storage for the board catalog and persisted carts, using sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quiver-app command (hydrate_cart, add_to_cart, ...)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     quiver-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ BoardRepository    │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ CartSnapshotRepo   │  │ 001_*.sql  │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL mode)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pool`] - Connection pool management
//! - [`migrations`] - Embedded SQL migrations
//! - [`error`] - Database error types
//! - [`repository`] - Board catalog and cart snapshot repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quiver_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("quiver.db")).await?;
//!
//! let snapshot = db.carts().load("default").await?;
//! let catalog = db.boards().load_catalog(&board_ids).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};

pub use repository::board::BoardRepository;
pub use repository::cart::CartSnapshotRepository;
