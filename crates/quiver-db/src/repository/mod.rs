//! # Repository Module
//!
//! Database repositories for Quiver.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quiver-app command                                                     │
//! │       │                                                                 │
//! │       │  db.boards().get_by_id("firewire-seaside")                      │
//! │       ▼                                                                 │
//! │  BoardRepository                  CartSnapshotRepository                │
//! │  ├── save(&board)                 ├── save(key, &snapshot)              │
//! │  ├── get_by_id(id)                ├── load(key)                         │
//! │  ├── get_many(ids)                └── delete(key)                       │
//! │  ├── list_active(limit)                                                 │
//! │  ├── load_catalog(ids)                                                  │
//! │  └── deactivate(id)                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`board::BoardRepository`] - Board catalog with offered extras
//! - [`cart::CartSnapshotRepository`] - Persisted carts

pub mod board;
pub mod cart;
