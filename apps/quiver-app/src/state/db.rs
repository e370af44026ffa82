//! # Database State
//!
//! Wraps the `Database` connection for use in commands.
//!
//! The pool inside `Database` is thread-safe, so commands query
//! concurrently without extra locking.

use quiver_db::Database;

/// Database handle shared by the commands.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let board = db_state.inner().boards().get_by_id("kai-board-1").await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
