//! # Catalog
//!
//! Read-only board lookup used when a persisted cart is rehydrated.
//!
//! The SQLite-backed catalog lives in quiver-db. It loads the boards a
//! snapshot references into an [`InMemoryCatalog`] so that rehydration stays
//! synchronous and free of I/O.

use std::collections::HashMap;

use crate::types::Board;

/// Source of current board data.
pub trait Catalog {
    /// Returns the board with `board_id`, or `None` if it is no longer listed.
    fn find_board(&self, board_id: &str) -> Option<&Board>;
}

/// Boards keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    boards: HashMap<String, Board>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a board.
    pub fn insert(&mut self, board: Board) {
        self.boards.insert(board.id.clone(), board);
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn find_board(&self, board_id: &str) -> Option<&Board> {
        self.boards.get(board_id)
    }
}

impl FromIterator<Board> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = Board>>(iter: I) -> Self {
        let mut catalog = InMemoryCatalog::new();
        for board in iter {
            catalog.insert(board);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::*;

    #[test]
    fn test_find_board() {
        let catalog: InMemoryCatalog = vec![longboard(), board_for("fish", "owner-b")]
            .into_iter()
            .collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.find_board("fish").map(|b| b.owner_id.as_str()),
            Some("owner-b")
        );
        assert!(catalog.find_board("gun").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut catalog = InMemoryCatalog::new();
        assert!(catalog.is_empty());

        catalog.insert(longboard());
        let mut relisted = longboard();
        relisted.daily_rate = None;
        catalog.insert(relisted);

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.find_board("board-long").and_then(|b| b.daily_rate),
            None
        );
    }
}
