//! # Catalog Commands
//!
//! Board lookup for the listing and detail screens.

use quiver_core::Board;
use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;

const DEFAULT_LIST_LIMIT: u32 = 50;
const MAX_LIST_LIMIT: u32 = 200;

/// Lists listed boards by name.
///
/// ## Arguments
/// * `limit` - Maximum boards to return (default: 50, max: 200)
pub async fn list_boards(db: &DbState, limit: Option<u32>) -> Result<Vec<Board>, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
    debug!(limit = %limit, "list_boards command");

    Ok(db.inner().boards().list_active(limit).await?)
}

/// Gets one board with its extras.
pub async fn get_board(db: &DbState, board_id: String) -> Result<Board, ApiError> {
    debug!(board_id = %board_id, "get_board command");

    db.inner()
        .boards()
        .get_by_id(&board_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Board", &board_id))
}
