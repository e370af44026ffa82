//! # Board Repository
//!
//! The board catalog: boards, their owners and offered extras.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  boards                               board_extras                      │
//! │  ─────────────────────────────        ───────────────────────────────   │
//! │  id (PK)                 ◄─────────── board_id (FK, ON DELETE CASCADE)  │
//! │  owner_id, owner_name                 id, position                      │
//! │  daily_rate_cents  (NULL ok)          daily_rate_cents                  │
//! │  weekly_rate_cents (NULL ok)          weekly_rate_cents                 │
//! │  delivery_eligible                    sizes (JSON array)                │
//! │  is_active                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Delisted boards are soft-deleted (`is_active = 0`). Every read here skips
//! them, so a cart holding a delisted board loses that line on rehydration.

use std::collections::HashMap;

use chrono::Utc;
use quiver_core::validation;
use quiver_core::{Board, BoardExtra, InMemoryCatalog, Money};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

const BOARD_SELECT: &str = "SELECT id, name, owner_id, owner_name, daily_rate_cents, \
     weekly_rate_cents, delivery_eligible, delivery_flat_rate_cents FROM boards";

#[derive(Debug, FromRow)]
struct BoardRow {
    id: String,
    name: String,
    owner_id: String,
    owner_name: String,
    daily_rate_cents: Option<i64>,
    weekly_rate_cents: Option<i64>,
    delivery_eligible: bool,
    delivery_flat_rate_cents: i64,
}

impl BoardRow {
    fn into_board(self, extras: Vec<BoardExtra>) -> Board {
        Board {
            id: self.id,
            name: self.name,
            owner_id: self.owner_id,
            owner_name: self.owner_name,
            daily_rate: self.daily_rate_cents.map(Money::from_cents),
            weekly_rate: self.weekly_rate_cents.map(Money::from_cents),
            delivery_eligible: self.delivery_eligible,
            delivery_flat_rate: Money::from_cents(self.delivery_flat_rate_cents),
            extras,
        }
    }
}

#[derive(Debug, FromRow)]
struct ExtraRow {
    board_id: String,
    id: String,
    name: String,
    daily_rate_cents: i64,
    weekly_rate_cents: i64,
    sizes: String,
}

impl TryFrom<ExtraRow> for BoardExtra {
    type Error = DbError;

    fn try_from(row: ExtraRow) -> DbResult<Self> {
        Ok(BoardExtra {
            id: row.id,
            name: row.name,
            daily_rate: Money::from_cents(row.daily_rate_cents),
            weekly_rate: Money::from_cents(row.weekly_rate_cents),
            sizes: serde_json::from_str(&row.sizes)?,
        })
    }
}

/// Repository for the board catalog.
#[derive(Debug, Clone)]
pub struct BoardRepository {
    pool: SqlitePool,
}

impl BoardRepository {
    /// Creates a new BoardRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BoardRepository { pool }
    }

    /// Inserts or replaces a board together with its extras.
    ///
    /// The board is validated first. Saving a delisted board lists it again.
    /// Extras are replaced wholesale and keep their order.
    pub async fn save(&self, board: &Board) -> DbResult<()> {
        validation::validate_board(board)?;

        debug!(board_id = %board.id, extras = board.extras.len(), "Saving board");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO boards (
                id, name, owner_id, owner_name,
                daily_rate_cents, weekly_rate_cents,
                delivery_eligible, delivery_flat_rate_cents,
                is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                owner_id = excluded.owner_id,
                owner_name = excluded.owner_name,
                daily_rate_cents = excluded.daily_rate_cents,
                weekly_rate_cents = excluded.weekly_rate_cents,
                delivery_eligible = excluded.delivery_eligible,
                delivery_flat_rate_cents = excluded.delivery_flat_rate_cents,
                is_active = 1,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&board.id)
        .bind(&board.name)
        .bind(&board.owner_id)
        .bind(&board.owner_name)
        .bind(board.daily_rate.map(|m| m.cents()))
        .bind(board.weekly_rate.map(|m| m.cents()))
        .bind(board.delivery_eligible)
        .bind(board.delivery_flat_rate.cents())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM board_extras WHERE board_id = ?")
            .bind(&board.id)
            .execute(&mut *tx)
            .await?;

        for (position, extra) in board.extras.iter().enumerate() {
            let sizes = serde_json::to_string(&extra.sizes)?;
            sqlx::query(
                r#"
                INSERT INTO board_extras (
                    board_id, id, position, name,
                    daily_rate_cents, weekly_rate_cents, sizes
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&board.id)
            .bind(&extra.id)
            .bind(position as i64)
            .bind(&extra.name)
            .bind(extra.daily_rate.cents())
            .bind(extra.weekly_rate.cents())
            .bind(sizes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets an active board by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Board))` - Board found and listed
    /// * `Ok(None)` - Unknown or delisted
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Board>> {
        Ok(self.get_many(&[id]).await?.pop())
    }

    /// Gets every active board among `ids`, ordered by name.
    ///
    /// Unknown and delisted ids are skipped.
    pub async fn get_many<S: AsRef<str>>(&self, ids: &[S]) -> DbResult<Vec<Board>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(BOARD_SELECT);
        query.push(" WHERE is_active = 1 AND id IN (");
        {
            let mut separated = query.separated(", ");
            for id in ids {
                separated.push_bind(id.as_ref());
            }
        }
        query.push(") ORDER BY name, id");

        let rows: Vec<BoardRow> = query.build_query_as().fetch_all(&self.pool).await?;
        debug!(requested = ids.len(), found = rows.len(), "Loaded boards");

        self.attach_extras(rows).await
    }

    /// Lists active boards by name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Board>> {
        let sql = format!("{} WHERE is_active = 1 ORDER BY name, id LIMIT ?", BOARD_SELECT);
        let rows: Vec<BoardRow> = sqlx::query_as(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        self.attach_extras(rows).await
    }

    /// Loads the boards a persisted cart refers to, ready for rehydration.
    pub async fn load_catalog<S: AsRef<str>>(&self, ids: &[S]) -> DbResult<InMemoryCatalog> {
        Ok(self.get_many(ids).await?.into_iter().collect())
    }

    /// Counts active boards.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boards WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Delists a board. It stays in the table but no longer resolves.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE boards SET is_active = 0, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Board", id));
        }

        debug!(board_id = %id, "Board delisted");
        Ok(())
    }

    async fn attach_extras(&self, rows: Vec<BoardRow>) -> DbResult<Vec<Board>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let extra_rows: Vec<ExtraRow> = {
            let mut query = QueryBuilder::<Sqlite>::new(
                "SELECT board_id, id, name, daily_rate_cents, weekly_rate_cents, sizes \
                 FROM board_extras WHERE board_id IN (",
            );
            {
                let mut separated = query.separated(", ");
                for row in &rows {
                    separated.push_bind(row.id.as_str());
                }
            }
            query.push(") ORDER BY board_id, position");
            query.build_query_as().fetch_all(&self.pool).await?
        };

        let mut extras: HashMap<String, Vec<BoardExtra>> = HashMap::new();
        for row in extra_rows {
            let board_id = row.board_id.clone();
            extras
                .entry(board_id)
                .or_default()
                .push(BoardExtra::try_from(row)?);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let board_extras = extras.remove(&row.id).unwrap_or_default();
                row.into_board(board_extras)
            })
            .collect())
    }
}
