//! # Cart Snapshot Repository
//!
//! Persists renter carts between app launches.
//!
//! Each cart is stored as one JSON [`CartSnapshot`] under a caller-chosen
//! key (one per device profile). Saving overwrites the previous snapshot.

use chrono::Utc;
use quiver_core::CartSnapshot;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for persisted cart snapshots.
#[derive(Debug, Clone)]
pub struct CartSnapshotRepository {
    pool: SqlitePool,
}

impl CartSnapshotRepository {
    /// Creates a new CartSnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartSnapshotRepository { pool }
    }

    /// Stores `snapshot` under `key`, replacing any previous one.
    pub async fn save(&self, key: &str, snapshot: &CartSnapshot) -> DbResult<()> {
        let payload = serde_json::to_string(snapshot)?;

        sqlx::query(
            r#"
            INSERT INTO cart_snapshots (key, cart_id, payload, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (key) DO UPDATE SET
                cart_id = excluded.cart_id,
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&snapshot.cart_id)
        .bind(&payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, items = snapshot.items.len(), "Cart snapshot saved");
        Ok(())
    }

    /// Loads the snapshot stored under `key`.
    ///
    /// ## Returns
    /// * `Ok(Some(snapshot))` - A cart was saved under this key
    /// * `Ok(None)` - Nothing saved yet
    /// * `Err(DbError::InvalidData)` - Stored payload no longer parses
    pub async fn load(&self, key: &str) -> DbResult<Option<CartSnapshot>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM cart_snapshots WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        match payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Deletes the snapshot under `key`. Returns false if there was none.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM cart_snapshots WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use quiver_core::cart::ExtraRequest;
    use quiver_core::snapshot::{SnapshotItem, SNAPSHOT_VERSION};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn snapshot(cart_id: &str, items: usize) -> CartSnapshot {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        CartSnapshot {
            version: SNAPSHOT_VERSION,
            cart_id: cart_id.to_string(),
            next_seq: items as u64 + 1,
            items: (1..=items)
                .map(|seq| SnapshotItem {
                    item_id: format!("longboard-{}", seq),
                    board_id: "longboard".to_string(),
                    start_date: day,
                    end_date: day,
                    delivery_selected: seq % 2 == 0,
                    extras: vec![ExtraRequest {
                        extra_id: "wetsuit".to_string(),
                        quantity: 1,
                        size: Some("M".to_string()),
                    }],
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_load_missing_key() {
        let db = test_db().await;
        assert_eq!(db.carts().load("device-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let db = test_db().await;
        let saved = snapshot("cart-1", 2);

        db.carts().save("device-1", &saved).await.unwrap();
        assert_eq!(db.carts().load("device-1").await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let db = test_db().await;
        db.carts().save("device-1", &snapshot("cart-1", 3)).await.unwrap();
        db.carts().save("device-1", &snapshot("cart-1", 1)).await.unwrap();

        let loaded = db.carts().load("device-1").await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let db = test_db().await;
        db.carts().save("device-1", &snapshot("cart-1", 1)).await.unwrap();
        db.carts().save("device-2", &snapshot("cart-2", 2)).await.unwrap();

        assert!(db.carts().delete("device-1").await.unwrap());
        assert!(!db.carts().delete("device-1").await.unwrap());

        let other = db.carts().load("device-2").await.unwrap().unwrap();
        assert_eq!(other.cart_id, "cart-2");
    }

    #[tokio::test]
    async fn test_corrupt_payload_reported() {
        let db = test_db().await;
        sqlx::query(
            "INSERT INTO cart_snapshots (key, cart_id, payload, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind("device-1")
        .bind("cart-1")
        .bind("{not json")
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap();

        let result = db.carts().load("device-1").await;
        assert!(matches!(result, Err(DbError::InvalidData(_))));
    }
}
