use crate::entities::{Item, ItemHistoryRow};
use anyhow::Result;
use sqlx::{PgConnection, PgPool};

/// Repository for the append-only item history.
///
/// Snapshots are written inside the owning mutation's transaction (see
/// [`crate::repositories::ItemRepository`]); rows are never updated or
/// deleted afterwards, and no retention limit applies.
pub struct HistoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HistoryRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Copies the live row into history with `changed_at = now()`. Runs on
    /// the caller's connection so it commits or rolls back with the
    /// mutation it precedes.
    pub async fn snapshot(conn: &mut PgConnection, item: &Item) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO item_history
                (item_id, name, quantity, status, room_number,
                 maintenance_count, replacement_count, changed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now())
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.status)
        .bind(&item.room_number)
        .bind(item.maintenance_count)
        .bind(item.replacement_count)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Snapshots for a room, most recent change first.
    pub async fn list_by_room(&self, room_number: &str) -> Result<Vec<ItemHistoryRow>> {
        let rows = sqlx::query_as::<_, ItemHistoryRow>(
            r#"
            SELECT id, item_id, name, quantity, status, room_number,
                   maintenance_count, replacement_count, changed_at
            FROM item_history
            WHERE room_number = $1
            ORDER BY changed_at DESC
            "#,
        )
        .bind(room_number)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
