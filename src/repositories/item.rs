use crate::entities::{Item, ItemStatus};
use crate::repositories::history::HistoryRepository;
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Outcome of a destructive mutation: the row as it was before and (for
/// updates) after. The caller uses `previous` to decide whether the
/// derived status changed.
#[derive(Debug, Clone)]
pub struct ItemMutation {
    pub previous: Item,
    pub current: Item,
}

/// Repository for the room-scoped live item collection.
///
/// Edits and deletes snapshot the pre-mutation row into history inside the
/// same transaction, so a crash cannot leave a mutation without its
/// snapshot or vice versa.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Live rows for a room, newest first.
    pub async fn list_by_room(&self, room_number: &str) -> Result<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, quantity, status, room_number,
                   maintenance_count, replacement_count, created_at, updated_at
            FROM items
            WHERE room_number = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(room_number)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// The live row for `(name, room)`, if one exists. Used for the
    /// duplicate check before an insert.
    pub async fn find_by_name(&self, room_number: &str, name: &str) -> Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, quantity, status, room_number,
                   maintenance_count, replacement_count, created_at, updated_at
            FROM items
            WHERE room_number = $1 AND name = $2
            "#,
        )
        .bind(room_number)
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    pub async fn insert(
        &self,
        room_number: &str,
        name: &str,
        quantity: i32,
        maintenance_count: i32,
        replacement_count: i32,
        status: ItemStatus,
    ) -> Result<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items
                (name, quantity, status, room_number, maintenance_count, replacement_count)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, quantity, status, room_number,
                      maintenance_count, replacement_count, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(quantity)
        .bind(status)
        .bind(room_number)
        .bind(maintenance_count)
        .bind(replacement_count)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Snapshot-then-update in one transaction. Returns `None` when no live
    /// row matches `(id, room)`.
    pub async fn update(
        &self,
        id: Uuid,
        room_number: &str,
        quantity: i32,
        maintenance_count: i32,
        replacement_count: i32,
        status: ItemStatus,
    ) -> Result<Option<ItemMutation>> {
        let mut tx = self.pool.begin().await?;

        let Some(previous) = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, quantity, status, room_number,
                   maintenance_count, replacement_count, created_at, updated_at
            FROM items
            WHERE id = $1 AND room_number = $2
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(room_number)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        HistoryRepository::snapshot(&mut *tx, &previous).await?;

        let current = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET quantity = $3,
                maintenance_count = $4,
                replacement_count = $5,
                status = $6,
                updated_at = now()
            WHERE id = $1 AND room_number = $2
            RETURNING id, name, quantity, status, room_number,
                      maintenance_count, replacement_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(room_number)
        .bind(quantity)
        .bind(maintenance_count)
        .bind(replacement_count)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(ItemMutation { previous, current }))
    }

    /// Snapshot-then-delete in one transaction. Returns the removed row, or
    /// `None` when no live row matches `(id, room)`.
    pub async fn delete(&self, id: Uuid, room_number: &str) -> Result<Option<Item>> {
        let mut tx = self.pool.begin().await?;

        let Some(previous) = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, quantity, status, room_number,
                   maintenance_count, replacement_count, created_at, updated_at
            FROM items
            WHERE id = $1 AND room_number = $2
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(room_number)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        HistoryRepository::snapshot(&mut *tx, &previous).await?;

        sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(previous))
    }
}
