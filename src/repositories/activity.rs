use crate::entities::{ActionType, ActivityLogRow, ItemStatus};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Fields for one audit entry. `previous_status`/`current_status` are set
/// only when the mutation changed the derived status.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub room_number: String,
    pub item_name: String,
    pub action_type: ActionType,
    pub details: String,
    pub user_id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub previous_status: Option<ItemStatus>,
    pub current_status: Option<ItemStatus>,
}

/// Repository for the append-only activity log. Rows are write-once; there
/// is no update or delete path.
pub struct ActivityLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ActivityLogRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn append(&self, entry: NewActivity) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs
                (room_number, item_name, action_type, details,
                 user_id, email, username, previous_status, current_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&entry.room_number)
        .bind(&entry.item_name)
        .bind(entry.action_type)
        .bind(&entry.details)
        .bind(entry.user_id)
        .bind(&entry.email)
        .bind(&entry.username)
        .bind(entry.previous_status)
        .bind(entry.current_status)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Audit entries for a room, newest first.
    pub async fn list_by_room(&self, room_number: &str) -> Result<Vec<ActivityLogRow>> {
        let rows = sqlx::query_as::<_, ActivityLogRow>(
            r#"
            SELECT id, room_number, item_name, action_type, details,
                   user_id, email, username, previous_status, current_status, created_at
            FROM activity_logs
            WHERE room_number = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(room_number)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
