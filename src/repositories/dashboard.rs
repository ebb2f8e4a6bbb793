use anyhow::Result;
use sqlx::{FromRow, PgPool};

/// Facility-wide quantity totals. Sums are `i64` because PostgreSQL
/// widens `SUM(integer)` to bigint.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct FacilityTotals {
    pub total_quantity: i64,
    pub maintenance_count: i64,
    pub replacement_count: i64,
}

/// Per-room aggregate used by the room-picker grid.
#[derive(Debug, Clone, FromRow)]
pub struct RoomTotals {
    pub room_number: String,
    pub item_count: i64,
    pub maintenance_count: i64,
    pub replacement_count: i64,
}

/// Read-only aggregate projections for the landing dashboard. No side
/// effects; both queries are plain GROUP BY reductions.
pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn facility_totals(&self) -> Result<FacilityTotals> {
        let totals = sqlx::query_as::<_, FacilityTotals>(
            r#"
            SELECT COALESCE(SUM(quantity), 0)          AS total_quantity,
                   COALESCE(SUM(maintenance_count), 0) AS maintenance_count,
                   COALESCE(SUM(replacement_count), 0) AS replacement_count
            FROM items
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        Ok(totals)
    }

    /// One row per room that has at least one item. Rooms without rows are
    /// absent; the handler reports those as empty.
    pub async fn room_totals(&self) -> Result<Vec<RoomTotals>> {
        let rows = sqlx::query_as::<_, RoomTotals>(
            r#"
            SELECT room_number,
                   COUNT(*)               AS item_count,
                   SUM(maintenance_count) AS maintenance_count,
                   SUM(replacement_count) AS replacement_count
            FROM items
            GROUP BY room_number
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
