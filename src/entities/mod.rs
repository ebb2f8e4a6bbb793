use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// --- PostgreSQL Enums ---

/// Display status of an inventory item, derived from its count fields.
/// `Low` means "needs replacement".
#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "item_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Good,
    Maintenance,
    Low,
}

impl ItemStatus {
    /// Canonical derivation rule: maintenance beats replacement beats good.
    pub fn derive(maintenance_count: i32, replacement_count: i32) -> Self {
        if maintenance_count > 0 {
            ItemStatus::Maintenance
        } else if replacement_count > 0 {
            ItemStatus::Low
        } else {
            ItemStatus::Good
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ItemStatus::Good => "good",
            ItemStatus::Maintenance => "maintenance",
            ItemStatus::Low => "low",
        };
        f.write_str(s)
    }
}

#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "action_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Add,
    Edit,
    Delete,
    StatusChange,
}

#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Faculty,
    ItOffice,
    PropertyCustodian,
}

/// --- Tables ---

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub pw_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user metadata, one-to-one with `users`.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid, // PK and FK -> users.id
    pub username: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub updated_at: DateTime<Utc>,
}

/// A live inventory row. One row per `(name, room_number)`; the count
/// fields are bounded by `quantity` and `status` is denormalized via
/// [`ItemStatus::derive`].
#[derive(Debug, Clone, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub status: ItemStatus,
    pub room_number: String,
    pub maintenance_count: i32,
    pub replacement_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only snapshot of an item taken immediately before an edit or
/// delete. Never updated or removed by the application.
#[derive(Debug, Clone, FromRow)]
pub struct ItemHistoryRow {
    pub id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub status: ItemStatus,
    pub room_number: String,
    pub maintenance_count: i32,
    pub replacement_count: i32,
    pub changed_at: DateTime<Utc>,
}

/// Append-only audit entry, one per successful mutation.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogRow {
    pub id: Uuid,
    pub room_number: String,
    pub item_name: String,
    pub action_type: ActionType,
    pub details: String,
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub previous_status: Option<ItemStatus>,
    pub current_status: Option<ItemStatus>,
    pub created_at: DateTime<Utc>,
}
