use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{ActionType, ActivityLogRow, ItemHistoryRow, ItemStatus};
use crate::items::aggregate::ItemSummary;

const MAX_NAME_LEN: usize = 128;

/// Shared range checks for the count fields. Rejection here means no write
/// of any kind happens.
fn validate_counts(
    quantity: i32,
    maintenance_count: i32,
    replacement_count: i32,
) -> Result<(), String> {
    if quantity < 1 {
        return Err("Quantity must be a positive integer".to_string());
    }
    if maintenance_count < 0 || replacement_count < 0 {
        return Err("Counts cannot be negative".to_string());
    }
    // Widened so extreme counts cannot wrap past the comparison.
    if maintenance_count as i64 + replacement_count as i64 > quantity as i64 {
        return Err(
            "Maintenance or replacement count cannot be greater than total quantity".to_string(),
        );
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub maintenance_count: i32,
    #[serde(default)]
    pub replacement_count: i32,
}

impl AddItemRequest {
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Item name cannot be empty".to_string());
        }
        if name.len() > MAX_NAME_LEN {
            return Err("Item name too long".to_string());
        }
        validate_counts(self.quantity, self.maintenance_count, self.replacement_count)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub quantity: i32,
    #[serde(default)]
    pub maintenance_count: i32,
    #[serde(default)]
    pub replacement_count: i32,
}

impl UpdateItemRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_counts(self.quantity, self.maintenance_count, self.replacement_count)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemListResponse {
    pub items: Vec<ItemSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryEntryResponse {
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

impl From<ItemHistoryRow> for HistoryEntryResponse {
    fn from(row: ItemHistoryRow) -> Self {
        Self {
            id: row.id,
            item_id: row.item_id,
            name: row.name,
            quantity: row.quantity,
            status: row.status,
            room_number: row.room_number,
            maintenance_count: row.maintenance_count,
            replacement_count: row.replacement_count,
            changed_at: row.changed_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryListResponse {
    pub history: Vec<HistoryEntryResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityEntryResponse {
    pub id: Uuid,
    pub room_number: String,
    pub item_name: String,
    pub action_type: ActionType,
    pub details: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub previous_status: Option<ItemStatus>,
    pub current_status: Option<ItemStatus>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLogRow> for ActivityEntryResponse {
    fn from(row: ActivityLogRow) -> Self {
        Self {
            id: row.id,
            room_number: row.room_number,
            item_name: row.item_name,
            action_type: row.action_type,
            details: row.details,
            email: row.email,
            username: row.username,
            previous_status: row.previous_status,
            current_status: row.current_status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityListResponse {
    pub activity: Vec<ActivityEntryResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(name: &str, quantity: i32, maintenance: i32, replacement: i32) -> AddItemRequest {
        AddItemRequest {
            name: name.to_string(),
            quantity,
            maintenance_count: maintenance,
            replacement_count: replacement,
        }
    }

    #[test]
    fn test_add_item_request_valid() {
        assert!(add("Chair", 10, 2, 1).validate().is_ok());
    }

    #[test]
    fn test_add_item_request_blank_name() {
        assert!(add("   ", 10, 0, 0).validate().is_err());
    }

    #[test]
    fn test_add_item_request_zero_quantity() {
        assert!(add("Chair", 0, 0, 0).validate().is_err());
    }

    #[test]
    fn test_add_item_request_negative_count() {
        assert!(add("Chair", 10, -1, 0).validate().is_err());
    }

    #[test]
    fn test_add_item_request_counts_exceed_quantity() {
        // 3 + 4 > 5
        assert!(add("Chair", 5, 3, 4).validate().is_err());
    }

    #[test]
    fn test_add_item_request_extreme_counts_rejected() {
        // The summed counts exceed i32 range; must reject, not wrap.
        assert!(add("Chair", 1, i32::MAX, i32::MAX).validate().is_err());
        assert!(add("Chair", i32::MAX, i32::MAX, 1).validate().is_err());
    }

    #[test]
    fn test_add_item_request_counts_exactly_quantity() {
        assert!(add("Chair", 5, 3, 2).validate().is_ok());
    }

    #[test]
    fn test_update_item_request_counts_exceed_quantity() {
        let request = UpdateItemRequest {
            quantity: 5,
            maintenance_count: 3,
            replacement_count: 4,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_item_request_valid() {
        let request = UpdateItemRequest {
            quantity: 10,
            maintenance_count: 0,
            replacement_count: 3,
        };
        assert!(request.validate().is_ok());
    }
}
