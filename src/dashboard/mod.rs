//! Landing-dashboard read projections: facility-wide totals and the
//! color-coded room-picker grid. Pure reads, no side effects.

use std::collections::HashMap;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::{
    app_state::AppState,
    auth::{dtos::ErrorResponse, middleware::Session},
    repositories::{DashboardRepository, dashboard::RoomTotals},
    rooms::RoomNumber,
};

/// Room tile color, evaluated in priority order: any maintenance beats any
/// replacement beats merely having items beats an empty room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoomIndicator {
    Maintenance,
    Low,
    Good,
    Empty,
}

impl RoomIndicator {
    pub fn from_counts(item_count: i64, maintenance_count: i64, replacement_count: i64) -> Self {
        if maintenance_count > 0 {
            RoomIndicator::Maintenance
        } else if replacement_count > 0 {
            RoomIndicator::Low
        } else if item_count > 0 {
            RoomIndicator::Good
        } else {
            RoomIndicator::Empty
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FacilityStatsResponse {
    pub total_quantity: i64,
    pub good_count: i64,
    pub maintenance_count: i64,
    pub replacement_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RoomTile {
    pub room_number: String,
    pub floor: u8,
    pub item_count: i64,
    pub indicator: RoomIndicator,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoomGridResponse {
    pub rooms: Vec<RoomTile>,
}

/// One tile per valid room, in floor-then-room order. Rooms without any
/// rows come out as `Empty`; rows with room keys outside the convention
/// (legacy data) are ignored.
pub fn build_grid(rows: Vec<RoomTotals>) -> Vec<RoomTile> {
    let by_room: HashMap<String, RoomTotals> = rows
        .into_iter()
        .map(|row| (row.room_number.clone(), row))
        .collect();

    RoomNumber::all()
        .map(|room| {
            let key = room.to_string();
            match by_room.get(&key) {
                Some(totals) => RoomTile {
                    room_number: key,
                    floor: room.floor(),
                    item_count: totals.item_count,
                    indicator: RoomIndicator::from_counts(
                        totals.item_count,
                        totals.maintenance_count,
                        totals.replacement_count,
                    ),
                },
                None => RoomTile {
                    room_number: key,
                    floor: room.floor(),
                    item_count: 0,
                    indicator: RoomIndicator::Empty,
                },
            }
        })
        .collect()
}

fn db_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Database error".to_string(),
        }),
    )
        .into_response()
}

pub async fn facility_stats(_session: Session, State(state): State<AppState>) -> Response {
    match DashboardRepository::new(&state.db_pool).facility_totals().await {
        Ok(totals) => (
            StatusCode::OK,
            Json(FacilityStatsResponse {
                total_quantity: totals.total_quantity,
                good_count: (totals.total_quantity
                    - totals.maintenance_count
                    - totals.replacement_count)
                    .max(0),
                maintenance_count: totals.maintenance_count,
                replacement_count: totals.replacement_count,
            }),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to fetch facility totals");
            db_error()
        }
    }
}

pub async fn room_grid(_session: Session, State(state): State<AppState>) -> Response {
    match DashboardRepository::new(&state.db_pool).room_totals().await {
        Ok(rows) => (
            StatusCode::OK,
            Json(RoomGridResponse {
                rooms: build_grid(rows),
            }),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to fetch room totals");
            db_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(room: &str, items: i64, maintenance: i64, replacement: i64) -> RoomTotals {
        RoomTotals {
            room_number: room.to_string(),
            item_count: items,
            maintenance_count: maintenance,
            replacement_count: replacement,
        }
    }

    #[test]
    fn indicator_priority_order() {
        assert_eq!(
            RoomIndicator::from_counts(3, 1, 2),
            RoomIndicator::Maintenance
        );
        assert_eq!(RoomIndicator::from_counts(3, 0, 2), RoomIndicator::Low);
        assert_eq!(RoomIndicator::from_counts(3, 0, 0), RoomIndicator::Good);
        assert_eq!(RoomIndicator::from_counts(0, 0, 0), RoomIndicator::Empty);
    }

    #[test]
    fn maintenance_wins_even_when_other_items_are_good() {
        // Room 102 has one fully good item and one with a maintenance count.
        let tiles = build_grid(vec![totals("102", 2, 1, 0)]);
        let tile = tiles.iter().find(|t| t.room_number == "102").unwrap();
        assert_eq!(tile.indicator, RoomIndicator::Maintenance);
    }

    #[test]
    fn grid_covers_every_room_with_empty_default() {
        let tiles = build_grid(vec![totals("102", 1, 0, 0)]);
        assert_eq!(tiles.len(), 48);
        assert!(
            tiles
                .iter()
                .filter(|t| t.room_number != "102")
                .all(|t| t.indicator == RoomIndicator::Empty && t.item_count == 0)
        );
    }

    #[test]
    fn unknown_room_keys_are_ignored() {
        let tiles = build_grid(vec![totals("999", 5, 5, 0)]);
        assert!(tiles.iter().all(|t| t.indicator == RoomIndicator::Empty));
    }

    #[test]
    fn grid_is_in_floor_then_room_order() {
        let tiles = build_grid(vec![]);
        assert_eq!(tiles.first().unwrap().room_number, "102");
        assert_eq!(tiles.last().unwrap().room_number, "609");
        assert_eq!(tiles[8].room_number, "202");
    }
}
