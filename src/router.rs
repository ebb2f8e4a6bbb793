use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    app_state::AppState,
    auth::handlers::{login, signup},
    dashboard::{facility_stats, room_grid},
    events::room_events,
    health::health_check,
    items::handlers::{create_item, delete_item, list_activity, list_history, list_items, update_item},
    profiles::{get_profile, update_profile},
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/v1/auth/signup", post(signup))
        .route("/v1/auth/login", post(login))
        .route("/v1/rooms/{room}/items", get(list_items).post(create_item))
        .route(
            "/v1/rooms/{room}/items/{id}",
            axum::routing::patch(update_item).delete(delete_item),
        )
        .route("/v1/rooms/{room}/history", get(list_history))
        .route("/v1/rooms/{room}/activity", get(list_activity))
        .route("/v1/rooms/{room}/events", get(room_events))
        .route("/v1/dashboard/stats", get(facility_stats))
        .route("/v1/dashboard/rooms", get(room_grid))
        .route("/v1/profile", get(get_profile).patch(update_profile))
        .with_state(state)
}
