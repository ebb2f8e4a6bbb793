use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::{dtos::ErrorResponse, middleware::Session},
    entities::{ActionType, Item, ItemStatus},
    items::{
        aggregate::{ItemSummary, summarize},
        dtos::{
            ActivityListResponse, AddItemRequest, HistoryListResponse, ItemListResponse,
            UpdateItemRequest,
        },
    },
    repositories::{
        ActivityLogRepository, HistoryRepository, ItemRepository, NewActivity, ProfileRepository,
    },
    rooms::RoomNumber,
};

fn bad_request(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
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

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Item not found in this room".to_string(),
        }),
    )
        .into_response()
}

fn parse_room(raw: &str) -> Result<RoomNumber, Response> {
    raw.parse::<RoomNumber>()
        .map_err(|e| bad_request(e.to_string()))
}

fn summary_of(item: &Item) -> ItemSummary {
    ItemSummary {
        id: item.id,
        name: item.name.clone(),
        quantity: item.quantity,
        status: item.status,
        maintenance_count: item.maintenance_count,
        replacement_count: item.replacement_count,
        good_count: (item.quantity - item.maintenance_count - item.replacement_count).max(0),
        updated_at: item.updated_at,
    }
}

/// Appends one audit entry for a completed mutation. Best-effort: a failure
/// here is logged and swallowed, never failing the parent operation.
async fn record_activity(
    state: &AppState,
    session: &Session,
    room: RoomNumber,
    item_name: &str,
    action_type: ActionType,
    details: String,
    previous_status: Option<ItemStatus>,
    current_status: Option<ItemStatus>,
) {
    let username = match ProfileRepository::new(&state.db_pool)
        .find_by_user(session.user_id)
        .await
    {
        Ok(profile) => profile.map(|p| p.username),
        Err(err) => {
            warn!(error = %err, "Failed to resolve username for activity log");
            None
        }
    };

    let entry = NewActivity {
        room_number: room.to_string(),
        item_name: item_name.to_string(),
        action_type,
        details,
        user_id: session.user_id,
        email: session.email.clone(),
        username,
        previous_status,
        current_status,
    };

    if let Err(err) = ActivityLogRepository::new(&state.db_pool).append(entry).await {
        error!(error = %err, "Failed to append activity log entry");
    }
}

pub async fn list_items(
    _session: Session,
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Response {
    let room = match parse_room(&room) {
        Ok(room) => room,
        Err(response) => return response,
    };

    match ItemRepository::new(&state.db_pool)
        .list_by_room(&room.to_string())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ItemListResponse {
                items: summarize(&rows),
            }),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, room = %room, "Failed to fetch items");
            db_error()
        }
    }
}

pub async fn create_item(
    session: Session,
    State(state): State<AppState>,
    Path(room): Path<String>,
    Json(payload): Json<AddItemRequest>,
) -> Response {
    if let Err(error) = payload.validate() {
        return bad_request(error);
    }
    let room = match parse_room(&room) {
        Ok(room) => room,
        Err(response) => return response,
    };

    let name = payload.name.trim();
    let repo = ItemRepository::new(&state.db_pool);

    // One live row per (name, room); reject duplicates before writing.
    match repo.find_by_name(&room.to_string(), name).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "An item with this name already exists in this room".to_string(),
                }),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(err) => {
            error!(error = %err, room = %room, "Failed to check for duplicate item");
            return db_error();
        }
    }

    let status = ItemStatus::derive(payload.maintenance_count, payload.replacement_count);
    let item = match repo
        .insert(
            &room.to_string(),
            name,
            payload.quantity,
            payload.maintenance_count,
            payload.replacement_count,
            status,
        )
        .await
    {
        Ok(item) => item,
        Err(err) => {
            error!(error = %err, room = %room, "Failed to insert item");
            return db_error();
        }
    };

    record_activity(
        &state,
        &session,
        room,
        &item.name,
        ActionType::Add,
        format!(
            "Added {} items (Maintenance: {}, Replacement: {})",
            item.quantity, item.maintenance_count, item.replacement_count
        ),
        None,
        None,
    )
    .await;
    state.notifier.publish(room);

    (StatusCode::CREATED, Json(summary_of(&item))).into_response()
}

pub async fn update_item(
    session: Session,
    State(state): State<AppState>,
    Path((room, id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateItemRequest>,
) -> Response {
    if let Err(error) = payload.validate() {
        return bad_request(error);
    }
    let room = match parse_room(&room) {
        Ok(room) => room,
        Err(response) => return response,
    };

    let status = ItemStatus::derive(payload.maintenance_count, payload.replacement_count);
    let mutation = match ItemRepository::new(&state.db_pool)
        .update(
            id,
            &room.to_string(),
            payload.quantity,
            payload.maintenance_count,
            payload.replacement_count,
            status,
        )
        .await
    {
        Ok(Some(mutation)) => mutation,
        Ok(None) => return not_found(),
        Err(err) => {
            error!(error = %err, room = %room, item_id = %id, "Failed to update item");
            return db_error();
        }
    };

    // Status columns on the audit row are only populated when the derived
    // status actually flipped.
    let status_changed = mutation.previous.status != mutation.current.status;
    record_activity(
        &state,
        &session,
        room,
        &mutation.current.name,
        ActionType::Edit,
        format!(
            "Updated counts (Total: {}, Maintenance: {}, Replacement: {})",
            mutation.current.quantity,
            mutation.current.maintenance_count,
            mutation.current.replacement_count
        ),
        status_changed.then_some(mutation.previous.status),
        status_changed.then_some(mutation.current.status),
    )
    .await;
    state.notifier.publish(room);

    (StatusCode::OK, Json(summary_of(&mutation.current))).into_response()
}

pub async fn delete_item(
    session: Session,
    State(state): State<AppState>,
    Path((room, id)): Path<(String, Uuid)>,
) -> Response {
    let room = match parse_room(&room) {
        Ok(room) => room,
        Err(response) => return response,
    };

    let removed = match ItemRepository::new(&state.db_pool)
        .delete(id, &room.to_string())
        .await
    {
        Ok(Some(removed)) => removed,
        Ok(None) => return not_found(),
        Err(err) => {
            error!(error = %err, room = %room, item_id = %id, "Failed to delete item");
            return db_error();
        }
    };

    record_activity(
        &state,
        &session,
        room,
        &removed.name,
        ActionType::Delete,
        format!(
            "Removed item (Total: {}, Maintenance: {}, Replacement: {})",
            removed.quantity, removed.maintenance_count, removed.replacement_count
        ),
        None,
        None,
    )
    .await;
    state.notifier.publish(room);

    StatusCode::NO_CONTENT.into_response()
}

pub async fn list_history(
    _session: Session,
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Response {
    let room = match parse_room(&room) {
        Ok(room) => room,
        Err(response) => return response,
    };

    match HistoryRepository::new(&state.db_pool)
        .list_by_room(&room.to_string())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(HistoryListResponse {
                history: rows.into_iter().map(Into::into).collect(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, room = %room, "Failed to fetch item history");
            db_error()
        }
    }
}

pub async fn list_activity(
    _session: Session,
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Response {
    let room = match parse_room(&room) {
        Ok(room) => room,
        Err(response) => return response,
    };

    match ActivityLogRepository::new(&state.db_pool)
        .list_by_room(&room.to_string())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ActivityListResponse {
                activity: rows.into_iter().map(Into::into).collect(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, room = %room, "Failed to fetch activity log");
            db_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::jwt::JwtService, config::Config, entities::Role, events::ChangeNotifier,
        repositories::user::MockUserRepositoryTrait,
    };
    use axum::{
        Router,
        body::Body,
        http::{Request, header::AUTHORIZATION},
        routing::{delete, get, patch, post},
    };
    use sqlx::{Pool, Postgres};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_pool() -> Pool<Postgres> {
        // Dummy lazy pool; validation-only tests never hit it.
        Pool::<Postgres>::connect_lazy("postgresql://dummy").expect("Failed to create test pool")
    }

    fn create_test_app() -> Router {
        let mock_repo = MockUserRepositoryTrait::new();
        let state = AppState {
            user_repo: Arc::new(mock_repo),
            db_pool: create_test_pool(),
            notifier: ChangeNotifier::new(16),
        };

        Router::new()
            .route("/v1/rooms/{room}/items", get(list_items))
            .route("/v1/rooms/{room}/items", post(create_item))
            .route("/v1/rooms/{room}/items/{id}", patch(update_item))
            .route("/v1/rooms/{room}/items/{id}", delete(delete_item))
            .with_state(state)
    }

    fn create_jwt_token() -> String {
        let config = Config::from_env().expect("Failed to load config");
        let jwt_service = JwtService::new(config.jwt_secret());
        jwt_service
            .generate_token(Uuid::new_v4(), "custodian@campus.edu", Role::PropertyCustodian)
            .expect("Failed to generate token")
    }

    #[tokio::test]
    async fn test_items_routes_reject_unauthorized() {
        let app = create_test_app();

        let request = Request::builder()
            .method("GET")
            .uri("/v1/rooms/102/items")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_item_rejects_counts_over_quantity() {
        let app = create_test_app();
        let token = create_jwt_token();

        // 3 + 4 > 5: rejected before any database call.
        let request = Request::builder()
            .method("POST")
            .uri("/v1/rooms/102/items")
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "name": "Chair",
                    "quantity": 5,
                    "maintenance_count": 3,
                    "replacement_count": 4
                })
                .to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_item_rejects_blank_name() {
        let app = create_test_app();
        let token = create_jwt_token();

        let request = Request::builder()
            .method("POST")
            .uri("/v1/rooms/102/items")
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "name": "   ",
                    "quantity": 5
                })
                .to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_item_rejects_invalid_room_key() {
        let app = create_test_app();
        let token = create_jwt_token();

        // Floor 7 does not exist.
        let request = Request::builder()
            .method("POST")
            .uri("/v1/rooms/702/items")
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "name": "Chair",
                    "quantity": 5
                })
                .to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_item_rejects_counts_over_quantity() {
        let app = create_test_app();
        let token = create_jwt_token();

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/v1/rooms/102/items/{}", Uuid::new_v4()))
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "quantity": 2,
                    "maintenance_count": 2,
                    "replacement_count": 1
                })
                .to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_item_rejects_invalid_room_key() {
        let app = create_test_app();
        let token = create_jwt_token();

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/v1/rooms/abc/items/{}", Uuid::new_v4()))
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
