mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::{Pool, Postgres};
use tower::ServiceExt;

const PASSWORD: &str = "CorrectHorseBatteryStaple123";

#[sqlx::test]
async fn test_facility_stats_sum_across_rooms(pool: Pool<Postgres>) {
    let app = helpers::test_app(pool);
    let token = helpers::authenticate(&app, "alice@example.com", PASSWORD).await;

    let response = helpers::send_json(
        &app,
        "POST",
        "/v1/rooms/102/items",
        &token,
        Some(json!({ "name": "Chair", "quantity": 10, "maintenance_count": 2 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = helpers::send_json(
        &app,
        "POST",
        "/v1/rooms/305/items",
        &token,
        Some(json!({ "name": "Monitor", "quantity": 6, "replacement_count": 1 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = helpers::send_json(&app, "GET", "/v1/dashboard/stats", &token, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = helpers::json_body(response).await;
    assert_eq!(stats["total_quantity"], 16);
    assert_eq!(stats["maintenance_count"], 2);
    assert_eq!(stats["replacement_count"], 1);
    assert_eq!(stats["good_count"], 13);
}

#[sqlx::test]
async fn test_facility_stats_empty_database_is_zero(pool: Pool<Postgres>) {
    let app = helpers::test_app(pool);
    let token = helpers::authenticate(&app, "alice@example.com", PASSWORD).await;

    let response = helpers::send_json(&app, "GET", "/v1/dashboard/stats", &token, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = helpers::json_body(response).await;
    assert_eq!(stats["total_quantity"], 0);
    assert_eq!(stats["good_count"], 0);
    assert_eq!(stats["maintenance_count"], 0);
    assert_eq!(stats["replacement_count"], 0);
}

#[sqlx::test]
async fn test_room_grid_indicator_priority(pool: Pool<Postgres>) {
    let app = helpers::test_app(pool);
    let token = helpers::authenticate(&app, "alice@example.com", PASSWORD).await;

    // Room 102 holds a good item and a maintenance item; maintenance wins.
    for body in [
        json!({ "name": "Desk", "quantity": 5 }),
        json!({ "name": "Chair", "quantity": 10, "maintenance_count": 2 }),
    ] {
        let response =
            helpers::send_json(&app, "POST", "/v1/rooms/102/items", &token, Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Room 305 only has replacements pending.
    let response = helpers::send_json(
        &app,
        "POST",
        "/v1/rooms/305/items",
        &token,
        Some(json!({ "name": "Monitor", "quantity": 6, "replacement_count": 1 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = helpers::send_json(&app, "GET", "/v1/dashboard/rooms", &token, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let grid = helpers::json_body(response).await;
    let rooms = grid["rooms"].as_array().unwrap();

    // Every room of the facility appears exactly once.
    assert_eq!(rooms.len(), 48);

    let find = |key: &str| {
        rooms
            .iter()
            .find(|tile| tile["room_number"] == key)
            .unwrap()
    };
    assert_eq!(find("102")["indicator"], "maintenance");
    assert_eq!(find("102")["item_count"], 2);
    assert_eq!(find("305")["indicator"], "low");
    assert_eq!(find("609")["indicator"], "empty");
    assert_eq!(find("609")["item_count"], 0);
}

#[sqlx::test]
async fn test_dashboard_requires_authentication(pool: Pool<Postgres>) {
    let app = helpers::test_app(pool);

    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method("GET")
                .uri("/v1/dashboard/stats")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
