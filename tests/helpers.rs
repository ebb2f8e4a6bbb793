use axum::{Router, body::Body, http::Request};
use serde_json::json;
use sqlx::{Pool, Postgres};
use tower::ServiceExt;

use roomstock::{app_state::AppState, auth::dtos::LoginResponse, router::build_router};

pub fn test_app(pool: Pool<Postgres>) -> Router {
    build_router(AppState::new(pool))
}

/// Signs up a fresh account and returns a bearer token for it.
#[allow(dead_code)]
pub async fn authenticate(app: &Router, email: &str, password: &str) -> String {
    let signup_body = json!({
        "email": email,
        "password": password,
        "username": "custodian",
        "role": "property_custodian"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/auth/signup")
                .header("content-type", "application/json")
                .body(Body::from(signup_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);

    let login_body = json!({ "email": email, "password": password });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(login_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let login: LoginResponse = serde_json::from_slice(&body_bytes).unwrap();
    login.token
}

/// Convenience wrapper: send a JSON request with a bearer token and return
/// the response.
#[allow(dead_code)]
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> axum::response::Response {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", "application/json");

    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
