//! Liveness endpoint. The service is useless without its inventory
//! database, so the probe round-trips a trivial query and reports 503 when
//! that fails, letting the deployment restart or reroute.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::app_state::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    database: String,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Service and database reachable", body = HealthResponse),
        (status = 503, description = "Inventory database unreachable")
    )
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    match probe_database(&state.db_pool).await {
        Ok(_) => {
            debug!("Health probe ok");
            Ok(Json(HealthResponse {
                status: "ok".to_string(),
                database: "reachable".to_string(),
            }))
        }
        Err(err) => {
            error!(error = %err, "Inventory database probe failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

async fn probe_database(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(())
}
