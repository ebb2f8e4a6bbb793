//! Per-user profile surface. The avatar image itself lives in external
//! blob storage; the service only stores the public URL.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::{dtos::ErrorResponse, middleware::Session},
    entities::{Profile, Role},
    repositories::ProfileRepository,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            avatar_url: profile.avatar_url,
            role: profile.role,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(username) = &self.username {
            if username.trim().is_empty() {
                return Err("Username cannot be empty".to_string());
            }
            if username.trim().len() > 64 {
                return Err("Username too long".to_string());
            }
        }
        if let Some(avatar_url) = &self.avatar_url {
            if avatar_url.len() > 2048 {
                return Err("Avatar URL too long".to_string());
            }
        }
        Ok(())
    }
}

fn profile_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Profile not found".to_string(),
        }),
    )
        .into_response()
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

pub async fn get_profile(session: Session, State(state): State<AppState>) -> Response {
    match ProfileRepository::new(&state.db_pool)
        .find_by_user(session.user_id)
        .await
    {
        Ok(Some(profile)) => {
            (StatusCode::OK, Json(ProfileResponse::from(profile))).into_response()
        }
        Ok(None) => profile_not_found(),
        Err(err) => {
            error!(error = %err, user_id = %session.user_id, "Failed to fetch profile");
            db_error()
        }
    }
}

pub async fn update_profile(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Response {
    if let Err(error) = payload.validate() {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response();
    }

    match ProfileRepository::new(&state.db_pool)
        .update(
            session.user_id,
            payload.username.as_deref().map(str::trim),
            payload.avatar_url.as_deref(),
        )
        .await
    {
        Ok(Some(profile)) => {
            (StatusCode::OK, Json(ProfileResponse::from(profile))).into_response()
        }
        Ok(None) => profile_not_found(),
        Err(err) => {
            error!(error = %err, user_id = %session.user_id, "Failed to update profile");
            db_error()
        }
    }
}
