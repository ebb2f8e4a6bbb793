use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    auth::{dtos::ErrorResponse, jwt::JwtService},
    config::Config,
    entities::Role,
};

/// Actor identity for the current request, decoded from the bearer token.
///
/// Operations that need an actor (history snapshots, activity log rows)
/// take this value rather than consulting any global session state.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        async move {
            let auth_header = auth_header.ok_or(AuthError::MissingToken)?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or(AuthError::InvalidTokenFormat)?;

            let config = Config::from_env().map_err(|_| AuthError::InternalError)?;
            let jwt_service = JwtService::new(config.jwt_secret());

            let claims = jwt_service
                .verify_token(token)
                .map_err(|_| AuthError::InvalidToken)?;

            let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

            Ok(Session {
                user_id,
                email: claims.email,
                role: claims.role,
            })
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidTokenFormat,
    InvalidToken,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::InvalidTokenFormat => (StatusCode::UNAUTHORIZED, "Invalid token format"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
