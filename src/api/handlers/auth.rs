use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::LoginRequest;
use crate::api::dtos::responses::{LoginResponse, MeResponse};
use crate::api::extractors::auth::{bearer_token, AuthUser};
use crate::api::handlers::user_response;
use std::sync::Arc;
use tracing::info;

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, token) = state.auth_service.login(&payload.username).await?;

    info!("User logged in: {}", user.id);

    Ok(Json(LoginResponse {
        user: user_response(&state, user).await?,
        token,
    }))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(MeResponse {
        user: user_response(&state, user).await?,
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = bearer_token(&headers) {
        state.auth_service.logout(token).await?;
    }
    info!("User logged out: {}", user.id);
    Ok(Json(serde_json::json!({"status": "logged_out"})))
}
