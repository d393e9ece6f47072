use axum::{extract::{State, Path}, response::IntoResponse, Json};
use chrono::Utc;
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, org::OrgId};
use crate::api::dtos::requests::{optional, SetHelperRatingRequest};
use crate::api::dtos::responses::RatingResponse;
use crate::api::handlers::{load_org, load_org_helper};
use crate::domain::models::rating::HelperRating;
use crate::domain::services::policy::Action;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_rating(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Path((_, helper_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageRatings, &org_id).await?;
    load_org_helper(&state, &org_id, &helper_id).await?;

    let rating = state.rating_repo.find(&org_id, &helper_id).await?;
    Ok(Json(RatingResponse::from(rating)))
}

pub async fn set_rating(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Path((_, helper_id)): Path<(String, String)>,
    Json(payload): Json<SetHelperRatingRequest>,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageRatings, &org_id).await?;
    payload.validate()?;
    load_org_helper(&state, &org_id, &helper_id).await?;

    let rating = HelperRating {
        org_id,
        helper_id,
        stars: payload.stars,
        notes: optional(payload.notes),
        updated_by: user.id.clone(),
        updated_at: Utc::now(),
    };
    let saved = state.rating_repo.upsert(&rating).await?;

    info!("Rated helper {} with {} stars", saved.helper_id, saved.stars);
    Ok(Json(RatingResponse::from(Some(saved))))
}
