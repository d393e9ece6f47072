use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, org::OrgId};
use crate::api::dtos::requests::{
    clean_tags, optional, required, CreateUserRequest, SetHelperActiveRequest, UpdateProfileRequest,
};
use crate::api::dtos::responses::UserResponse;
use crate::api::handlers::{load_org, load_org_helper, org_user_response, user_response};
use crate::domain::models::user::{NewUserParams, Role, User};
use crate::domain::services::policy::{self, Action, Target};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_org_users(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageUsers, &org_id).await?;

    let members = state.user_repo.list_by_org(&org_id).await?;
    let mut users = Vec::with_capacity(members.len());
    for member in members {
        users.push(org_user_response(&state, member, &org_id).await?);
    }
    Ok(Json(users))
}

pub async fn create_org_user(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageUsers, &org_id).await?;

    if payload.user_type == Role::Superadmin {
        return Err(AppError::Validation("userType must be orgadmin or serviceprovider".into()));
    }
    let username = required("username", &payload.username)?;
    let display_name = required("displayName", &payload.display_name)?;

    if state.user_repo.find_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("Username already in use".into()));
    }

    let new_user = User::new(NewUserParams {
        username,
        user_type: payload.user_type,
        org_id: Some(org_id.clone()),
        display_name,
        bio: optional(payload.bio),
        needs: clean_tags(payload.needs),
    });
    let created = state.user_repo.create(&new_user).await?;

    info!("Created {:?} user: {} in org {:?}", created.user_type, created.id, created.org_id);
    Ok((StatusCode::CREATED, Json(org_user_response(&state, created, &org_id).await?)))
}

/// Inactive helpers stay connected but are no longer suggested by this org.
/// Other orgs the helper belongs to are unaffected.
pub async fn set_helper_active(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Path((_, helper_id)): Path<(String, String)>,
    Json(payload): Json<SetHelperActiveRequest>,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageUsers, &org_id).await?;
    let mut helper = load_org_helper(&state, &org_id, &helper_id).await?;

    helper.set_active_in(&org_id, payload.active);
    let updated = state.user_repo.update(&helper).await?;

    info!("Helper {} active={} in org {}", updated.id, payload.active, org_id);
    Ok(Json(org_user_response(&state, updated, &org_id).await?))
}

pub async fn add_helper_membership(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Path((_, helper_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(&user, Action::ManageMemberships, Target::Platform)?;
    state.org_repo.find_by_id(&org_id).await?
        .ok_or_else(|| AppError::NotFound("Org not found".into()))?;

    let mut helper = state.user_repo.find_by_id(&helper_id).await?
        .filter(|u| u.user_type == Role::Serviceprovider)
        .ok_or_else(|| AppError::NotFound("Helper not found".into()))?;

    helper.add_membership(&org_id);
    let updated = state.user_repo.update(&helper).await?;

    info!("Helper {} added to org {}", updated.id, org_id);
    Ok(Json(org_user_response(&state, updated, &org_id).await?))
}

pub async fn get_me(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    policy::authorize(&user, Action::UpdateOwnProfile, Target::Platform)?;
    Ok(Json(user_response(&state, user).await?))
}

pub async fn update_me(
    State(state): State<Arc<AppState>>,
    AuthUser(mut user): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    policy::authorize(&user, Action::UpdateOwnProfile, Target::Platform)?;

    if let Some(display_name) = payload.display_name {
        user.display_name = required("displayName", &display_name)?;
    }
    if payload.bio.is_some() {
        user.bio = optional(payload.bio);
    }
    if payload.needs.is_some() {
        user.needs = clean_tags(payload.needs);
    }

    let updated = state.user_repo.update(&user).await?;
    info!("Profile updated: {}", updated.id);
    Ok(Json(user_response(&state, updated).await?))
}
