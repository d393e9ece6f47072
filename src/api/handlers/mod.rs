pub mod auth;
pub mod client;
pub mod connection;
pub mod health;
pub mod org;
pub mod rating;
pub mod user;

use crate::api::dtos::responses::UserResponse;
use crate::domain::models::{org::Org, user::User};
use crate::domain::services::policy::{self, Action, Target};
use crate::error::AppError;
use crate::state::AppState;

/// Authorizes `action` on the org, then loads it.
pub(crate) async fn load_org(state: &AppState, user: &User, action: Action, org_id: &str) -> Result<Org, AppError> {
    policy::authorize(user, action, Target::Org(org_id))?;
    state.org_repo.find_by_id(org_id).await?
        .ok_or_else(|| AppError::NotFound("Org not found".into()))
}

/// A service provider who belongs to the org.
pub(crate) async fn load_org_helper(state: &AppState, org_id: &str, helper_id: &str) -> Result<User, AppError> {
    state.user_repo.find_by_id(helper_id).await?
        .filter(|u| u.is_helper_in(org_id))
        .ok_or_else(|| AppError::NotFound("Helper not found".into()))
}

pub(crate) async fn user_response(state: &AppState, user: User) -> Result<UserResponse, AppError> {
    let mut org_names = Vec::with_capacity(user.org_ids.len());
    for org_id in &user.org_ids {
        if let Some(org) = state.org_repo.find_by_id(org_id).await? {
            org_names.push(org.name);
        }
    }
    Ok(UserResponse { user, org_names, active: None })
}

/// A member as seen from one org, including that org's active flag.
pub(crate) async fn org_user_response(
    state: &AppState,
    user: User,
    org_id: &str,
) -> Result<UserResponse, AppError> {
    let active = user.is_active_in(org_id);
    let mut response = user_response(state, user).await?;
    response.active = Some(active);
    Ok(response)
}
