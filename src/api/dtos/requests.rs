use crate::domain::models::{connection::ConnectionStatus, user::Role};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const MAX_RATING_NOTES: usize = 2000;

/// Trims and rejects empty strings.
pub fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trims; an empty string becomes `None`.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims tags, drops empties and case-insensitive duplicates. Keeps first spelling.
pub fn clean_tags(tags: Option<Vec<String>>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.unwrap_or_default()
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}

pub fn validate_email(field: &str, value: &str) -> Result<String, AppError> {
    let email = required(field, value)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::Validation(format!("{} must be an email address", field))),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateOrgRequest {
    pub name: String,
    pub main_contact_name: String,
    pub main_contact_email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateOrgRequest {
    pub name: Option<String>,
    pub main_contact_name: Option<String>,
    pub main_contact_email: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateClientRequest {
    pub name: String,
    pub age: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub story: Option<String>,
    pub notes: Option<String>,
    pub needs: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub age: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub story: Option<String>,
    pub notes: Option<String>,
    pub needs: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserRequest {
    pub username: String,
    pub user_type: Role,
    pub display_name: String,
    pub bio: Option<String>,
    pub needs: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub needs: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetHelperActiveRequest {
    pub active: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetHelperRatingRequest {
    pub stars: i64,
    pub notes: Option<String>,
}

impl SetHelperRatingRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=5).contains(&self.stars) {
            return Err(AppError::Validation("stars must be between 1 and 5".into()));
        }
        if self.notes.as_ref().is_some_and(|n| n.chars().count() > MAX_RATING_NOTES) {
            return Err(AppError::Validation(format!("notes must be at most {} characters", MAX_RATING_NOTES)));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateConnectionRequest {
    pub client_id: String,
    pub helper_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatchConnectionStatusRequest {
    pub status: ConnectionStatus,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaItemRequest {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateConnectionUpdateRequest {
    pub event_name: String,
    pub event_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub media: Option<Vec<MediaItemRequest>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MyConnectionsQuery {
    pub org_id: Option<String>,
}
