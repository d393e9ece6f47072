use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, org::OrgId};
use crate::api::dtos::requests::{clean_tags, optional, required, CreateClientRequest, UpdateClientRequest};
use crate::api::dtos::responses::SuggestionView;
use crate::api::handlers::load_org;
use crate::domain::models::client::Client;
use crate::domain::models::connection::Connection;
use crate::domain::models::user::{Role, User};
use crate::domain::services::matching;
use crate::domain::services::policy::Action;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

async fn load_client(state: &AppState, org_id: &str, client_id: &str) -> Result<Client, AppError> {
    state.client_repo.find_by_id(org_id, client_id).await?
        .ok_or_else(|| AppError::NotFound("Client not found".into()))
}

pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageClients, &org_id).await?;
    let clients = state.client_repo.list_by_org(&org_id).await?;
    Ok(Json(clients))
}

pub async fn create_client(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageClients, &org_id).await?;

    let mut client = Client::new(org_id, required("name", &payload.name)?);
    client.age = optional(payload.age);
    client.bio = optional(payload.bio);
    client.address = optional(payload.address);
    client.contact = optional(payload.contact);
    client.story = optional(payload.story);
    client.notes = optional(payload.notes);
    client.needs = clean_tags(payload.needs);

    let created = state.client_repo.create(&client).await?;
    info!("Created client: {} in org {}", created.id, created.org_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_client(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Path((_, client_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageClients, &org_id).await?;
    let client = load_client(&state, &org_id, &client_id).await?;
    Ok(Json(client))
}

pub async fn update_client(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Path((_, client_id)): Path<(String, String)>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageClients, &org_id).await?;
    let mut client = load_client(&state, &org_id, &client_id).await?;

    if let Some(name) = payload.name {
        client.name = required("name", &name)?;
    }
    // Present-but-empty clears the field.
    if payload.age.is_some() {
        client.age = optional(payload.age);
    }
    if payload.bio.is_some() {
        client.bio = optional(payload.bio);
    }
    if payload.address.is_some() {
        client.address = optional(payload.address);
    }
    if payload.contact.is_some() {
        client.contact = optional(payload.contact);
    }
    if payload.story.is_some() {
        client.story = optional(payload.story);
    }
    if payload.notes.is_some() {
        client.notes = optional(payload.notes);
    }
    if payload.needs.is_some() {
        client.needs = clean_tags(payload.needs);
    }

    let updated = state.client_repo.update(&client).await?;
    info!("Updated client: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Path((_, client_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageClients, &org_id).await?;
    load_client(&state, &org_id, &client_id).await?;

    if !state.connection_repo.list_by_client(&client_id).await?.is_empty() {
        return Err(AppError::Conflict("Client has connections and cannot be deleted".into()));
    }

    state.client_repo.delete(&org_id, &client_id).await?;
    info!("Deleted client: {}", client_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Connected helpers first, then fresh matches for the client's need-tags.
pub async fn client_suggestions(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Path((_, client_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageClients, &org_id).await?;
    let client = load_client(&state, &org_id, &client_id).await?;

    let helpers: Vec<User> = state.user_repo.list_by_org(&org_id).await?
        .into_iter()
        .filter(|u| u.user_type == Role::Serviceprovider)
        .collect();
    let connections = state.connection_repo.list_by_client(&client_id).await?;

    // Helpers connected earlier may have since left the listing.
    let mut former: Vec<User> = Vec::new();
    for conn in &connections {
        let known = helpers.iter().chain(former.iter()).any(|h| h.id == conn.helper_id);
        if !known && let Some(helper) = state.user_repo.find_by_id(&conn.helper_id).await? {
            former.push(helper);
        }
    }

    let connected: Vec<(&User, &Connection)> = connections
        .iter()
        .filter_map(|conn| {
            helpers.iter().chain(former.iter())
                .find(|h| h.id == conn.helper_id)
                .map(|h| (h, conn))
        })
        .collect();

    let entries: Vec<SuggestionView> = matching::display_list(&client.needs, &org_id, &helpers, &connected)
        .into_iter()
        .map(|s| SuggestionView {
            helper: s.helper.clone(),
            score: s.score,
            connection_id: s.connection.map(|c| c.id.clone()),
            connection_status: s.connection.map(|c| c.status),
        })
        .collect();

    Ok(Json(entries))
}
