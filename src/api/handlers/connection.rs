use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, org::OrgId};
use crate::api::dtos::requests::{
    optional, required, CreateConnectionRequest, CreateConnectionUpdateRequest, MyConnectionsQuery,
    PatchConnectionStatusRequest,
};
use crate::api::dtos::responses::{ConnectionUpdateView, ConnectionView};
use crate::api::handlers::{load_org, load_org_helper};
use crate::domain::models::connection::{
    Connection, ConnectionEvent, ConnectionEventKind, ConnectionUpdate, MediaItem, MediaKind,
    NewConnectionUpdateParams,
};
use crate::domain::models::user::User;
use crate::domain::services::lifecycle::{self, Transition};
use crate::domain::services::policy::{self, Action, Target};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, Span};

async fn load_connection(state: &AppState, id: &str) -> Result<Connection, AppError> {
    let connection = state.connection_repo.find_by_id(id).await?
        .ok_or_else(|| AppError::NotFound("Connection not found".into()))?;
    Span::current().record("org_id", connection.org_id.as_str());
    Ok(connection)
}

/// Updates newest first, each with its author's display name.
async fn update_views(state: &AppState, connection_id: &str) -> Result<Vec<ConnectionUpdateView>, AppError> {
    let updates = state.update_repo.list_by_connection(connection_id).await?;
    let mut names: HashMap<String, String> = HashMap::new();
    let mut views = Vec::with_capacity(updates.len());

    for update in updates {
        if !names.contains_key(&update.created_by) {
            let name = state.user_repo.find_by_id(&update.created_by).await?
                .map(|u| u.display_name)
                .unwrap_or_else(|| "Unknown".to_string());
            names.insert(update.created_by.clone(), name);
        }
        let created_by_display_name = names.get(&update.created_by).cloned().unwrap_or_default();
        views.push(ConnectionUpdateView { update, created_by_display_name });
    }

    Ok(views)
}

async fn full_view(state: &AppState, connection: Connection) -> Result<ConnectionView, AppError> {
    let client = state.client_repo.find_by_id(&connection.org_id, &connection.client_id).await?;
    let helper = state.user_repo.find_by_id(&connection.helper_id).await?;
    let updates = update_views(state, &connection.id).await?;
    let history = state.connection_repo.list_events(&connection.id).await?;

    Ok(ConnectionView {
        connection,
        client,
        helper,
        updates: Some(updates),
        history: Some(history),
    })
}

/// Loads and authorizes, then runs one state-machine step.
async fn transition_connection(
    state: &AppState,
    user: &User,
    connection_id: &str,
    transition: Transition,
) -> Result<Connection, AppError> {
    let connection = load_connection(state, connection_id).await?;

    let action = if transition.is_response() {
        Action::RespondToConnection
    } else {
        Action::ChangeConnectionStatus
    };
    policy::authorize(user, action, Target::Connection(&connection))?;

    record_transition(state, user, connection, transition).await
}

/// Applies `transition` to an already authorized connection and records it in
/// the connection's history.
async fn record_transition(
    state: &AppState,
    user: &User,
    connection: Connection,
    transition: Transition,
) -> Result<Connection, AppError> {
    let now = Utc::now();
    let next = lifecycle::apply(&connection, transition, now)?;
    let event = ConnectionEvent::new(
        connection.id.clone(),
        transition.event_kind(),
        user.id.clone(),
        user.display_name.clone(),
        now,
    );
    let saved = state.connection_repo.record_transition(&next, &event).await?;

    info!("Connection {} {}: {} -> {}", saved.id, transition, connection.status, saved.status);
    Ok(saved)
}

pub async fn list_org_connections(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageConnections, &org_id).await?;

    let connections = state.connection_repo.list_by_org(&org_id).await?;
    let clients: HashMap<String, _> = state.client_repo.list_by_org(&org_id).await?
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect();
    let mut helpers: HashMap<String, User> = state.user_repo.list_by_org(&org_id).await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    let mut views = Vec::with_capacity(connections.len());
    for connection in connections {
        let client = clients.get(&connection.client_id).cloned();
        let helper = match helpers.get(&connection.helper_id) {
            Some(h) => Some(h.clone()),
            None => {
                let found = state.user_repo.find_by_id(&connection.helper_id).await?;
                if let Some(h) = &found {
                    helpers.insert(h.id.clone(), h.clone());
                }
                found
            }
        };
        let updates = update_views(&state, &connection.id).await?;
        let history = state.connection_repo.list_events(&connection.id).await?;
        views.push(ConnectionView {
            connection,
            client,
            helper,
            updates: Some(updates),
            history: Some(history),
        });
    }

    Ok(Json(views))
}

pub async fn create_connection(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateConnectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    load_org(&state, &user, Action::ManageConnections, &org_id).await?;

    let client = state.client_repo.find_by_id(&org_id, payload.client_id.trim()).await?
        .ok_or_else(|| AppError::NotFound("Client not found".into()))?;
    let helper = load_org_helper(&state, &org_id, payload.helper_id.trim()).await?;

    let connection = Connection::new(org_id, client.id.clone(), helper.id.clone(), user.id.clone());
    let event = ConnectionEvent::new(
        connection.id.clone(),
        ConnectionEventKind::Created,
        user.id.clone(),
        user.display_name.clone(),
        connection.created_at,
    );
    let created = state.connection_repo.create(&connection, &event).await?;

    info!("Connection requested: {} (client {} -> helper {})", created.id, client.id, helper.id);
    Ok((
        StatusCode::CREATED,
        Json(ConnectionView {
            connection: created,
            client: Some(client),
            helper: Some(helper),
            updates: None,
            history: None,
        }),
    ))
}

pub async fn my_connections(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<MyConnectionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(&user, Action::ListOwnConnections, Target::Platform)?;

    let org_filter = optional(query.org_id);
    let connections: Vec<Connection> = state.connection_repo.list_by_helper(&user.id).await?
        .into_iter()
        .filter(|c| org_filter.as_deref().is_none_or(|org| c.org_id == org))
        .collect();

    let client_ids: Vec<String> = connections.iter().map(|c| c.client_id.clone()).collect();
    let clients: HashMap<String, _> = state.client_repo.find_by_ids(&client_ids).await?
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect();

    let mut views = Vec::with_capacity(connections.len());
    for connection in connections {
        let client = clients.get(&connection.client_id).cloned();
        let updates = update_views(&state, &connection.id).await?;
        views.push(ConnectionView {
            client,
            updates: Some(updates),
            ..ConnectionView::bare(connection)
        });
    }

    Ok(Json(views))
}

pub async fn get_connection(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(connection_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let connection = load_connection(&state, &connection_id).await?;
    policy::authorize(&user, Action::ViewConnection, Target::Connection(&connection))?;
    Ok(Json(full_view(&state, connection).await?))
}

pub async fn accept_connection(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(connection_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let connection = transition_connection(&state, &user, &connection_id, Transition::Accept).await?;
    Ok(Json(connection))
}

pub async fn decline_connection(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(connection_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let connection = transition_connection(&state, &user, &connection_id, Transition::Decline).await?;
    Ok(Json(connection))
}

pub async fn update_connection_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(connection_id): Path<String>,
    Json(payload): Json<PatchConnectionStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let connection = load_connection(&state, &connection_id).await?;
    policy::authorize(&user, Action::ChangeConnectionStatus, Target::Connection(&connection))?;

    let transition = Transition::for_requested_status(payload.status)?;
    let connection = record_transition(&state, &user, connection, transition).await?;
    Ok(Json(connection))
}

pub async fn add_connection_update(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(connection_id): Path<String>,
    Json(payload): Json<CreateConnectionUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let connection = load_connection(&state, &connection_id).await?;
    policy::authorize(&user, Action::LogConnectionUpdate, Target::Connection(&connection))?;

    let event_name = required("eventName", &payload.event_name)?;
    let mut media = Vec::new();
    for item in payload.media.unwrap_or_default() {
        let url = item.url.trim();
        if url.is_empty() {
            continue;
        }
        media.push(MediaItem { url: url.to_string(), kind: MediaKind::parse_lenient(&item.kind) });
    }

    let update = ConnectionUpdate::new(NewConnectionUpdateParams {
        connection_id: connection.id.clone(),
        event_name,
        event_time: payload.event_time,
        notes: optional(payload.notes),
        media,
        created_by: user.id.clone(),
    });
    let created = state.update_repo.create(&update).await?;

    info!("Update logged on connection {}: {}", connection.id, created.event_name);
    Ok((
        StatusCode::CREATED,
        Json(ConnectionUpdateView { update: created, created_by_display_name: user.display_name }),
    ))
}
