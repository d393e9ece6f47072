use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, org::OrgId};
use crate::api::dtos::requests::{required, validate_email, CreateOrgRequest, UpdateOrgRequest};
use crate::api::dtos::responses::{MainContact, OrgDetailResponse};
use crate::api::handlers::load_org;
use crate::domain::models::org::{Org, OrgMetrics};
use crate::domain::models::user::Role;
use crate::domain::services::policy::{self, Action, Target};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_orgs(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(&user, Action::ListOrgs, Target::Platform)?;
    let orgs = state.org_repo.list().await?;
    Ok(Json(orgs))
}

pub async fn create_org(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateOrgRequest>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(&user, Action::CreateOrg, Target::Platform)?;

    let org = Org::new(
        required("name", &payload.name)?,
        required("mainContactName", &payload.main_contact_name)?,
        validate_email("mainContactEmail", &payload.main_contact_email)?,
    );
    let created = state.org_repo.create(&org).await?;

    info!("Created org: {} ({})", created.name, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_org(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let org = load_org(&state, &user, Action::ViewOrg, &org_id).await?;

    let clients = state.client_repo.list_by_org(&org_id).await?;
    let members = state.user_repo.list_by_org(&org_id).await?;
    let connections = state.connection_repo.list_by_org(&org_id).await?;

    let metrics = OrgMetrics::compute(clients.len(), &members, &connections);

    let mut main_contacts: Vec<MainContact> = members
        .into_iter()
        .filter(|u| u.user_type == Role::Orgadmin)
        .map(|u| MainContact { display_name: u.display_name, email: u.username })
        .collect();
    if main_contacts.is_empty() {
        main_contacts.push(MainContact {
            display_name: org.main_contact_name.clone(),
            email: org.main_contact_email.clone(),
        });
    }

    Ok(Json(OrgDetailResponse { org, metrics, main_contacts }))
}

pub async fn update_org(
    State(state): State<Arc<AppState>>,
    OrgId(org_id): OrgId,
    AuthUser(user): AuthUser,
    Json(payload): Json<UpdateOrgRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut org = load_org(&state, &user, Action::UpdateOrg, &org_id).await?;

    if let Some(name) = payload.name {
        org.name = required("name", &name)?;
    }
    if let Some(contact_name) = payload.main_contact_name {
        org.main_contact_name = required("mainContactName", &contact_name)?;
    }
    if let Some(contact_email) = payload.main_contact_email {
        org.main_contact_email = validate_email("mainContactEmail", &contact_email)?;
    }

    let updated = state.org_repo.update(&org).await?;
    info!("Updated org: {}", updated.id);
    Ok(Json(updated))
}
