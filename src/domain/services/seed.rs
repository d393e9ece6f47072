//! Startup data: the platform superadmin and an optional demo org.

use crate::domain::models::{
    client::Client,
    connection::{Connection, ConnectionEvent, ConnectionEventKind, ConnectionStatus},
    org::Org,
    user::{NewUserParams, Role, User},
};
use crate::domain::ports::UserRepository;
use crate::error::AppError;
use crate::state::AppState;
use tracing::info;

const DEMO_ORGADMIN: &str = "orgadmin@testorg.org";

pub async fn ensure_superadmin(user_repo: &dyn UserRepository, username: &str) -> Result<User, AppError> {
    if let Some(existing) = user_repo.find_by_username(username).await? {
        return Ok(existing);
    }

    let user = User::new(NewUserParams {
        username: username.to_string(),
        user_type: Role::Superadmin,
        org_id: None,
        display_name: "MMI Admin".to_string(),
        bio: None,
        needs: Vec::new(),
    });
    let created = user_repo.create(&user).await?;
    info!("Seeded superadmin {}", created.username);
    Ok(created)
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub async fn seed_demo_data(state: &AppState) -> Result<(), AppError> {
    if state.user_repo.find_by_username(DEMO_ORGADMIN).await?.is_some() {
        info!("Demo data already present, skipping");
        return Ok(());
    }

    let org = state.org_repo.create(&Org::new(
        "TestOrg".into(),
        "Jane Doe".into(),
        "jane@testorg.org".into(),
    )).await?;
    let other_org = state.org_repo.create(&Org::new(
        "OtherOrg".into(),
        "Other Contact".into(),
        "other@example.org".into(),
    )).await?;

    let orgadmin = state.user_repo.create(&User::new(NewUserParams {
        username: DEMO_ORGADMIN.into(),
        user_type: Role::Orgadmin,
        org_id: Some(org.id.clone()),
        display_name: "Org Admin".into(),
        bio: None,
        needs: Vec::new(),
    })).await?;

    let mut sarah = User::new(NewUserParams {
        username: "sarah.martinez@example.com".into(),
        user_type: Role::Serviceprovider,
        org_id: Some(org.id.clone()),
        display_name: "Sarah Martinez".into(),
        bio: Some("Mentors clients on employment, housing, and life skills.".into()),
        needs: tags(&["Employment", "Housing", "Life skills"]),
    });
    sarah.add_membership(&other_org.id);
    let sarah = state.user_repo.create(&sarah).await?;

    state.user_repo.create(&User::new(NewUserParams {
        username: "james.wilson@example.com".into(),
        user_type: Role::Serviceprovider,
        org_id: Some(org.id.clone()),
        display_name: "James Wilson".into(),
        bio: Some("Mentors on job readiness and workplace skills.".into()),
        needs: tags(&["Employment", "Life skills"]),
    })).await?;

    let demo_clients = [
        ("Margaret Thompson", "34 years old", "Seeking a mentor for employment readiness, housing, and accountability.", &["Employment", "Housing", "Life skills"][..]),
        ("Robert Chen", "28 years old", "Looking for a mentor to support job readiness and stable housing.", &["Employment", "Housing"][..]),
        ("Patricia Davis", "41 years old", "Seeking mentorship for life skills and planning.", &["Life skills", "Accountability"][..]),
    ];

    let mut clients = Vec::new();
    for (name, age, bio, needs) in demo_clients {
        let mut client = Client::new(org.id.clone(), name.to_string());
        client.age = Some(age.to_string());
        client.bio = Some(bio.to_string());
        client.needs = tags(needs);
        clients.push(state.client_repo.create(&client).await?);
    }

    let mut active = Connection::new(org.id.clone(), clients[0].id.clone(), sarah.id.clone(), orgadmin.id.clone());
    active.status = ConnectionStatus::Active;
    active.accepted_at = Some(active.created_at);
    let created = ConnectionEvent::new(
        active.id.clone(),
        ConnectionEventKind::Created,
        orgadmin.id.clone(),
        orgadmin.display_name.clone(),
        active.created_at,
    );
    let active = state.connection_repo.create(&active, &created).await?;
    let accepted = ConnectionEvent::new(
        active.id.clone(),
        ConnectionEventKind::Accepted,
        sarah.id.clone(),
        sarah.display_name.clone(),
        active.created_at,
    );
    state.connection_repo.record_transition(&active, &accepted).await?;

    let pending = Connection::new(org.id.clone(), clients[1].id.clone(), sarah.id.clone(), orgadmin.id.clone());
    let created = ConnectionEvent::new(
        pending.id.clone(),
        ConnectionEventKind::Created,
        orgadmin.id.clone(),
        orgadmin.display_name.clone(),
        pending.created_at,
    );
    state.connection_repo.create(&pending, &created).await?;

    info!("Seeded demo org {} ({})", org.name, org.id);
    Ok(())
}
