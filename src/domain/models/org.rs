use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::models::connection::{Connection, ConnectionStatus};
use crate::domain::models::user::{Role, User};

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Org {
    pub id: String,
    pub name: String,
    pub main_contact_name: String,
    pub main_contact_email: String,
    pub created_at: DateTime<Utc>,
}

impl Org {
    pub fn new(name: String, main_contact_name: String, main_contact_email: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            main_contact_name,
            main_contact_email,
            created_at: Utc::now(),
        }
    }
}

/// Counts shown on the org dashboard.
#[derive(Debug, Serialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrgMetrics {
    pub clients_count: usize,
    pub helpers_count: usize,
    pub connections_count: usize,
    pub active_connections: usize,
    pub pending_connections: usize,
}

impl OrgMetrics {
    /// `users` is every member of the org; only service providers count as helpers.
    pub fn compute(clients_count: usize, users: &[User], connections: &[Connection]) -> Self {
        let count_status = |status: ConnectionStatus| connections.iter().filter(|c| c.status == status).count();

        Self {
            clients_count,
            helpers_count: users.iter().filter(|u| u.user_type == Role::Serviceprovider).count(),
            connections_count: connections.len(),
            active_connections: count_status(ConnectionStatus::Active),
            pending_connections: count_status(ConnectionStatus::Pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::user::NewUserParams;

    fn member(role: Role) -> User {
        User::new(NewUserParams {
            username: format!("{:?}@org.test", role),
            user_type: role,
            org_id: Some("org-1".into()),
            display_name: "Member".into(),
            bio: None,
            needs: vec![],
        })
    }

    #[test]
    fn test_metrics_count_helpers_and_statuses() {
        let users = vec![member(Role::Orgadmin), member(Role::Serviceprovider), member(Role::Serviceprovider)];
        let mut active = Connection::new("org-1".into(), "c1".into(), "h1".into(), "a".into());
        active.status = ConnectionStatus::Active;
        let pending = Connection::new("org-1".into(), "c2".into(), "h2".into(), "a".into());
        let mut declined = Connection::new("org-1".into(), "c3".into(), "h2".into(), "a".into());
        declined.status = ConnectionStatus::Declined;

        let metrics = OrgMetrics::compute(4, &users, &[active, pending, declined]);

        assert_eq!(
            metrics,
            OrgMetrics {
                clients_count: 4,
                helpers_count: 2,
                connections_count: 3,
                active_connections: 1,
                pending_connections: 1,
            }
        );
    }
}
