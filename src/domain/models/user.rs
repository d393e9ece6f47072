use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Orgadmin,
    Serviceprovider,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub user_type: Role,
    /// Primary org. `None` only for superadmins.
    pub org_id: Option<String>,
    /// Every org the user belongs to, primary org included.
    #[sqlx(json)]
    pub org_ids: Vec<String>,
    pub display_name: String,
    pub bio: Option<String>,
    #[sqlx(json)]
    pub needs: Vec<String>,
    /// Orgs where staff have paused this helper. Each org only sees its own entry.
    #[sqlx(json)]
    #[serde(skip)]
    pub inactive_org_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewUserParams {
    pub username: String,
    pub user_type: Role,
    pub org_id: Option<String>,
    pub display_name: String,
    pub bio: Option<String>,
    pub needs: Vec<String>,
}

impl User {
    pub fn new(params: NewUserParams) -> Self {
        let org_ids = params.org_id.iter().cloned().collect();
        Self {
            id: Uuid::new_v4().to_string(),
            username: params.username.trim().to_string(),
            user_type: params.user_type,
            org_id: params.org_id,
            org_ids,
            display_name: params.display_name,
            bio: params.bio,
            needs: params.needs,
            inactive_org_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Lookup key for case-insensitive username uniqueness.
    pub fn username_key(username: &str) -> String {
        username.trim().to_lowercase()
    }

    pub fn is_member_of(&self, org_id: &str) -> bool {
        self.org_id.as_deref() == Some(org_id) || self.org_ids.iter().any(|id| id == org_id)
    }

    pub fn is_helper_in(&self, org_id: &str) -> bool {
        self.user_type == Role::Serviceprovider && self.is_member_of(org_id)
    }

    pub fn is_active_in(&self, org_id: &str) -> bool {
        !self.inactive_org_ids.iter().any(|id| id == org_id)
    }

    pub fn set_active_in(&mut self, org_id: &str, active: bool) {
        self.inactive_org_ids.retain(|id| id != org_id);
        if !active {
            self.inactive_org_ids.push(org_id.to_string());
        }
    }

    pub fn add_membership(&mut self, org_id: &str) {
        if !self.org_ids.iter().any(|id| id == org_id) {
            self.org_ids.push(org_id.to_string());
        }
        if self.org_id.is_none() {
            self.org_id = Some(org_id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper(org: &str) -> User {
        User::new(NewUserParams {
            username: "  Sarah@Example.com ".into(),
            user_type: Role::Serviceprovider,
            org_id: Some(org.into()),
            display_name: "Sarah".into(),
            bio: None,
            needs: vec![],
        })
    }

    #[test]
    fn test_new_user_is_member_of_primary_org() {
        let user = helper("org-1");
        assert_eq!(user.username, "Sarah@Example.com");
        assert_eq!(user.org_ids, vec!["org-1".to_string()]);
        assert!(user.is_helper_in("org-1"));
        assert!(!user.is_helper_in("org-2"));
        assert!(user.is_active_in("org-1"));
    }

    #[test]
    fn test_add_membership_is_idempotent() {
        let mut user = helper("org-1");
        user.add_membership("org-2");
        user.add_membership("org-2");
        assert_eq!(user.org_ids.len(), 2);
        assert_eq!(user.org_id.as_deref(), Some("org-1"));
        assert!(user.is_helper_in("org-2"));
    }

    #[test]
    fn test_active_flag_is_per_org() {
        let mut user = helper("org-1");
        user.add_membership("org-2");

        user.set_active_in("org-2", false);
        user.set_active_in("org-2", false);
        assert!(user.is_active_in("org-1"));
        assert!(!user.is_active_in("org-2"));
        assert_eq!(user.inactive_org_ids.len(), 1);

        user.set_active_in("org-2", true);
        assert!(user.is_active_in("org-2"));
        assert!(user.inactive_org_ids.is_empty());
    }

    #[test]
    fn test_username_key_ignores_case_and_whitespace() {
        assert_eq!(User::username_key(" Admin@MMI.org "), "admin@mmi.org");
    }
}
