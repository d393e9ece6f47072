//! Role × action authorization table, checked once per request.

use crate::domain::models::connection::Connection;
use crate::domain::models::user::{Role, User};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListOrgs,
    CreateOrg,
    ViewOrg,
    UpdateOrg,
    /// Client CRUD and suggestions.
    ManageClients,
    /// Org user listing/creation and the helper active flag.
    ManageUsers,
    /// Adding a helper to a further org.
    ManageMemberships,
    ManageConnections,
    ListOwnConnections,
    ViewConnection,
    /// Accept or decline.
    RespondToConnection,
    /// Pause, resume, complete.
    ChangeConnectionStatus,
    LogConnectionUpdate,
    ManageRatings,
    UpdateOwnProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Always,
    /// Caller must belong to the target org.
    OwnOrg,
    /// Caller must be the helper named on the target connection.
    OwnConnection,
    Never,
}

/// What the action is performed on.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Platform,
    Org(&'a str),
    Connection(&'a Connection),
}

pub fn grant(role: Role, action: Action) -> Grant {
    use Action::*;

    match (role, action) {
        (_, UpdateOwnProfile) => Grant::Always,

        (Role::Superadmin, ListOwnConnections | RespondToConnection | LogConnectionUpdate) => Grant::Never,
        (Role::Superadmin, _) => Grant::Always,

        (
            Role::Orgadmin,
            ViewOrg | UpdateOrg | ManageClients | ManageUsers | ManageConnections | ViewConnection
            | ChangeConnectionStatus | ManageRatings,
        ) => Grant::OwnOrg,
        (Role::Orgadmin, _) => Grant::Never,

        (Role::Serviceprovider, ListOwnConnections) => Grant::Always,
        (
            Role::Serviceprovider,
            ViewConnection | RespondToConnection | ChangeConnectionStatus | LogConnectionUpdate,
        ) => Grant::OwnConnection,
        (Role::Serviceprovider, _) => Grant::Never,
    }
}

pub fn is_allowed(user: &User, action: Action, target: Target<'_>) -> bool {
    match grant(user.user_type, action) {
        Grant::Always => true,
        Grant::Never => false,
        Grant::OwnOrg => match target {
            Target::Org(org_id) => user.is_member_of(org_id),
            Target::Connection(conn) => user.is_member_of(&conn.org_id),
            Target::Platform => false,
        },
        Grant::OwnConnection => match target {
            Target::Connection(conn) => conn.helper_id == user.id,
            _ => false,
        },
    }
}

pub fn authorize(user: &User, action: Action, target: Target<'_>) -> Result<(), AppError> {
    if is_allowed(user, action, target) {
        Ok(())
    } else {
        Err(AppError::Forbidden(denial_message(action).into()))
    }
}

fn denial_message(action: Action) -> &'static str {
    use Action::*;

    match action {
        ListOrgs | CreateOrg | ManageMemberships => "Not allowed: requires superadmin",
        ListOwnConnections => "Not allowed: service providers only",
        RespondToConnection | LogConnectionUpdate => "Not allowed: requires the connection's helper",
        ViewConnection | ChangeConnectionStatus => {
            "Not allowed: requires staff of this org or the connection's helper"
        }
        ViewOrg | UpdateOrg | ManageClients | ManageUsers | ManageConnections | ManageRatings => {
            "Not allowed: requires staff of this org"
        }
        UpdateOwnProfile => "Not allowed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::user::NewUserParams;

    fn user(role: Role, org: Option<&str>) -> User {
        User::new(NewUserParams {
            username: format!("{:?}@test", role),
            user_type: role,
            org_id: org.map(String::from),
            display_name: "Test".into(),
            bio: None,
            needs: vec![],
        })
    }

    fn connection_for(helper: &User, org: &str) -> Connection {
        Connection::new(org.into(), "client".into(), helper.id.clone(), "admin".into())
    }

    #[test]
    fn test_org_management_is_superadmin_only() {
        let superadmin = user(Role::Superadmin, None);
        let orgadmin = user(Role::Orgadmin, Some("org-a"));
        let helper = user(Role::Serviceprovider, Some("org-a"));

        for action in [Action::ListOrgs, Action::CreateOrg, Action::ManageMemberships] {
            assert!(is_allowed(&superadmin, action, Target::Platform));
            assert!(!is_allowed(&orgadmin, action, Target::Platform));
            assert!(!is_allowed(&helper, action, Target::Platform));
        }
    }

    #[test]
    fn test_orgadmin_limited_to_own_org() {
        let orgadmin = user(Role::Orgadmin, Some("org-a"));

        for action in [Action::ViewOrg, Action::ManageClients, Action::ManageConnections, Action::ManageRatings] {
            assert!(is_allowed(&orgadmin, action, Target::Org("org-a")));
            assert!(!is_allowed(&orgadmin, action, Target::Org("org-b")));
        }
    }

    #[test]
    fn test_helper_never_sees_staff_resources() {
        let helper = user(Role::Serviceprovider, Some("org-a"));

        for action in [Action::ManageClients, Action::ManageConnections, Action::ManageRatings, Action::ViewOrg] {
            assert!(!is_allowed(&helper, action, Target::Org("org-a")));
        }
        assert!(is_allowed(&helper, Action::ListOwnConnections, Target::Platform));
    }

    #[test]
    fn test_only_own_helper_can_respond() {
        let helper = user(Role::Serviceprovider, Some("org-a"));
        let other = user(Role::Serviceprovider, Some("org-a"));
        let orgadmin = user(Role::Orgadmin, Some("org-a"));
        let superadmin = user(Role::Superadmin, None);
        let conn = connection_for(&helper, "org-a");

        assert!(is_allowed(&helper, Action::RespondToConnection, Target::Connection(&conn)));
        assert!(!is_allowed(&other, Action::RespondToConnection, Target::Connection(&conn)));
        assert!(!is_allowed(&orgadmin, Action::RespondToConnection, Target::Connection(&conn)));
        assert!(!is_allowed(&superadmin, Action::RespondToConnection, Target::Connection(&conn)));
    }

    #[test]
    fn test_status_changes_by_staff_or_own_helper() {
        let helper = user(Role::Serviceprovider, Some("org-a"));
        let other = user(Role::Serviceprovider, Some("org-a"));
        let orgadmin = user(Role::Orgadmin, Some("org-a"));
        let foreign_admin = user(Role::Orgadmin, Some("org-b"));
        let superadmin = user(Role::Superadmin, None);
        let conn = connection_for(&helper, "org-a");

        let target = Target::Connection(&conn);
        assert!(is_allowed(&helper, Action::ChangeConnectionStatus, target));
        assert!(is_allowed(&orgadmin, Action::ChangeConnectionStatus, target));
        assert!(is_allowed(&superadmin, Action::ChangeConnectionStatus, target));
        assert!(!is_allowed(&other, Action::ChangeConnectionStatus, target));
        assert!(!is_allowed(&foreign_admin, Action::ChangeConnectionStatus, target));
    }

    #[test]
    fn test_everyone_updates_own_profile() {
        for role in [Role::Superadmin, Role::Orgadmin, Role::Serviceprovider] {
            assert_eq!(grant(role, Action::UpdateOwnProfile), Grant::Always);
        }
    }

    #[test]
    fn test_denial_is_forbidden_error() {
        let helper = user(Role::Serviceprovider, Some("org-a"));
        match authorize(&helper, Action::ManageClients, Target::Org("org-a")) {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "Not allowed: requires staff of this org"),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }
}
