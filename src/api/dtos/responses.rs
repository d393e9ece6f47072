use crate::domain::models::{
    client::Client,
    connection::{Connection, ConnectionEvent, ConnectionStatus, ConnectionUpdate},
    org::{Org, OrgMetrics},
    rating::HelperRating,
    user::User,
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: User,
    pub org_names: Vec<String>,
    /// Only present on org-scoped listings: whether this org offers the helper for matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MainContact {
    pub display_name: String,
    pub email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgDetailResponse {
    #[serde(flatten)]
    pub org: Org,
    pub metrics: OrgMetrics,
    pub main_contacts: Vec<MainContact>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionUpdateView {
    #[serde(flatten)]
    pub update: ConnectionUpdate,
    pub created_by_display_name: String,
}

/// A connection with whichever related records the endpoint includes.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView {
    #[serde(flatten)]
    pub connection: Connection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updates: Option<Vec<ConnectionUpdateView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<ConnectionEvent>>,
}

impl ConnectionView {
    pub fn bare(connection: Connection) -> Self {
        Self {
            connection,
            client: None,
            helper: None,
            updates: None,
            history: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionView {
    pub helper: User,
    pub score: usize,
    pub connection_id: Option<String>,
    pub connection_status: Option<ConnectionStatus>,
}

#[derive(Serialize)]
pub struct RatingResponse {
    pub stars: Option<i64>,
    pub notes: Option<String>,
}

impl From<Option<HelperRating>> for RatingResponse {
    fn from(rating: Option<HelperRating>) -> Self {
        match rating {
            Some(r) => Self { stars: Some(r.stars), notes: r.notes },
            None => Self { stars: None, notes: None },
        }
    }
}
