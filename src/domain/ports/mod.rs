use crate::domain::models::{
    auth::AuthTokenRecord,
    client::Client,
    connection::{Connection, ConnectionEvent, ConnectionUpdate},
    org::Org,
    rating::HelperRating,
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait OrgRepository: Send + Sync {
    async fn create(&self, org: &Org) -> Result<Org, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Org>, AppError>;
    async fn list(&self) -> Result<Vec<Org>, AppError>;
    async fn update(&self, org: &Org) -> Result<Org, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    /// Case-insensitive, whitespace-trimmed lookup.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    /// Every user with a membership in the org, in creation order.
    async fn list_by_org(&self, org_id: &str) -> Result<Vec<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
}

/// Opaque bearer token store.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_token(&self, record: &AuthTokenRecord) -> Result<(), AppError>;
    async fn find_token(&self, token_hash: &str) -> Result<Option<AuthTokenRecord>, AppError>;
    async fn delete_token(&self, token_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn create(&self, client: &Client) -> Result<Client, AppError>;
    async fn find_by_id(&self, org_id: &str, id: &str) -> Result<Option<Client>, AppError>;
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Client>, AppError>;
    async fn list_by_org(&self, org_id: &str) -> Result<Vec<Client>, AppError>;
    async fn update(&self, client: &Client) -> Result<Client, AppError>;
    async fn delete(&self, org_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Inserts the connection together with its `created` history entry.
    async fn create(&self, connection: &Connection, event: &ConnectionEvent) -> Result<Connection, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Connection>, AppError>;
    async fn list_by_org(&self, org_id: &str) -> Result<Vec<Connection>, AppError>;
    async fn list_by_helper(&self, helper_id: &str) -> Result<Vec<Connection>, AppError>;
    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Connection>, AppError>;
    /// Writes the new status and timestamps and appends the history entry atomically.
    async fn record_transition(&self, connection: &Connection, event: &ConnectionEvent) -> Result<Connection, AppError>;
    async fn list_events(&self, connection_id: &str) -> Result<Vec<ConnectionEvent>, AppError>;
}

#[async_trait]
pub trait ConnectionUpdateRepository: Send + Sync {
    async fn create(&self, update: &ConnectionUpdate) -> Result<ConnectionUpdate, AppError>;
    /// Newest `event_time` first.
    async fn list_by_connection(&self, connection_id: &str) -> Result<Vec<ConnectionUpdate>, AppError>;
}

#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn find(&self, org_id: &str, helper_id: &str) -> Result<Option<HelperRating>, AppError>;
    async fn upsert(&self, rating: &HelperRating) -> Result<HelperRating, AppError>;
}
