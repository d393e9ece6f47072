use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Opaque bearer token, stored hashed. Tokens do not expire.
#[derive(Debug, FromRow, Clone)]
pub struct AuthTokenRecord {
    pub token_hash: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}
