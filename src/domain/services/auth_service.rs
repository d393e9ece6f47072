use std::sync::Arc;
use crate::domain::{
    models::{auth::AuthTokenRecord, user::User},
    ports::{AuthRepository, UserRepository},
};
use crate::error::AppError;
use uuid::Uuid;
use chrono::Utc;
use sha2::{Sha256, Digest};
use tracing::debug;

/// Username-only login issuing opaque bearer tokens. Tokens never expire; only
/// their SHA-256 is stored.
pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self { repo, user_repo }
    }

    pub async fn login(&self, username: &str) -> Result<(User, String), AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::Validation("Username is required".into()));
        }

        let user = self.user_repo.find_by_username(username).await?
            .ok_or(AppError::Unauthorized)?;

        let token = self.issue_token(&user).await?;
        Ok((user, token))
    }

    pub async fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let token = Uuid::new_v4().to_string();
        let record = AuthTokenRecord {
            token_hash: self.hash_token(&token),
            user_id: user.id.clone(),
            created_at: Utc::now(),
        };
        self.repo.create_token(&record).await?;
        Ok(token)
    }

    /// Resolves a bearer token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let record = self.repo.find_token(&self.hash_token(token)).await?
            .ok_or(AppError::Unauthorized)?;

        match self.user_repo.find_by_id(&record.user_id).await? {
            Some(user) => Ok(user),
            None => {
                debug!("Token references missing user {}", record.user_id);
                Err(AppError::Unauthorized)
            }
        }
    }

    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.repo.delete_token(&self.hash_token(token)).await
    }

    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
