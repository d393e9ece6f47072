use crate::domain::{models::user::User, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{types::Json, SqlitePool};

const USER_COLUMNS: &str = "id, username, user_type, org_id, org_ids, display_name, bio, needs, inactive_org_ids, created_at";

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, username, username_key, user_type, org_id, org_ids, display_name, bio, needs, inactive_org_ids, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
            .bind(&user.id)
            .bind(&user.username)
            .bind(User::username_key(&user.username))
            .bind(user.user_type)
            .bind(&user.org_id)
            .bind(Json(&user.org_ids))
            .bind(&user.display_name)
            .bind(&user.bio)
            .bind(Json(&user.needs))
            .bind(Json(&user.inactive_org_ids))
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username_key = ?"
        ))
            .bind(User::username_key(username))
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_org(&self, org_id: &str) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE org_id = ? OR EXISTS (SELECT 1 FROM json_each(users.org_ids) WHERE json_each.value = ?)
             ORDER BY created_at ASC, rowid ASC"
        ))
            .bind(org_id)
            .bind(org_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET org_id=?, org_ids=?, display_name=?, bio=?, needs=?, inactive_org_ids=?
             WHERE id=? RETURNING {USER_COLUMNS}"
        ))
            .bind(&user.org_id)
            .bind(Json(&user.org_ids))
            .bind(&user.display_name)
            .bind(&user.bio)
            .bind(Json(&user.needs))
            .bind(Json(&user.inactive_org_ids))
            .bind(&user.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
