use crate::domain::{models::org::Org, ports::OrgRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteOrgRepo {
    pool: SqlitePool,
}

impl SqliteOrgRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrgRepository for SqliteOrgRepo {
    async fn create(&self, org: &Org) -> Result<Org, AppError> {
        sqlx::query_as::<_, Org>(
            "INSERT INTO orgs (id, name, main_contact_name, main_contact_email, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&org.id)
            .bind(&org.name)
            .bind(&org.main_contact_name)
            .bind(&org.main_contact_email)
            .bind(org.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Org>, AppError> {
        sqlx::query_as::<_, Org>(
            "SELECT * FROM orgs WHERE id = ?",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Org>, AppError> {
        sqlx::query_as::<_, Org>(
            "SELECT * FROM orgs ORDER BY created_at ASC, rowid ASC",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, org: &Org) -> Result<Org, AppError> {
        sqlx::query_as::<_, Org>(
            "UPDATE orgs SET name=?, main_contact_name=?, main_contact_email=? WHERE id=? RETURNING *"
        )
            .bind(&org.name)
            .bind(&org.main_contact_name)
            .bind(&org.main_contact_email)
            .bind(&org.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
