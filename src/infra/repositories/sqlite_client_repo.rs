use crate::domain::{models::client::Client, ports::ClientRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{types::Json, QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteClientRepo {
    pool: SqlitePool,
}

impl SqliteClientRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for SqliteClientRepo {
    async fn create(&self, client: &Client) -> Result<Client, AppError> {
        sqlx::query_as::<_, Client>(
            "INSERT INTO clients (id, org_id, name, age, bio, address, contact, story, notes, needs, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&client.id)
            .bind(&client.org_id)
            .bind(&client.name)
            .bind(&client.age)
            .bind(&client.bio)
            .bind(&client.address)
            .bind(&client.contact)
            .bind(&client.story)
            .bind(&client.notes)
            .bind(Json(&client.needs))
            .bind(client.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, org_id: &str, id: &str) -> Result<Option<Client>, AppError> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE org_id = ? AND id = ?")
            .bind(org_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Client>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM clients WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(")");

        builder
            .build_query_as::<Client>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_org(&self, org_id: &str) -> Result<Vec<Client>, AppError> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE org_id = ? ORDER BY created_at ASC, rowid ASC")
            .bind(org_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, client: &Client) -> Result<Client, AppError> {
        sqlx::query_as::<_, Client>(
            "UPDATE clients SET name=?, age=?, bio=?, address=?, contact=?, story=?, notes=?, needs=?
             WHERE id=? AND org_id=? RETURNING *"
        )
            .bind(&client.name)
            .bind(&client.age)
            .bind(&client.bio)
            .bind(&client.address)
            .bind(&client.contact)
            .bind(&client.story)
            .bind(&client.notes)
            .bind(Json(&client.needs))
            .bind(&client.id)
            .bind(&client.org_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, org_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE org_id = ? AND id = ?")
            .bind(org_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Client not found".into()));
        }
        Ok(())
    }
}
