use crate::domain::{
    models::connection::{Connection, ConnectionEvent},
    ports::ConnectionRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

pub struct SqliteConnectionRepo {
    pool: SqlitePool,
}

impl SqliteConnectionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn insert_event(tx: &mut Transaction<'_, Sqlite>, event: &ConnectionEvent) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO connection_events (id, connection_id, transition, actor_id, actor_display_name, created_at) VALUES (?, ?, ?, ?, ?, ?)"
    )
        .bind(&event.id)
        .bind(&event.connection_id)
        .bind(event.transition)
        .bind(&event.actor_id)
        .bind(&event.actor_display_name)
        .bind(event.created_at)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;
    Ok(())
}

#[async_trait]
impl ConnectionRepository for SqliteConnectionRepo {
    async fn create(&self, connection: &Connection, event: &ConnectionEvent) -> Result<Connection, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Connection>(
            "INSERT INTO connections (id, org_id, client_id, helper_id, status, created_by_id, created_at, accepted_at, declined_at, paused_at, completed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&connection.id).bind(&connection.org_id).bind(&connection.client_id).bind(&connection.helper_id)
            .bind(connection.status).bind(&connection.created_by_id).bind(connection.created_at)
            .bind(connection.accepted_at).bind(connection.declined_at).bind(connection.paused_at).bind(connection.completed_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        insert_event(&mut tx, event).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Connection>, AppError> {
        sqlx::query_as::<_, Connection>("SELECT * FROM connections WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_org(&self, org_id: &str) -> Result<Vec<Connection>, AppError> {
        sqlx::query_as::<_, Connection>("SELECT * FROM connections WHERE org_id = ? ORDER BY created_at ASC, rowid ASC")
            .bind(org_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_helper(&self, helper_id: &str) -> Result<Vec<Connection>, AppError> {
        sqlx::query_as::<_, Connection>("SELECT * FROM connections WHERE helper_id = ? ORDER BY created_at ASC, rowid ASC")
            .bind(helper_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_client(&self, client_id: &str) -> Result<Vec<Connection>, AppError> {
        sqlx::query_as::<_, Connection>("SELECT * FROM connections WHERE client_id = ? ORDER BY created_at ASC, rowid ASC")
            .bind(client_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn record_transition(&self, connection: &Connection, event: &ConnectionEvent) -> Result<Connection, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let updated = sqlx::query_as::<_, Connection>(
            "UPDATE connections SET status = ?, accepted_at = ?, declined_at = ?, paused_at = ?, completed_at = ? WHERE id = ? RETURNING *"
        )
            .bind(connection.status).bind(connection.accepted_at).bind(connection.declined_at)
            .bind(connection.paused_at).bind(connection.completed_at).bind(&connection.id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Connection not found".into()))?;

        insert_event(&mut tx, event).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn list_events(&self, connection_id: &str) -> Result<Vec<ConnectionEvent>, AppError> {
        sqlx::query_as::<_, ConnectionEvent>(
            "SELECT * FROM connection_events WHERE connection_id = ? ORDER BY created_at ASC, rowid ASC"
        )
            .bind(connection_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
