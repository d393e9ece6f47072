use crate::domain::{models::connection::ConnectionUpdate, ports::ConnectionUpdateRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{types::Json, SqlitePool};

pub struct SqliteConnectionUpdateRepo {
    pool: SqlitePool,
}

impl SqliteConnectionUpdateRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectionUpdateRepository for SqliteConnectionUpdateRepo {
    async fn create(&self, update: &ConnectionUpdate) -> Result<ConnectionUpdate, AppError> {
        sqlx::query_as::<_, ConnectionUpdate>(
            "INSERT INTO connection_updates (id, connection_id, event_name, event_time, notes, media, created_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&update.id)
            .bind(&update.connection_id)
            .bind(&update.event_name)
            .bind(update.event_time)
            .bind(&update.notes)
            .bind(Json(&update.media))
            .bind(&update.created_by)
            .bind(update.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_connection(&self, connection_id: &str) -> Result<Vec<ConnectionUpdate>, AppError> {
        sqlx::query_as::<_, ConnectionUpdate>(
            "SELECT * FROM connection_updates WHERE connection_id = ? ORDER BY event_time DESC, rowid DESC"
        )
            .bind(connection_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
