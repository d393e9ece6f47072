use crate::domain::{models::rating::HelperRating, ports::RatingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteRatingRepo {
    pool: SqlitePool,
}

impl SqliteRatingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingRepository for SqliteRatingRepo {
    async fn find(&self, org_id: &str, helper_id: &str) -> Result<Option<HelperRating>, AppError> {
        sqlx::query_as::<_, HelperRating>("SELECT * FROM helper_ratings WHERE org_id = ? AND helper_id = ?")
            .bind(org_id)
            .bind(helper_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert(&self, rating: &HelperRating) -> Result<HelperRating, AppError> {
        sqlx::query_as::<_, HelperRating>(
            "INSERT INTO helper_ratings (org_id, helper_id, stars, notes, updated_by, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(org_id, helper_id) DO UPDATE SET
                stars = excluded.stars,
                notes = excluded.notes,
                updated_by = excluded.updated_by,
                updated_at = excluded.updated_at
             RETURNING *"
        )
            .bind(&rating.org_id)
            .bind(&rating.helper_id)
            .bind(rating.stars)
            .bind(&rating.notes)
            .bind(&rating.updated_by)
            .bind(rating.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
