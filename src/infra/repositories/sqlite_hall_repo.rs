use crate::domain::{models::hall::Hall, ports::HallRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteHallRepo {
    pool: SqlitePool,
}

impl SqliteHallRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HallRepository for SqliteHallRepo {
    async fn create(&self, hall: &Hall) -> Result<Hall, AppError> {
        sqlx::query_as::<_, Hall>(
            "INSERT INTO halls (id, cinema_id, name, capacity, seat_grid, features, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&hall.id).bind(&hall.cinema_id).bind(&hall.name).bind(hall.capacity)
            .bind(&hall.seat_grid).bind(&hall.features)
            .bind(hall.is_active).bind(hall.created_at).bind(hall.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Hall>, AppError> {
        sqlx::query_as::<_, Hall>("SELECT * FROM halls WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_cinema(&self, cinema_id: &str) -> Result<Vec<Hall>, AppError> {
        sqlx::query_as::<_, Hall>("SELECT * FROM halls WHERE cinema_id = ? AND is_active = 1 ORDER BY name ASC")
            .bind(cinema_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, hall: &Hall) -> Result<Hall, AppError> {
        sqlx::query_as::<_, Hall>(
            "UPDATE halls SET name = ?, capacity = ?, seat_grid = ?, features = ?, updated_at = ? WHERE id = ? RETURNING *"
        )
            .bind(&hall.name).bind(hall.capacity).bind(&hall.seat_grid).bind(&hall.features).bind(Utc::now())
            .bind(&hall.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn deactivate(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE halls SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Hall not found".into()));
        }
        Ok(())
    }
}
