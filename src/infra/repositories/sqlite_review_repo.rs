use crate::domain::{
    models::review::{Review, ReviewStats},
    ports::{ReviewFilter, ReviewRepository},
};
use crate::error::{map_storage_err, AppError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

pub struct SqliteReviewRepo {
    pool: SqlitePool,
}

impl SqliteReviewRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn filter_clause(filter: &ReviewFilter) -> String {
        let mut clause = String::from(" WHERE 1 = 1");
        if filter.cinema_id.is_some() {
            clause.push_str(" AND cinema_id = ?");
        }
        if filter.movie_id.is_some() {
            clause.push_str(" AND movie_id = ?");
        }
        if filter.user_id.is_some() {
            clause.push_str(" AND user_id = ?");
        }
        if filter.min_rating.is_some() {
            clause.push_str(" AND rating >= ?");
        }
        if filter.approved_only {
            clause.push_str(" AND is_approved = 1");
        }
        clause
    }
}

macro_rules! bind_review_filter {
    ($query:expr, $filter:expr) => {{
        let mut query = $query;
        if let Some(ref cinema_id) = $filter.cinema_id {
            query = query.bind(cinema_id.clone());
        }
        if let Some(ref movie_id) = $filter.movie_id {
            query = query.bind(movie_id.clone());
        }
        if let Some(ref user_id) = $filter.user_id {
            query = query.bind(user_id.clone());
        }
        if let Some(min_rating) = $filter.min_rating {
            query = query.bind(min_rating);
        }
        query
    }};
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepo {
    async fn create(&self, review: &Review) -> Result<Review, AppError> {
        sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (id, cinema_id, movie_id, user_id, rating, comment, is_approved, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&review.id).bind(&review.cinema_id).bind(&review.movie_id).bind(&review.user_id)
            .bind(review.rating).bind(&review.comment).bind(review.is_approved)
            .bind(review.created_at).bind(review.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Review>, AppError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &ReviewFilter) -> Result<(Vec<Review>, i64), AppError> {
        let clause = Self::filter_clause(filter);
        let sql = format!("SELECT * FROM reviews{} ORDER BY created_at DESC LIMIT ? OFFSET ?", clause);
        let count_sql = format!("SELECT COUNT(*) FROM reviews{}", clause);

        let reviews = bind_review_filter!(sqlx::query_as::<_, Review>(&sql), filter)
            .bind(filter.limit)
            .bind((filter.page - 1) * filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let total = bind_review_filter!(sqlx::query_scalar::<_, i64>(&count_sql), filter)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok((reviews, total))
    }

    async fn stats(&self, filter: &ReviewFilter) -> Result<ReviewStats, AppError> {
        let clause = Self::filter_clause(filter);
        let sql = format!(
            "SELECT COUNT(*) AS total, COALESCE(AVG(rating), 0.0) AS average, \
                    COALESCE(SUM(CASE WHEN is_approved = 0 THEN 1 ELSE 0 END), 0) AS pending \
             FROM reviews{}",
            clause
        );
        let dist_sql = format!("SELECT rating, COUNT(*) AS count FROM reviews{} GROUP BY rating", clause);

        let row = bind_review_filter!(sqlx::query(&sql), filter)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let mut stats = ReviewStats {
            total_reviews: row.get::<i64, _>("total"),
            average_rating: (row.get::<f64, _>("average") * 10.0).round() as i64,
            distribution: [0; 5],
            pending_approval: row.get::<i64, _>("pending"),
        };

        let dist_rows = bind_review_filter!(sqlx::query(&dist_sql), filter)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        for row in dist_rows {
            let rating = row.get::<i64, _>("rating");
            if (1..=5).contains(&rating) {
                stats.distribution[(rating - 1) as usize] = row.get::<i64, _>("count");
            }
        }

        Ok(stats)
    }

    async fn update(&self, review: &Review) -> Result<Review, AppError> {
        sqlx::query_as::<_, Review>(
            "UPDATE reviews SET rating = ?, comment = ?, is_approved = ?, updated_at = ? WHERE id = ? RETURNING *"
        )
            .bind(review.rating).bind(&review.comment).bind(review.is_approved).bind(Utc::now())
            .bind(&review.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn approve(&self, id: &str) -> Result<Review, AppError> {
        let mut tx = self.pool.begin().await.map_err(map_storage_err)?;

        let review = sqlx::query_as::<_, Review>(
            "UPDATE reviews SET is_approved = 1, updated_at = ? WHERE id = ? RETURNING *"
        )
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_storage_err)?
            .ok_or(AppError::NotFound("Review not found".into()))?;

        // Keep the cinema's denormalized rating in step with its approved reviews.
        if let Some(ref cinema_id) = review.cinema_id {
            let row = sqlx::query(
                "SELECT COUNT(*) AS count, COALESCE(AVG(rating), 0.0) AS average \
                 FROM reviews WHERE cinema_id = ? AND is_approved = 1"
            )
                .bind(cinema_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_storage_err)?;

            let count = row.get::<i64, _>("count") as i32;
            let rating_tenths = (row.get::<f64, _>("average") * 10.0).round() as i32;

            sqlx::query("UPDATE cinemas SET rating = ?, review_count = ?, updated_at = ? WHERE id = ?")
                .bind(rating_tenths)
                .bind(count)
                .bind(Utc::now())
                .bind(cinema_id)
                .execute(&mut *tx)
                .await
                .map_err(map_storage_err)?;
        }

        tx.commit().await.map_err(map_storage_err)?;
        Ok(review)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Review not found".into()));
        }
        Ok(())
    }
}
