use crate::domain::{
    models::review::{Review, ReviewStats},
    ports::{ReviewFilter, ReviewRepository},
};
use crate::error::{map_storage_err, AppError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};

pub struct PostgresReviewRepo {
    pool: PgPool,
}

impl PostgresReviewRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn filter_clause(filter: &ReviewFilter, next_idx: &mut usize) -> String {
        let mut clause = String::from(" WHERE TRUE");
        if filter.cinema_id.is_some() {
            clause.push_str(&format!(" AND cinema_id = ${}", next_idx));
            *next_idx += 1;
        }
        if filter.movie_id.is_some() {
            clause.push_str(&format!(" AND movie_id = ${}", next_idx));
            *next_idx += 1;
        }
        if filter.user_id.is_some() {
            clause.push_str(&format!(" AND user_id = ${}", next_idx));
            *next_idx += 1;
        }
        if filter.min_rating.is_some() {
            clause.push_str(&format!(" AND rating >= ${}", next_idx));
            *next_idx += 1;
        }
        if filter.approved_only {
            clause.push_str(" AND is_approved = TRUE");
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
impl ReviewRepository for PostgresReviewRepo {
    async fn create(&self, review: &Review) -> Result<Review, AppError> {
        sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (id, cinema_id, movie_id, user_id, rating, comment, is_approved, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
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
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &ReviewFilter) -> Result<(Vec<Review>, i64), AppError> {
        let mut idx = 1;
        let clause = Self::filter_clause(filter, &mut idx);
        let sql = format!("SELECT * FROM reviews{} ORDER BY created_at DESC LIMIT ${} OFFSET ${}", clause, idx, idx + 1);
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
        let mut idx = 1;
        let clause = Self::filter_clause(filter, &mut idx);
        let sql = format!(
            "SELECT COUNT(*)::BIGINT AS total, COALESCE(AVG(rating), 0)::FLOAT8 AS average, \
                    COALESCE(SUM(CASE WHEN is_approved = FALSE THEN 1 ELSE 0 END), 0)::BIGINT AS pending \
             FROM reviews{}",
            clause
        );
        let dist_sql = format!(
            "SELECT rating::BIGINT AS rating, COUNT(*)::BIGINT AS count FROM reviews{} GROUP BY rating",
            clause
        );

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
            "UPDATE reviews SET rating = $1, comment = $2, is_approved = $3, updated_at = $4 WHERE id = $5 RETURNING *"
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
            "UPDATE reviews SET is_approved = TRUE, updated_at = $1 WHERE id = $2 RETURNING *"
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
                "SELECT COUNT(*)::BIGINT AS count, COALESCE(AVG(rating), 0)::FLOAT8 AS average \
                 FROM reviews WHERE cinema_id = $1 AND is_approved = TRUE"
            )
                .bind(cinema_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_storage_err)?;

            let count = row.get::<i64, _>("count") as i32;
            let rating_tenths = (row.get::<f64, _>("average") * 10.0).round() as i32;

            sqlx::query("UPDATE cinemas SET rating = $1, review_count = $2, updated_at = $3 WHERE id = $4")
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
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
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
