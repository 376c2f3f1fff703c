use std::collections::BTreeSet;

use crate::domain::{models::movie::Movie, ports::{MovieFilter, MovieRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresMovieRepo {
    pool: PgPool,
}

impl PostgresMovieRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn filter_clause(filter: &MovieFilter, next_idx: &mut usize) -> String {
        let mut clause = String::from(" WHERE is_active = TRUE");
        if filter.search.is_some() {
            clause.push_str(&format!(" AND title ILIKE ${}", next_idx));
            *next_idx += 1;
        }
        if filter.genre.is_some() {
            clause.push_str(&format!(" AND genres ? ${}", next_idx));
            *next_idx += 1;
        }
        clause
    }
}

#[async_trait]
impl MovieRepository for PostgresMovieRepo {
    async fn create(&self, movie: &Movie) -> Result<Movie, AppError> {
        sqlx::query_as::<_, Movie>(
            "INSERT INTO movies (id, title, description, poster, backdrop, trailer_url, genres, duration_min, rating, \
             release_date, director, cast_members, age_rating, is_popular, is_new, is_active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING *"
        )
            .bind(&movie.id).bind(&movie.title).bind(&movie.description).bind(&movie.poster)
            .bind(&movie.backdrop).bind(&movie.trailer_url).bind(&movie.genres).bind(movie.duration_min)
            .bind(movie.rating).bind(movie.release_date).bind(&movie.director).bind(&movie.cast_members)
            .bind(&movie.age_rating).bind(movie.is_popular).bind(movie.is_new).bind(movie.is_active)
            .bind(movie.created_at).bind(movie.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>, AppError> {
        sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1 AND is_active = TRUE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &MovieFilter) -> Result<(Vec<Movie>, i64), AppError> {
        let mut idx = 1;
        let clause = Self::filter_clause(filter, &mut idx);
        let sql = format!("SELECT * FROM movies{} ORDER BY release_date DESC LIMIT ${} OFFSET ${}", clause, idx, idx + 1);
        let count_sql = format!("SELECT COUNT(*) FROM movies{}", clause);

        let mut query = sqlx::query_as::<_, Movie>(&sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);

        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search);
            query = query.bind(pattern.clone());
            count_query = count_query.bind(pattern);
        }
        if let Some(ref genre) = filter.genre {
            query = query.bind(genre.clone());
            count_query = count_query.bind(genre.clone());
        }

        let movies = query
            .bind(filter.limit)
            .bind((filter.page - 1) * filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let total = count_query.fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok((movies, total))
    }

    async fn list_popular(&self, limit: i64) -> Result<Vec<Movie>, AppError> {
        sqlx::query_as::<_, Movie>(
            "SELECT * FROM movies WHERE is_active = TRUE AND is_popular = TRUE ORDER BY rating DESC LIMIT $1"
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_new(&self, limit: i64) -> Result<Vec<Movie>, AppError> {
        sqlx::query_as::<_, Movie>(
            "SELECT * FROM movies WHERE is_active = TRUE AND is_new = TRUE ORDER BY release_date DESC LIMIT $1"
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn distinct_genres(&self) -> Result<Vec<String>, AppError> {
        let columns: Vec<String> = sqlx::query_scalar("SELECT genres::TEXT FROM movies WHERE is_active = TRUE")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let mut genres = BTreeSet::new();
        for raw in columns {
            let parsed: Vec<String> = serde_json::from_str(&raw)
                .map_err(|e| AppError::InternalWithMsg(format!("Corrupt genre data: {}", e)))?;
            genres.extend(parsed);
        }
        Ok(genres.into_iter().collect())
    }

    async fn update(&self, movie: &Movie) -> Result<Movie, AppError> {
        sqlx::query_as::<_, Movie>(
            "UPDATE movies SET title = $1, description = $2, poster = $3, backdrop = $4, trailer_url = $5, genres = $6, \
             duration_min = $7, release_date = $8, director = $9, cast_members = $10, age_rating = $11, is_popular = $12, \
             is_new = $13, updated_at = $14 WHERE id = $15 RETURNING *"
        )
            .bind(&movie.title).bind(&movie.description).bind(&movie.poster).bind(&movie.backdrop)
            .bind(&movie.trailer_url).bind(&movie.genres).bind(movie.duration_min).bind(movie.release_date)
            .bind(&movie.director).bind(&movie.cast_members).bind(&movie.age_rating)
            .bind(movie.is_popular).bind(movie.is_new).bind(Utc::now())
            .bind(&movie.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn deactivate(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE movies SET is_active = FALSE, updated_at = $1 WHERE id = $2 AND is_active = TRUE")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Movie not found".into()));
        }
        Ok(())
    }
}
