use crate::domain::{models::session::Session, ports::{SessionFilter, SessionRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;

pub struct PostgresSessionRepo {
    pool: PgPool,
}

impl PostgresSessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn filter_clause(filter: &SessionFilter, next_idx: &mut usize) -> String {
        let mut clause = String::from(" WHERE is_active = TRUE");
        if filter.movie_id.is_some() {
            clause.push_str(&format!(" AND movie_id = ${}", next_idx));
            *next_idx += 1;
        }
        if filter.cinema_id.is_some() {
            clause.push_str(&format!(" AND cinema_id = ${}", next_idx));
            *next_idx += 1;
        }
        if filter.date.is_some() {
            clause.push_str(&format!(" AND session_date = ${}", next_idx));
            *next_idx += 1;
        }
        clause
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepo {
    async fn create(&self, session: &Session) -> Result<Session, AppError> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, movie_id, hall_id, cinema_id, session_date, start_time, end_time, \
             standard_price, vip_price, total_seats, available_seats, occupancy_status, is_active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING *"
        )
            .bind(&session.id).bind(&session.movie_id).bind(&session.hall_id).bind(&session.cinema_id)
            .bind(session.session_date).bind(session.start_time).bind(session.end_time)
            .bind(session.standard_price).bind(session.vip_price)
            .bind(session.total_seats).bind(session.available_seats).bind(session.occupancy_status)
            .bind(session.is_active).bind(session.created_at).bind(session.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, AppError> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_active(&self, id: &str) -> Result<Option<Session>, AppError> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1 AND is_active = TRUE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &SessionFilter) -> Result<(Vec<Session>, i64), AppError> {
        let mut idx = 1;
        let clause = Self::filter_clause(filter, &mut idx);
        let sql = format!(
            "SELECT * FROM sessions{} ORDER BY session_date ASC, start_time ASC LIMIT ${} OFFSET ${}",
            clause, idx, idx + 1
        );
        let count_sql = format!("SELECT COUNT(*) FROM sessions{}", clause);

        let mut query = sqlx::query_as::<_, Session>(&sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);

        if let Some(ref movie_id) = filter.movie_id {
            query = query.bind(movie_id.clone());
            count_query = count_query.bind(movie_id.clone());
        }
        if let Some(ref cinema_id) = filter.cinema_id {
            query = query.bind(cinema_id.clone());
            count_query = count_query.bind(cinema_id.clone());
        }
        if let Some(date) = filter.date {
            query = query.bind(date);
            count_query = count_query.bind(date);
        }

        let sessions = query
            .bind(filter.limit)
            .bind((filter.page - 1) * filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let total = count_query.fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok((sessions, total))
    }

    async fn update(&self, session: &Session) -> Result<Session, AppError> {
        sqlx::query_as::<_, Session>(
            "UPDATE sessions SET session_date = $1, start_time = $2, end_time = $3, standard_price = $4, vip_price = $5, updated_at = $6 \
             WHERE id = $7 RETURNING *"
        )
            .bind(session.session_date).bind(session.start_time).bind(session.end_time)
            .bind(session.standard_price).bind(session.vip_price).bind(Utc::now())
            .bind(&session.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn deactivate(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE sessions SET is_active = FALSE, updated_at = $1 WHERE id = $2 AND is_active = TRUE")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Session not found".into()));
        }
        Ok(())
    }

    async fn exists_overlap(&self, hall_id: &str, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sessions WHERE hall_id = $1 AND session_date = $2 AND is_active = TRUE \
             AND start_time < $3 AND end_time > $4"
        )
            .bind(hall_id)
            .bind(date)
            .bind(end)
            .bind(start)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(count > 0)
    }
}
