use crate::domain::{models::cinema::Cinema, ports::{CinemaFilter, CinemaRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteCinemaRepo {
    pool: SqlitePool,
}

impl SqliteCinemaRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn filter_clause(filter: &CinemaFilter) -> String {
        let mut clause = String::from(" WHERE is_active = 1");
        if filter.city.is_some() {
            clause.push_str(" AND city = ?");
        }
        if filter.brand.is_some() {
            clause.push_str(" AND brand = ?");
        }
        if filter.search.is_some() {
            clause.push_str(" AND name LIKE ?");
        }
        clause
    }
}

#[async_trait]
impl CinemaRepository for SqliteCinemaRepo {
    async fn create(&self, cinema: &Cinema) -> Result<Cinema, AppError> {
        sqlx::query_as::<_, Cinema>(
            "INSERT INTO cinemas (id, name, brand, address, city, district, phone, email, owner_id, description, \
             facilities, features, rating, review_count, capacity, latitude, longitude, opening_hours, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&cinema.id).bind(&cinema.name).bind(&cinema.brand).bind(&cinema.address)
            .bind(&cinema.city).bind(&cinema.district).bind(&cinema.phone).bind(&cinema.email)
            .bind(&cinema.owner_id).bind(&cinema.description).bind(&cinema.facilities).bind(&cinema.features)
            .bind(cinema.rating).bind(cinema.review_count).bind(cinema.capacity)
            .bind(cinema.latitude).bind(cinema.longitude).bind(&cinema.opening_hours)
            .bind(cinema.is_active).bind(cinema.created_at).bind(cinema.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Cinema>, AppError> {
        sqlx::query_as::<_, Cinema>("SELECT * FROM cinemas WHERE id = ? AND is_active = 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &CinemaFilter) -> Result<(Vec<Cinema>, i64), AppError> {
        let clause = Self::filter_clause(filter);
        let sql = format!("SELECT * FROM cinemas{} ORDER BY name ASC LIMIT ? OFFSET ?", clause);
        let count_sql = format!("SELECT COUNT(*) FROM cinemas{}", clause);

        let mut query = sqlx::query_as::<_, Cinema>(&sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);

        if let Some(ref city) = filter.city {
            query = query.bind(city.clone());
            count_query = count_query.bind(city.clone());
        }
        if let Some(ref brand) = filter.brand {
            query = query.bind(brand.clone());
            count_query = count_query.bind(brand.clone());
        }
        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search);
            query = query.bind(pattern.clone());
            count_query = count_query.bind(pattern);
        }

        let cinemas = query
            .bind(filter.limit)
            .bind((filter.page - 1) * filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let total = count_query.fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok((cinemas, total))
    }

    async fn update(&self, cinema: &Cinema) -> Result<Cinema, AppError> {
        sqlx::query_as::<_, Cinema>(
            "UPDATE cinemas SET name = ?, brand = ?, address = ?, city = ?, district = ?, phone = ?, email = ?, \
             description = ?, facilities = ?, features = ?, latitude = ?, longitude = ?, opening_hours = ?, updated_at = ? \
             WHERE id = ? RETURNING *"
        )
            .bind(&cinema.name).bind(&cinema.brand).bind(&cinema.address).bind(&cinema.city)
            .bind(&cinema.district).bind(&cinema.phone).bind(&cinema.email).bind(&cinema.description)
            .bind(&cinema.facilities).bind(&cinema.features).bind(cinema.latitude).bind(cinema.longitude)
            .bind(&cinema.opening_hours).bind(Utc::now())
            .bind(&cinema.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn deactivate(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE cinemas SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Cinema not found".into()));
        }
        Ok(())
    }
}
