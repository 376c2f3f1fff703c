use crate::domain::{models::cinema::Cinema, ports::{CinemaFilter, CinemaRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresCinemaRepo {
    pool: PgPool,
}

impl PostgresCinemaRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn filter_clause(filter: &CinemaFilter, next_idx: &mut usize) -> String {
        let mut clause = String::from(" WHERE is_active = TRUE");
        if filter.city.is_some() {
            clause.push_str(&format!(" AND city = ${}", next_idx));
            *next_idx += 1;
        }
        if filter.brand.is_some() {
            clause.push_str(&format!(" AND brand = ${}", next_idx));
            *next_idx += 1;
        }
        if filter.search.is_some() {
            clause.push_str(&format!(" AND name ILIKE ${}", next_idx));
            *next_idx += 1;
        }
        clause
    }
}

#[async_trait]
impl CinemaRepository for PostgresCinemaRepo {
    async fn create(&self, cinema: &Cinema) -> Result<Cinema, AppError> {
        sqlx::query_as::<_, Cinema>(
            "INSERT INTO cinemas (id, name, brand, address, city, district, phone, email, owner_id, description, \
             facilities, features, rating, review_count, capacity, latitude, longitude, opening_hours, is_active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
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
        sqlx::query_as::<_, Cinema>("SELECT * FROM cinemas WHERE id = $1 AND is_active = TRUE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &CinemaFilter) -> Result<(Vec<Cinema>, i64), AppError> {
        let mut idx = 1;
        let clause = Self::filter_clause(filter, &mut idx);
        let sql = format!("SELECT * FROM cinemas{} ORDER BY name ASC LIMIT ${} OFFSET ${}", clause, idx, idx + 1);
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
            "UPDATE cinemas SET name = $1, brand = $2, address = $3, city = $4, district = $5, phone = $6, email = $7, \
             description = $8, facilities = $9, features = $10, latitude = $11, longitude = $12, opening_hours = $13, updated_at = $14 \
             WHERE id = $15 RETURNING *"
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
        let result = sqlx::query("UPDATE cinemas SET is_active = FALSE, updated_at = $1 WHERE id = $2 AND is_active = TRUE")
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
