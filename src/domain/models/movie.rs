use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub trailer_url: Option<String>,
    pub genres: Json<Vec<String>>,
    pub duration_min: i32,
    /// Tenths of a star (0..=50).
    pub rating: i32,
    pub release_date: NaiveDate,
    pub director: Option<String>,
    /// `cast` is reserved in SQL, hence the column name.
    #[serde(rename = "cast")]
    pub cast_members: Json<Vec<String>>,
    pub age_rating: Option<String>,
    pub is_popular: bool,
    pub is_new: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewMovieParams {
    pub title: String,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub trailer_url: Option<String>,
    pub genres: Vec<String>,
    pub duration_min: i32,
    pub release_date: NaiveDate,
    pub director: Option<String>,
    pub cast: Vec<String>,
    pub age_rating: Option<String>,
    pub is_popular: bool,
    pub is_new: bool,
}

impl Movie {
    pub fn new(params: NewMovieParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            description: params.description,
            poster: params.poster,
            backdrop: params.backdrop,
            trailer_url: params.trailer_url,
            genres: Json(params.genres),
            duration_min: params.duration_min,
            rating: 0,
            release_date: params.release_date,
            director: params.director,
            cast_members: Json(params.cast),
            age_rating: params.age_rating,
            is_popular: params.is_popular,
            is_new: params.is_new,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
