use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Review {
    pub id: String,
    pub cinema_id: Option<String>,
    pub movie_id: Option<String>,
    pub user_id: Option<String>,
    /// Stars, 1..=5.
    pub rating: i32,
    pub comment: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Default)]
pub struct ReviewStats {
    pub total_reviews: i64,
    /// Average rating in tenths of a star (0..=50).
    pub average_rating: i64,
    /// Counts per star, index 0 = 1 star.
    pub distribution: [i64; 5],
    pub pending_approval: i64,
}

impl Review {
    pub fn new(cinema_id: Option<String>, movie_id: Option<String>, user_id: Option<String>, rating: i32, comment: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            cinema_id,
            movie_id,
            user_id,
            rating,
            comment,
            is_approved: false,
            created_at: now,
            updated_at: now,
        }
    }
}
