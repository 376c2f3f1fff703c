use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Cinema {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub owner_id: Option<String>,
    pub description: Option<String>,
    pub facilities: Json<Vec<String>>,
    pub features: Json<Vec<String>>,
    /// Average of approved reviews, tenths of a star (0..=50).
    pub rating: i32,
    pub review_count: i32,
    pub capacity: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub opening_hours: Json<HashMap<String, String>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewCinemaParams {
    pub name: String,
    pub brand: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub owner_id: Option<String>,
    pub description: Option<String>,
    pub facilities: Vec<String>,
    pub features: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub opening_hours: HashMap<String, String>,
}

impl Cinema {
    pub fn new(params: NewCinemaParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            brand: params.brand,
            address: params.address,
            city: params.city,
            district: params.district,
            phone: params.phone,
            email: params.email,
            owner_id: params.owner_id,
            description: params.description,
            facilities: Json(params.facilities),
            features: Json(params.features),
            rating: 0,
            review_count: 0,
            capacity: 0,
            latitude: params.latitude,
            longitude: params.longitude,
            opening_hours: Json(params.opening_hours),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
