use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::models::hall::SeatGrid;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateCinemaRequest {
    pub name: String,
    pub brand: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub opening_hours: HashMap<String, String>,
}

#[derive(Deserialize)]
pub struct UpdateCinemaRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub facilities: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub opening_hours: Option<HashMap<String, String>>,
}

#[derive(Deserialize)]
pub struct CinemaQuery {
    pub city: Option<String>,
    pub brand: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateHallRequest {
    pub cinema_id: String,
    pub name: String,
    pub seat_grid: SeatGrid,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateHallRequest {
    pub name: Option<String>,
    pub seat_grid: Option<SeatGrid>,
    pub features: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub duration_min: i32,
    pub release_date: NaiveDate,
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    pub age_rating: Option<String>,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default)]
    pub is_new: bool,
}

#[derive(Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub trailer_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub duration_min: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub director: Option<String>,
    pub cast: Option<Vec<String>>,
    pub age_rating: Option<String>,
    pub is_popular: Option<bool>,
    pub is_new: Option<bool>,
}

#[derive(Deserialize)]
pub struct MovieQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub movie_id: String,
    pub hall_id: String,
    pub cinema_id: String,
    pub session_date: NaiveDate,
    /// "HH:MM"
    pub start_time: String,
    pub end_time: String,
    /// Cents.
    pub standard_price: i64,
    pub vip_price: i64,
}

#[derive(Deserialize)]
pub struct UpdateSessionRequest {
    pub session_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub standard_price: Option<i64>,
    pub vip_price: Option<i64>,
}

#[derive(Deserialize)]
pub struct SessionQuery {
    pub movie_id: Option<String>,
    pub cinema_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct SelectedSeat {
    pub row: String,
    pub number: i32,
}

#[derive(Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub session_id: String,
    pub selected_seats: Vec<SelectedSeat>,
    pub customer_info: CustomerInfo,
    pub discount_type: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct UserBookingsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub cinema_id: Option<String>,
    pub movie_id: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct ReviewQuery {
    pub cinema_id: Option<String>,
    pub movie_id: Option<String>,
    pub user_id: Option<String>,
    pub min_rating: Option<i32>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: Option<String>,
}
