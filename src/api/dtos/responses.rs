use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::models::{
    booking::{Booking, UserBookingStats},
    cinema::Cinema,
    hall::{Hall, SeatGrid},
    movie::Movie,
    session::Session,
};

#[derive(Serialize)]
pub struct PaginationInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: if limit > 0 { (total + limit - 1) / limit } else { 0 },
        }
    }
}

#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub booking: Booking,
    pub payment_url: String,
}

#[derive(Serialize)]
pub struct BookingDetailResponse {
    pub booking: Booking,
    pub session: Session,
    pub movie: Option<Movie>,
    pub cinema: Option<Cinema>,
    pub hall: Option<Hall>,
}

#[derive(Serialize)]
pub struct UserBookingsResponse {
    pub bookings: Vec<Booking>,
    pub stats: UserBookingStats,
    pub pagination: PaginationInfo,
}

#[derive(Serialize)]
pub struct QrCodeResponse {
    pub qr_code: String,
    pub booking_code: String,
    pub expires_at: NaiveDateTime,
}

#[derive(Serialize)]
pub struct SeatPrices {
    pub standard: i64,
    pub vip: i64,
}

#[derive(Serialize)]
pub struct SessionSeatsResponse {
    pub layout: SeatGrid,
    pub occupied_seats: Vec<String>,
    pub prices: SeatPrices,
}
