use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

use crate::domain::models::hall::SeatType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// One reserved seat, owned by exactly one booking. The price is snapshotted
/// from the session pricing at booking time and never recomputed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SeatSelection {
    pub row: String,
    pub number: i32,
    pub kind: SeatType,
    pub price: i64,
}

impl SeatSelection {
    pub fn code(&self) -> String {
        format!("{}{}", self.row, self.number)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub session_id: String,
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub seats: Json<Vec<SeatSelection>>,
    /// Amounts in cents.
    pub total_amount: i64,
    pub discount_amount: i64,
    pub final_amount: i64,
    pub discount_code: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub booking_code: String,
    pub qr_code: String,
    pub status: BookingStatus,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub session_id: String,
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub seats: Vec<SeatSelection>,
    pub total_amount: i64,
    pub discount_amount: i64,
    pub final_amount: i64,
    pub discount_code: Option<String>,
    pub payment_method: Option<String>,
    pub booking_code: String,
    pub qr_code: String,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: params.session_id,
            user_id: params.user_id,
            customer_name: params.customer_name,
            customer_email: params.customer_email,
            customer_phone: params.customer_phone,
            seats: Json(params.seats),
            total_amount: params.total_amount,
            discount_amount: params.discount_amount,
            final_amount: params.final_amount,
            discount_code: params.discount_code,
            payment_status: PaymentStatus::Pending,
            payment_method: params.payment_method,
            transaction_id: None,
            booking_code: params.booking_code,
            qr_code: params.qr_code,
            status: BookingStatus::Confirmed,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A booking holds its seats while it is Confirmed and payment has not
    /// failed. Failed-payment bookings release their seats.
    pub fn holds_seats(&self) -> bool {
        self.status == BookingStatus::Confirmed && self.payment_status != PaymentStatus::Failed
    }

    pub fn seat_codes(&self) -> Vec<String> {
        self.seats.0.iter().map(SeatSelection::code).collect()
    }
}

#[derive(Debug, Serialize, Default)]
pub struct UserBookingStats {
    pub total_bookings: i64,
    pub completed_bookings: i64,
    pub cancelled_bookings: i64,
    /// Sum of final amounts over completed payments, in cents.
    pub total_spent: i64,
    pub upcoming_sessions: i64,
}
