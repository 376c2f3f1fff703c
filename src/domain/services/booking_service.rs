use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::domain::models::booking::{Booking, BookingStatus, NewBookingParams, SeatSelection};
use crate::domain::models::user::{User, UserRole};
use crate::domain::ports::{BookingRepository, HallRepository, PaymentLinkProvider, SessionRepository};
use crate::domain::services::{codes, pricing};
use crate::error::AppError;

/// Retries for transient storage conflicts before the failure is surfaced.
const MAX_TX_RETRIES: u32 = 3;
/// Attempts at minting a booking code that is not already taken.
const MAX_CODE_ATTEMPTS: u32 = 10;
/// Cancellation closes this long before the session starts.
const CANCEL_CUTOFF_HOURS: i64 = 2;

pub struct SeatRequest {
    pub row: String,
    pub number: i32,
}

pub struct CreateBookingCommand {
    pub session_id: String,
    pub seats: Vec<SeatRequest>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub discount_code: Option<String>,
    pub payment_method: Option<String>,
    pub acting_user_id: Option<String>,
}

/// The booking ledger. Validates and prices a booking request, then hands the
/// write to the repository as a single atomic unit, retrying transient
/// storage conflicts a bounded number of times.
pub struct BookingService {
    sessions: Arc<dyn SessionRepository>,
    halls: Arc<dyn HallRepository>,
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentLinkProvider>,
}

impl BookingService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        halls: Arc<dyn HallRepository>,
        bookings: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentLinkProvider>,
    ) -> Self {
        Self { sessions, halls, bookings, payments }
    }

    pub async fn create(&self, cmd: CreateBookingCommand) -> Result<(Booking, String), AppError> {
        let session = self.sessions.find_active(&cmd.session_id).await?
            .ok_or(AppError::NotFound("Session not found".into()))?;

        if session.has_started(Utc::now().naive_utc()) {
            return Err(AppError::PastSession);
        }
        if cmd.seats.is_empty() {
            return Err(AppError::Validation("At least one seat must be selected".into()));
        }

        let hall = self.halls.find_by_id(&session.hall_id).await?
            .ok_or(AppError::InternalWithMsg(format!("Session {} references missing hall {}", session.id, session.hall_id)))?;

        // Resolve each request against the hall's typed grid. The grid is
        // authoritative for the seat type; unknown seats fail validation.
        let mut selections = Vec::with_capacity(cmd.seats.len());
        let mut seen = HashSet::new();
        for seat in &cmd.seats {
            let kind = hall.seat_grid.0.find(&seat.row, seat.number)
                .ok_or_else(|| AppError::Validation(format!("Seat {}{} does not exist in this hall", seat.row, seat.number)))?;
            if !seen.insert(format!("{}{}", seat.row, seat.number)) {
                return Err(AppError::Validation(format!("Seat {}{} is selected twice", seat.row, seat.number)));
            }
            selections.push(SeatSelection {
                row: seat.row.clone(),
                number: seat.number,
                kind,
                price: pricing::seat_price(kind, session.standard_price, session.vip_price),
            });
        }

        let total_amount: i64 = selections.iter().map(|s| s.price).sum();
        let price = pricing::quote(total_amount, cmd.discount_code.as_deref());

        let mut attempt = 0;
        loop {
            // Re-minted per attempt: a retry may have lost the code race.
            let booking_code = self.mint_booking_code().await?;
            let qr_code = codes::qr_payload(&booking_code, Utc::now());

            let booking = Booking::new(NewBookingParams {
                session_id: session.id.clone(),
                user_id: cmd.acting_user_id.clone(),
                customer_name: cmd.customer_name.clone(),
                customer_email: cmd.customer_email.clone(),
                customer_phone: cmd.customer_phone.clone(),
                seats: selections.clone(),
                total_amount: price.total_amount,
                discount_amount: price.discount_amount,
                final_amount: price.final_amount,
                discount_code: cmd.discount_code.clone(),
                payment_method: cmd.payment_method.clone(),
                booking_code,
                qr_code,
            });

            match self.bookings.create_held(&booking).await {
                Ok(created) => {
                    info!(booking_id = %created.id, session_id = %created.session_id, "Booking confirmed: {}", created.booking_code);
                    let payment_url = self.payments.payment_url(&created.id, created.final_amount);
                    return Ok((created, payment_url));
                }
                Err(e) if e.is_retryable() && attempt < MAX_TX_RETRIES => {
                    attempt += 1;
                    warn!(session_id = %session.id, attempt, "Booking write hit a storage conflict, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn cancel(&self, booking_id: &str, acting_user: &User, reason: Option<String>) -> Result<(), AppError> {
        let booking = self.bookings.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        let is_owner = booking.user_id.as_deref() == Some(acting_user.id.as_str());
        if !is_owner && acting_user.role != UserRole::Admin {
            return Err(AppError::Forbidden("You are not allowed to cancel this booking".into()));
        }

        match booking.status {
            BookingStatus::Cancelled => return Err(AppError::AlreadyCancelled),
            BookingStatus::Completed => return Err(AppError::AlreadyCompleted),
            BookingStatus::Confirmed => {}
        }

        let session = self.sessions.find_by_id(&booking.session_id).await?
            .ok_or(AppError::InternalWithMsg(format!("Booking {} references missing session {}", booking.id, booking.session_id)))?;

        if Utc::now().naive_utc() > session.starts_at() - Duration::hours(CANCEL_CUTOFF_HOURS) {
            return Err(AppError::TooLateToCancel);
        }

        let mut attempt = 0;
        loop {
            match self.bookings.cancel_held(&booking.id, reason.as_deref()).await {
                Ok(()) => {
                    info!(booking_id = %booking.id, session_id = %booking.session_id, "Booking cancelled");
                    return Ok(());
                }
                Err(e) if e.is_retryable() && attempt < MAX_TX_RETRIES => {
                    attempt += 1;
                    warn!(booking_id = %booking.id, attempt, "Cancellation hit a storage conflict, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn mint_booking_code(&self) -> Result<String, AppError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = codes::booking_code();
            if self.bookings.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
        }
        Err(AppError::InternalWithMsg("Could not mint a unique booking code".into()))
    }
}
