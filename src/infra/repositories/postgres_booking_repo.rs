use crate::domain::{
    models::{
        booking::{Booking, BookingStatus, PaymentStatus, UserBookingStats},
        session::{OccupancyStatus, Session},
    },
    ports::BookingRepository,
    services::inventory,
};
use crate::error::{map_storage_err, map_unique_conflict, AppError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create_held(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(map_storage_err)?;

        // FOR UPDATE serializes same-session writers for the whole
        // check-then-decrement critical section. Other sessions are untouched.
        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE id = $1 AND is_active = TRUE FOR UPDATE"
        )
            .bind(&booking.session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_storage_err)?
            .ok_or(AppError::NotFound("Session not found".into()))?;

        let held: Vec<String> = sqlx::query_scalar(
            "SELECT seats::TEXT FROM bookings WHERE session_id = $1 AND status = 'CONFIRMED' AND payment_status != 'FAILED'"
        )
            .bind(&booking.session_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(map_storage_err)?;

        let occupied = inventory::decode_held_seat_codes(&held)?;
        let conflicts = inventory::conflicting_codes(&booking.seats.0, &occupied);
        if !conflicts.is_empty() {
            return Err(AppError::SeatConflict(conflicts));
        }

        let new_available = session.available_seats - booking.seats.0.len() as i32;
        if new_available < 0 {
            return Err(AppError::SeatConflict(booking.seat_codes()));
        }
        let occupancy = OccupancyStatus::for_counts(new_available, session.total_seats);

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, session_id, user_id, customer_name, customer_email, customer_phone, seats, \
             total_amount, discount_amount, final_amount, discount_code, payment_status, payment_method, transaction_id, \
             booking_code, qr_code, status, cancel_reason, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.session_id).bind(&booking.user_id)
            .bind(&booking.customer_name).bind(&booking.customer_email).bind(&booking.customer_phone)
            .bind(&booking.seats).bind(booking.total_amount).bind(booking.discount_amount).bind(booking.final_amount)
            .bind(&booking.discount_code).bind(booking.payment_status).bind(&booking.payment_method)
            .bind(&booking.transaction_id).bind(&booking.booking_code).bind(&booking.qr_code)
            .bind(booking.status).bind(&booking.cancel_reason).bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_unique_conflict)?;

        sqlx::query(
            "UPDATE sessions SET available_seats = $1, occupancy_status = $2, updated_at = $3 WHERE id = $4"
        )
            .bind(new_available)
            .bind(occupancy)
            .bind(Utc::now())
            .bind(&session.id)
            .execute(&mut *tx)
            .await
            .map_err(map_storage_err)?;

        tx.commit().await.map_err(map_storage_err)?;
        Ok(created)
    }

    async fn cancel_held(&self, booking_id: &str, reason: Option<&str>) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(map_storage_err)?;

        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE id = $1 FOR UPDATE"
        )
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_storage_err)?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        match booking.status {
            BookingStatus::Cancelled => return Err(AppError::AlreadyCancelled),
            BookingStatus::Completed => return Err(AppError::AlreadyCompleted),
            BookingStatus::Confirmed => {}
        }

        // Lock the session row too: keeps the counter update serialized with
        // any in-flight creation on the same session.
        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE id = $1 FOR UPDATE"
        )
            .bind(&booking.session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_storage_err)?
            .ok_or(AppError::InternalWithMsg(format!("Booking {} references missing session", booking_id)))?;

        let new_payment = if booking.payment_status == PaymentStatus::Completed {
            PaymentStatus::Refunded
        } else {
            booking.payment_status
        };

        sqlx::query(
            "UPDATE bookings SET status = 'CANCELLED', payment_status = $1, cancel_reason = $2, updated_at = $3 WHERE id = $4"
        )
            .bind(new_payment)
            .bind(reason)
            .bind(Utc::now())
            .bind(booking_id)
            .execute(&mut *tx)
            .await
            .map_err(map_storage_err)?;

        let restored = session.available_seats + booking.seats.0.len() as i32;
        let new_available = restored.min(session.total_seats);
        let occupancy = OccupancyStatus::for_counts(new_available, session.total_seats);

        sqlx::query(
            "UPDATE sessions SET available_seats = $1, occupancy_status = $2, updated_at = $3 WHERE id = $4"
        )
            .bind(new_available)
            .bind(occupancy)
            .bind(Utc::now())
            .bind(&session.id)
            .execute(&mut *tx)
            .await
            .map_err(map_storage_err)?;

        tx.commit().await.map_err(map_storage_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn held_seat_codes(&self, session_id: &str) -> Result<Vec<String>, AppError> {
        let held: Vec<String> = sqlx::query_scalar(
            "SELECT seats::TEXT FROM bookings WHERE session_id = $1 AND status = 'CONFIRMED' AND payment_status != 'FAILED'"
        )
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let mut codes: Vec<String> = inventory::decode_held_seat_codes(&held)?.into_iter().collect();
        codes.sort();
        Ok(codes)
    }

    async fn list_by_user(&self, user_id: &str, page: i64, limit: i64) -> Result<(Vec<Booking>, i64), AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        )
            .bind(user_id)
            .bind(limit)
            .bind((page - 1) * limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok((bookings, total))
    }

    async fn user_stats(&self, user_id: &str) -> Result<UserBookingStats, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*)::BIGINT AS total, \
                    COALESCE(SUM(CASE WHEN status = 'COMPLETED' THEN 1 ELSE 0 END), 0)::BIGINT AS completed, \
                    COALESCE(SUM(CASE WHEN status = 'CANCELLED' THEN 1 ELSE 0 END), 0)::BIGINT AS cancelled, \
                    COALESCE(SUM(CASE WHEN payment_status = 'COMPLETED' THEN final_amount ELSE 0 END), 0)::BIGINT AS spent \
             FROM bookings WHERE user_id = $1"
        )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let upcoming: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings b JOIN sessions s ON s.id = b.session_id \
             WHERE b.user_id = $1 AND b.status = 'CONFIRMED' AND s.session_date >= $2"
        )
            .bind(user_id)
            .bind(Utc::now().date_naive())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(UserBookingStats {
            total_bookings: row.get::<i64, _>("total"),
            completed_bookings: row.get::<i64, _>("completed"),
            cancelled_bookings: row.get::<i64, _>("cancelled"),
            total_spent: row.get::<i64, _>("spent"),
            upcoming_sessions: upcoming,
        })
    }

    async fn count_active_for_session(&self, session_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE session_id = $1 AND status = 'CONFIRMED'"
        )
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
