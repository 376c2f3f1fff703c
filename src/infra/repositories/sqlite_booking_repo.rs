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
use sqlx::{Row, SqlitePool};

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_held(&self, booking: &Booking) -> Result<Booking, AppError> {
        // SQLite serializes writers: if another booking on this session commits
        // between our snapshot and the write below, the write upgrade fails
        // with SQLITE_BUSY and the coordinator re-runs the whole check.
        let mut tx = self.pool.begin().await.map_err(map_storage_err)?;

        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE id = ? AND is_active = 1"
        )
            .bind(&booking.session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_storage_err)?
            .ok_or(AppError::NotFound("Session not found".into()))?;

        let held: Vec<String> = sqlx::query_scalar(
            "SELECT seats FROM bookings WHERE session_id = ? AND status = 'CONFIRMED' AND payment_status != 'FAILED'"
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
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
            "UPDATE sessions SET available_seats = ?, occupancy_status = ?, updated_at = ? WHERE id = ?"
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
            "SELECT * FROM bookings WHERE id = ?"
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

        let new_payment = if booking.payment_status == PaymentStatus::Completed {
            PaymentStatus::Refunded
        } else {
            booking.payment_status
        };

        let updated = sqlx::query(
            "UPDATE bookings SET status = 'CANCELLED', payment_status = ?, cancel_reason = ?, updated_at = ? \
             WHERE id = ? AND status = 'CONFIRMED'"
        )
            .bind(new_payment)
            .bind(reason)
            .bind(Utc::now())
            .bind(booking_id)
            .execute(&mut *tx)
            .await
            .map_err(map_storage_err)?;

        if updated.rows_affected() == 0 {
            // Raced with another cancellation since the read above.
            return Err(AppError::StorageConflict);
        }

        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE id = ?"
        )
            .bind(&booking.session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_storage_err)?
            .ok_or(AppError::InternalWithMsg(format!("Booking {} references missing session", booking_id)))?;

        let restored = session.available_seats + booking.seats.0.len() as i32;
        let new_available = restored.min(session.total_seats);
        let occupancy = OccupancyStatus::for_counts(new_available, session.total_seats);

        sqlx::query(
            "UPDATE sessions SET available_seats = ?, occupancy_status = ?, updated_at = ? WHERE id = ?"
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
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn held_seat_codes(&self, session_id: &str) -> Result<Vec<String>, AppError> {
        let held: Vec<String> = sqlx::query_scalar(
            "SELECT seats FROM bookings WHERE session_id = ? AND status = 'CONFIRMED' AND payment_status != 'FAILED'"
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
            "SELECT * FROM bookings WHERE user_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?"
        )
            .bind(user_id)
            .bind(limit)
            .bind((page - 1) * limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok((bookings, total))
    }

    async fn user_stats(&self, user_id: &str) -> Result<UserBookingStats, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, \
                    COALESCE(SUM(CASE WHEN status = 'COMPLETED' THEN 1 ELSE 0 END), 0) AS completed, \
                    COALESCE(SUM(CASE WHEN status = 'CANCELLED' THEN 1 ELSE 0 END), 0) AS cancelled, \
                    COALESCE(SUM(CASE WHEN payment_status = 'COMPLETED' THEN final_amount ELSE 0 END), 0) AS spent \
             FROM bookings WHERE user_id = ?"
        )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let upcoming: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings b JOIN sessions s ON s.id = b.session_id \
             WHERE b.user_id = ? AND b.status = 'CONFIRMED' AND s.session_date >= ?"
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
            "SELECT COUNT(*) FROM bookings WHERE session_id = ? AND status = 'CONFIRMED'"
        )
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
