use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Session has already started")]
    PastSession,
    #[error("Seats already reserved: {0:?}")]
    SeatConflict(Vec<String>),
    #[error("Booking is already cancelled")]
    AlreadyCancelled,
    #[error("Completed bookings cannot be cancelled")]
    AlreadyCompleted,
    #[error("Cancellation window has closed")]
    TooLateToCancel,
    #[error("Storage conflict")]
    StorageConflict,
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StorageConflict)
    }
}

/// Maps transient backend failures to `StorageConflict` so the transaction
/// coordinator can retry the write. Everything else stays an opaque DB error.
pub fn map_storage_err(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        let code = db_err.code().unwrap_or_default();

        // 40001/40P01 = PostgreSQL serialization failure / deadlock
        // 5/517 = SQLITE_BUSY / SQLITE_BUSY_SNAPSHOT (stale WAL write snapshot)
        if code == "40001" || code == "40P01" || code == "5" || code == "517" {
            return AppError::StorageConflict;
        }
    }
    AppError::Database(e)
}

/// Insert-path variant of [`map_storage_err`]: unique violations are also
/// retryable, because the coordinator re-mints the booking code on retry.
pub fn map_unique_conflict(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        let code = db_err.code().unwrap_or_default();
        if code == "2067" || code == "23505" {
            return AppError::StorageConflict;
        }
    }
    map_storage_err(e)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PastSession => (
                StatusCode::BAD_REQUEST,
                "Bookings cannot be made for sessions that have already started".to_string(),
            ),
            AppError::SeatConflict(seats) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Selected seats are already reserved",
                        "conflicting_seats": seats,
                    }))
                ).into_response();
            }
            AppError::AlreadyCancelled => (StatusCode::BAD_REQUEST, "Booking is already cancelled".to_string()),
            AppError::AlreadyCompleted => (StatusCode::BAD_REQUEST, "Completed bookings cannot be cancelled".to_string()),
            AppError::TooLateToCancel => (
                StatusCode::BAD_REQUEST,
                "Bookings can only be cancelled up to 2 hours before the session starts".to_string(),
            ),
            AppError::StorageConflict => (
                StatusCode::CONFLICT,
                "The system is busy, please try again".to_string(),
            ),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
