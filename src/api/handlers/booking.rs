use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CancelBookingRequest, CreateBookingRequest, UserBookingsQuery};
use crate::api::dtos::responses::{
    BookingCreatedResponse, BookingDetailResponse, PaginationInfo, QrCodeResponse, UserBookingsResponse,
};
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::domain::models::booking::{BookingStatus, PaymentStatus};
use crate::domain::models::user::UserRole;
use crate::domain::services::booking_service::{CreateBookingCommand, SeatRequest};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Duration;
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cmd = CreateBookingCommand {
        session_id: payload.session_id,
        seats: payload.selected_seats.into_iter()
            .map(|s| SeatRequest { row: s.row, number: s.number })
            .collect(),
        customer_name: payload.customer_info.name,
        customer_email: payload.customer_info.email,
        customer_phone: payload.customer_info.phone,
        discount_code: payload.discount_type,
        payment_method: payload.payment_method,
        acting_user_id: user.map(|u| u.id),
    };

    let (booking, payment_url) = state.booking_service.create(cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingCreatedResponse { booking, payment_url })))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let session = state.session_repo.find_by_id(&booking.session_id).await?
        .ok_or(AppError::InternalWithMsg(format!("Booking {} references missing session", booking.id)))?;

    let movie = state.movie_repo.find_by_id(&session.movie_id).await?;
    let cinema = state.cinema_repo.find_by_id(&session.cinema_id).await?;
    let hall = state.hall_repo.find_by_id(&session.hall_id).await?;

    Ok(Json(BookingDetailResponse { booking, session, movie, cinema, hall }))
}

pub async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(acting): AuthUser,
    Path(user_id): Path<String>,
    Query(query): Query<UserBookingsQuery>,
) -> Result<impl IntoResponse, AppError> {
    if acting.id != user_id && acting.role != UserRole::Admin {
        return Err(AppError::Forbidden("You cannot view these bookings".into()));
    }

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let (bookings, total) = state.booking_repo.list_by_user(&user_id, page, limit).await?;
    let stats = state.booking_repo.user_stats(&user_id).await?;

    Ok(Json(UserBookingsResponse {
        bookings,
        stats,
        pagination: PaginationInfo::new(page, limit, total),
    }))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(acting): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CancelBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.booking_service.cancel(&id, &acting, payload.reason).await?;
    info!("Booking cancelled: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_booking_qr(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.status != BookingStatus::Confirmed || booking.payment_status != PaymentStatus::Completed {
        return Err(AppError::Validation("Booking is not in a valid state for ticket retrieval".into()));
    }

    let session = state.session_repo.find_by_id(&booking.session_id).await?
        .ok_or(AppError::InternalWithMsg(format!("Booking {} references missing session", booking.id)))?;

    Ok(Json(QrCodeResponse {
        qr_code: booking.qr_code,
        booking_code: booking.booking_code,
        // The ticket stops being scannable one hour into the session.
        expires_at: session.starts_at() + Duration::hours(1),
    }))
}
