use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateSessionRequest, SessionQuery, UpdateSessionRequest};
use crate::api::dtos::responses::{PaginationInfo, SeatPrices, SessionSeatsResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::session::{NewSessionParams, Session};
use crate::domain::models::user::{User, UserRole};
use crate::error::AppError;
use std::sync::Arc;
use chrono::NaiveTime;
use serde_json::json;
use tracing::info;

fn parse_time(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))
}

async fn ensure_cinema_access(state: &AppState, user: &User, cinema_id: &str) -> Result<(), AppError> {
    if !user.role.is_elevated() {
        return Err(AppError::Forbidden("Owner or admin role required".into()));
    }
    if user.role == UserRole::Owner {
        let cinema = state.cinema_repo.find_by_id(cinema_id).await?
            .ok_or(AppError::NotFound("Cinema not found".into()))?;
        if cinema.owner_id.as_deref() != Some(user.id.as_str()) {
            return Err(AppError::Forbidden("You do not manage this cinema".into()));
        }
    }
    Ok(())
}

pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = crate::domain::ports::SessionFilter {
        movie_id: query.movie_id,
        cinema_id: query.cinema_id,
        date: query.date,
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(20).clamp(1, 100),
    };

    let (sessions, total) = state.session_repo.list(&filter).await?;

    Ok(Json(json!({
        "sessions": sessions,
        "pagination": PaginationInfo::new(filter.page, filter.limit, total),
    })))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.session_repo.find_active(&id).await?
        .ok_or(AppError::NotFound("Session not found".into()))?;

    let movie = state.movie_repo.find_by_id(&session.movie_id).await?;
    let cinema = state.cinema_repo.find_by_id(&session.cinema_id).await?;
    let hall = state.hall_repo.find_by_id(&session.hall_id).await?;

    Ok(Json(json!({
        "session": session,
        "movie": movie,
        "cinema": cinema,
        "hall": hall,
    })))
}

pub async fn get_session_seats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.session_repo.find_active(&id).await?
        .ok_or(AppError::NotFound("Session not found".into()))?;

    let hall = state.hall_repo.find_by_id(&session.hall_id).await?
        .ok_or(AppError::InternalWithMsg(format!("Session {} references missing hall", session.id)))?;

    let occupied_seats = state.booking_repo.held_seat_codes(&session.id).await?;

    Ok(Json(SessionSeatsResponse {
        layout: hall.seat_grid.0,
        occupied_seats,
        prices: SeatPrices {
            standard: session.standard_price,
            vip: session.vip_price,
        },
    }))
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_cinema_access(&state, &user, &payload.cinema_id).await?;

    let movie = state.movie_repo.find_by_id(&payload.movie_id).await?
        .ok_or(AppError::Validation("Movie not found".into()))?;
    let hall = state.hall_repo.find_by_id(&payload.hall_id).await?
        .filter(|h| h.is_active && h.cinema_id == payload.cinema_id)
        .ok_or(AppError::Validation("Hall not found in this cinema".into()))?;

    let start_time = parse_time(&payload.start_time)?;
    let end_time = parse_time(&payload.end_time)?;
    if end_time <= start_time {
        return Err(AppError::Validation("Session must end after it starts".into()));
    }
    if payload.standard_price <= 0 || payload.vip_price <= 0 {
        return Err(AppError::Validation("Prices must be positive".into()));
    }

    if state.session_repo.exists_overlap(&hall.id, payload.session_date, start_time, end_time).await? {
        return Err(AppError::Conflict("The hall already has a session in this time slot".into()));
    }

    let session = Session::new(NewSessionParams {
        movie_id: movie.id,
        hall_id: hall.id.clone(),
        cinema_id: payload.cinema_id,
        session_date: payload.session_date,
        start_time,
        end_time,
        standard_price: payload.standard_price,
        vip_price: payload.vip_price,
        // Capacity comes from the hall's typed seat grid, not the request.
        total_seats: hall.seat_grid.0.seat_count(),
    });

    let created = state.session_repo.create(&session).await?;
    info!("Session created: {} in hall {}", created.id, hall.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_session(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut session = state.session_repo.find_active(&id).await?
        .ok_or(AppError::NotFound("Session not found".into()))?;

    ensure_cinema_access(&state, &user, &session.cinema_id).await?;

    if let Some(date) = payload.session_date {
        session.session_date = date;
    }
    if let Some(ref start) = payload.start_time {
        session.start_time = parse_time(start)?;
    }
    if let Some(ref end) = payload.end_time {
        session.end_time = parse_time(end)?;
    }
    if session.end_time <= session.start_time {
        return Err(AppError::Validation("Session must end after it starts".into()));
    }
    if let Some(price) = payload.standard_price {
        session.standard_price = price;
    }
    if let Some(price) = payload.vip_price {
        session.vip_price = price;
    }

    let updated = state.session_repo.update(&session).await?;
    info!("Session updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.session_repo.find_active(&id).await?
        .ok_or(AppError::NotFound("Session not found".into()))?;

    ensure_cinema_access(&state, &user, &session.cinema_id).await?;

    // Sessions with live bookings are only ever soft-deactivated via this
    // path, and not even that while seats are held.
    let active = state.booking_repo.count_active_for_session(&session.id).await?;
    if active > 0 {
        return Err(AppError::Conflict("Sessions with confirmed bookings cannot be removed".into()));
    }

    state.session_repo.deactivate(&session.id).await?;
    info!("Session deactivated: {}", session.id);
    Ok(StatusCode::NO_CONTENT)
}
