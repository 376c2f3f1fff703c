use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateHallRequest, UpdateHallRequest};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::hall::Hall;
use crate::domain::models::user::{User, UserRole};
use crate::error::AppError;
use std::sync::Arc;
use sqlx::types::Json as Jsonb;
use tracing::info;

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

pub async fn get_hall(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let hall = state.hall_repo.find_by_id(&id).await?
        .filter(|h| h.is_active)
        .ok_or(AppError::NotFound("Hall not found".into()))?;

    Ok(Json(hall))
}

pub async fn create_hall(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateHallRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_cinema_access(&state, &user, &payload.cinema_id).await?;

    if payload.seat_grid.seat_count() == 0 {
        return Err(AppError::Validation("Seat grid must contain at least one seat".into()));
    }

    let hall = Hall::new(payload.cinema_id, payload.name, payload.seat_grid, payload.features);
    let created = state.hall_repo.create(&hall).await?;
    info!("Hall created: {} ({} seats)", created.id, created.capacity);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_hall(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateHallRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut hall = state.hall_repo.find_by_id(&id).await?
        .filter(|h| h.is_active)
        .ok_or(AppError::NotFound("Hall not found".into()))?;

    ensure_cinema_access(&state, &user, &hall.cinema_id).await?;

    if let Some(name) = payload.name {
        hall.name = name;
    }
    if let Some(grid) = payload.seat_grid {
        if grid.seat_count() == 0 {
            return Err(AppError::Validation("Seat grid must contain at least one seat".into()));
        }
        hall.capacity = grid.seat_count();
        hall.seat_grid = Jsonb(grid);
    }
    if let Some(features) = payload.features {
        hall.features = Jsonb(features);
    }

    let updated = state.hall_repo.update(&hall).await?;
    info!("Hall updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_hall(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let hall = state.hall_repo.find_by_id(&id).await?
        .filter(|h| h.is_active)
        .ok_or(AppError::NotFound("Hall not found".into()))?;

    ensure_cinema_access(&state, &user, &hall.cinema_id).await?;

    state.hall_repo.deactivate(&hall.id).await?;
    info!("Hall deactivated: {}", hall.id);
    Ok(StatusCode::NO_CONTENT)
}
