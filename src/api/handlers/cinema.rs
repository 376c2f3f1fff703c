use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CinemaQuery, CreateCinemaRequest, UpdateCinemaRequest};
use crate::api::dtos::responses::PaginationInfo;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::cinema::{Cinema, NewCinemaParams};
use crate::domain::models::user::UserRole;
use crate::domain::ports::{CinemaFilter, ReviewFilter};
use crate::error::AppError;
use std::sync::Arc;
use serde_json::json;
use sqlx::types::Json as Jsonb;
use tracing::info;

pub async fn list_cinemas(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CinemaQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = CinemaFilter {
        city: query.city,
        brand: query.brand,
        search: query.search,
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(20).clamp(1, 100),
    };

    let (cinemas, total) = state.cinema_repo.list(&filter).await?;

    Ok(Json(json!({
        "cinemas": cinemas,
        "pagination": PaginationInfo::new(filter.page, filter.limit, total),
    })))
}

pub async fn get_cinema(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cinema = state.cinema_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Cinema not found".into()))?;

    let halls = state.hall_repo.list_by_cinema(&cinema.id).await?;

    let review_filter = ReviewFilter {
        cinema_id: Some(cinema.id.clone()),
        approved_only: true,
        page: 1,
        limit: 20,
        ..Default::default()
    };
    let (reviews, _) = state.review_repo.list(&review_filter).await?;

    Ok(Json(json!({
        "cinema": cinema,
        "halls": halls,
        "reviews": reviews,
    })))
}

pub async fn create_cinema(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateCinemaRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !user.role.is_elevated() {
        return Err(AppError::Forbidden("Owner or admin role required".into()));
    }

    let owner_id = match user.role {
        UserRole::Owner => Some(user.id.clone()),
        _ => None,
    };

    let cinema = Cinema::new(NewCinemaParams {
        name: payload.name,
        brand: payload.brand,
        address: payload.address,
        city: payload.city,
        district: payload.district,
        phone: payload.phone,
        email: payload.email,
        owner_id,
        description: payload.description,
        facilities: payload.facilities,
        features: payload.features,
        latitude: payload.latitude,
        longitude: payload.longitude,
        opening_hours: payload.opening_hours,
    });

    let created = state.cinema_repo.create(&cinema).await?;
    info!("Cinema created: {}", created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_cinema(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCinemaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut cinema = state.cinema_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Cinema not found".into()))?;

    ensure_manages_cinema(&user, &cinema)?;

    if let Some(name) = payload.name { cinema.name = name; }
    if let Some(brand) = payload.brand { cinema.brand = brand; }
    if let Some(address) = payload.address { cinema.address = address; }
    if let Some(city) = payload.city { cinema.city = city; }
    if let Some(district) = payload.district { cinema.district = district; }
    if let Some(phone) = payload.phone { cinema.phone = Some(phone); }
    if let Some(email) = payload.email { cinema.email = Some(email); }
    if let Some(description) = payload.description { cinema.description = Some(description); }
    if let Some(facilities) = payload.facilities { cinema.facilities = Jsonb(facilities); }
    if let Some(features) = payload.features { cinema.features = Jsonb(features); }
    if let Some(latitude) = payload.latitude { cinema.latitude = Some(latitude); }
    if let Some(longitude) = payload.longitude { cinema.longitude = Some(longitude); }
    if let Some(opening_hours) = payload.opening_hours { cinema.opening_hours = Jsonb(opening_hours); }

    let updated = state.cinema_repo.update(&cinema).await?;
    info!("Cinema updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_cinema(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cinema = state.cinema_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Cinema not found".into()))?;

    ensure_manages_cinema(&user, &cinema)?;

    state.cinema_repo.deactivate(&cinema.id).await?;
    info!("Cinema deactivated: {}", cinema.id);
    Ok(StatusCode::NO_CONTENT)
}

fn ensure_manages_cinema(user: &crate::domain::models::user::User, cinema: &Cinema) -> Result<(), AppError> {
    match user.role {
        UserRole::Admin => Ok(()),
        UserRole::Owner if cinema.owner_id.as_deref() == Some(user.id.as_str()) => Ok(()),
        UserRole::Owner => Err(AppError::Forbidden("You do not manage this cinema".into())),
        UserRole::User => Err(AppError::Forbidden("Owner or admin role required".into())),
    }
}
