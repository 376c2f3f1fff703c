use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateMovieRequest, MovieQuery, UpdateMovieRequest};
use crate::api::dtos::responses::PaginationInfo;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::movie::{Movie, NewMovieParams};
use crate::domain::models::user::UserRole;
use crate::domain::ports::MovieFilter;
use crate::error::AppError;
use std::sync::Arc;
use serde_json::json;
use sqlx::types::Json as Jsonb;
use tracing::info;

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MovieQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = MovieFilter {
        search: query.search,
        genre: query.genre,
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(20).clamp(1, 100),
    };

    let (movies, total) = state.movie_repo.list(&filter).await?;

    Ok(Json(json!({
        "movies": movies,
        "pagination": PaginationInfo::new(filter.page, filter.limit, total),
    })))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let movie = state.movie_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Movie not found".into()))?;

    Ok(Json(movie))
}

pub async fn list_popular(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let movies = state.movie_repo.list_popular(10).await?;
    Ok(Json(movies))
}

pub async fn list_new(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let movies = state.movie_repo.list_new(10).await?;
    Ok(Json(movies))
}

pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let genres = state.movie_repo.distinct_genres().await?;
    Ok(Json(genres))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, AppError> {
    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden("Admin role required".into()));
    }
    if payload.duration_min <= 0 {
        return Err(AppError::Validation("Duration must be positive".into()));
    }

    let movie = Movie::new(NewMovieParams {
        title: payload.title,
        description: payload.description,
        poster: payload.poster,
        backdrop: payload.backdrop,
        trailer_url: payload.trailer_url,
        genres: payload.genres,
        duration_min: payload.duration_min,
        release_date: payload.release_date,
        director: payload.director,
        cast: payload.cast,
        age_rating: payload.age_rating,
        is_popular: payload.is_popular,
        is_new: payload.is_new,
    });

    let created = state.movie_repo.create(&movie).await?;
    info!("Movie created: {} ({})", created.title, created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMovieRequest>,
) -> Result<impl IntoResponse, AppError> {
    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    let mut movie = state.movie_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Movie not found".into()))?;

    if let Some(title) = payload.title { movie.title = title; }
    if let Some(description) = payload.description { movie.description = Some(description); }
    if let Some(poster) = payload.poster { movie.poster = Some(poster); }
    if let Some(backdrop) = payload.backdrop { movie.backdrop = Some(backdrop); }
    if let Some(trailer_url) = payload.trailer_url { movie.trailer_url = Some(trailer_url); }
    if let Some(genres) = payload.genres { movie.genres = Jsonb(genres); }
    if let Some(duration_min) = payload.duration_min { movie.duration_min = duration_min; }
    if let Some(release_date) = payload.release_date { movie.release_date = release_date; }
    if let Some(director) = payload.director { movie.director = Some(director); }
    if let Some(cast) = payload.cast { movie.cast_members = Jsonb(cast); }
    if let Some(age_rating) = payload.age_rating { movie.age_rating = Some(age_rating); }
    if let Some(is_popular) = payload.is_popular { movie.is_popular = is_popular; }
    if let Some(is_new) = payload.is_new { movie.is_new = is_new; }

    let updated = state.movie_repo.update(&movie).await?;
    info!("Movie updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    state.movie_repo.deactivate(&id).await?;
    info!("Movie deactivated: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
