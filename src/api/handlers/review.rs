use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateReviewRequest, ReviewQuery, UpdateReviewRequest};
use crate::api::dtos::responses::PaginationInfo;
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::domain::models::review::Review;
use crate::domain::models::user::UserRole;
use crate::domain::ports::ReviewFilter;
use crate::error::AppError;
use std::sync::Arc;
use serde_json::json;
use tracing::info;

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::Validation("Rating must be between 1 and 5".into()));
    }
    if payload.cinema_id.is_none() && payload.movie_id.is_none() {
        return Err(AppError::Validation("A review must target a cinema or a movie".into()));
    }

    if let Some(ref cinema_id) = payload.cinema_id {
        state.cinema_repo.find_by_id(cinema_id).await?
            .ok_or(AppError::NotFound("Cinema not found".into()))?;
    }
    if let Some(ref movie_id) = payload.movie_id {
        state.movie_repo.find_by_id(movie_id).await?
            .ok_or(AppError::NotFound("Movie not found".into()))?;
    }

    let review = Review::new(
        payload.cinema_id,
        payload.movie_id,
        Some(user.id),
        payload.rating,
        payload.comment,
    );

    let created = state.review_repo.create(&review).await?;
    info!("Review created: {}", created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Query(query): Query<ReviewQuery>,
) -> Result<impl IntoResponse, AppError> {
    let is_admin = user.is_some_and(|u| u.role == UserRole::Admin);

    let filter = ReviewFilter {
        cinema_id: query.cinema_id,
        movie_id: query.movie_id,
        user_id: query.user_id,
        min_rating: query.min_rating,
        // Unmoderated reviews stay invisible to the public.
        approved_only: !is_admin,
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(20).clamp(1, 100),
    };

    let (reviews, total) = state.review_repo.list(&filter).await?;
    let stats = state.review_repo.stats(&filter).await?;

    Ok(Json(json!({
        "reviews": reviews,
        "stats": stats,
        "pagination": PaginationInfo::new(filter.page, filter.limit, total),
    })))
}

pub async fn update_review(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut review = state.review_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Review not found".into()))?;

    if review.user_id.as_deref() != Some(user.id.as_str()) {
        return Err(AppError::Forbidden("You can only edit your own reviews".into()));
    }

    if let Some(rating) = payload.rating {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation("Rating must be between 1 and 5".into()));
        }
        review.rating = rating;
    }
    if let Some(comment) = payload.comment {
        review.comment = Some(comment);
    }
    // Edits go back through moderation.
    review.is_approved = false;

    let updated = state.review_repo.update(&review).await?;
    Ok(Json(updated))
}

pub async fn approve_review(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    let approved = state.review_repo.approve(&id).await?;
    info!("Review approved: {}", approved.id);
    Ok(Json(approved))
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let review = state.review_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Review not found".into()))?;

    let is_author = review.user_id.as_deref() == Some(user.id.as_str());
    if !is_author && user.role != UserRole::Admin {
        return Err(AppError::Forbidden("You can only delete your own reviews".into()));
    }

    state.review_repo.delete(&review.id).await?;
    info!("Review deleted: {}", review.id);
    Ok(StatusCode::NO_CONTENT)
}
