use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::ChatRequest;
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::domain::models::user::UserRole;
use crate::error::AppError;
use std::sync::Arc;
use serde_json::json;

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.message.trim().is_empty() {
        return Err(AppError::Validation("Message must not be empty".into()));
    }

    let user_id = user.map(|u| u.id).or(payload.user_id);
    let reply = state.chatbot_service.respond(user_id, &payload.message).await?;

    Ok(Json(reply))
}

pub async fn get_suggestions() -> impl IntoResponse {
    Json(json!({
        "suggestions": [
            { "text": "Recommend a movie", "intent": "movie_recommendation" },
            { "text": "Show nearby cinemas", "intent": "nearby_cinemas" },
            { "text": "Current ticket prices", "intent": "price_info" },
            { "text": "Today's sessions", "intent": "session_times" },
            { "text": "Help me book", "intent": "booking_help" },
        ],
        "popular_questions": [
            "Which movies are showing?",
            "Where is the closest cinema?",
            "How much are tickets?",
            "What sessions run today?",
            "How do I cancel a booking?",
        ],
    }))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    AuthUser(acting): AuthUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if acting.id != user_id && acting.role != UserRole::Admin {
        return Err(AppError::Forbidden("You cannot view this chat history".into()));
    }

    let messages = state.chat_repo.history(&user_id, 50).await?;
    Ok(Json(messages))
}
