use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ChatMessage {
    pub id: String,
    pub user_id: Option<String>,
    pub message: String,
    pub response: String,
    pub intent: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(user_id: Option<String>, message: String, response: String, intent: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            message,
            response,
            intent,
            created_at: Utc::now(),
        }
    }
}
