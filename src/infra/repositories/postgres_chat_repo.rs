use crate::domain::{models::chat::ChatMessage, ports::ChatRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresChatRepo {
    pool: PgPool,
}

impl PostgresChatRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepo {
    async fn create(&self, message: &ChatMessage) -> Result<ChatMessage, AppError> {
        sqlx::query_as::<_, ChatMessage>(
            "INSERT INTO chat_messages (id, user_id, message, response, intent, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *"
        )
            .bind(&message.id).bind(&message.user_id).bind(&message.message)
            .bind(&message.response).bind(&message.intent).bind(message.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn history(&self, user_id: &str, limit: i64) -> Result<Vec<ChatMessage>, AppError> {
        sqlx::query_as::<_, ChatMessage>(
            "SELECT * FROM chat_messages WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
        )
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
