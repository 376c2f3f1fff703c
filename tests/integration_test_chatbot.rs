mod common;

use axum::http::StatusCode;
use common::{parse_body, seat_grid, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_chatbot_intents_and_persistence() {
    let app = TestApp::new().await;
    app.seed_catalog(seat_grid(2, 2, "STANDARD")).await;

    let greeting = parse_body(app.post("/api/chatbot/message", None, json!({
        "message": "hello there",
    })).await).await;
    assert_eq!(greeting["intent"], "greeting");
    assert!(!greeting["suggestions"].as_array().unwrap().is_empty());

    let recommend = parse_body(app.post("/api/chatbot/message", None, json!({
        "message": "can you recommend a movie for tonight?",
    })).await).await;
    assert_eq!(recommend["intent"], "movie_recommendation");
    assert!(recommend["response"].as_str().unwrap().contains("Interstellar Run"));

    let fallback = parse_body(app.post("/api/chatbot/message", None, json!({
        "message": "zorp glorp",
    })).await).await;
    assert_eq!(fallback["intent"], "fallback");

    let empty = app.post("/api/chatbot/message", None, json!({ "message": "   " })).await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    // Every exchange is persisted.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_chatbot_history_is_scoped_to_the_user() {
    let app = TestApp::new().await;
    let (user_id, user) = app.register("Chatty", "chatty@example.com", "password123").await;

    let res = app.post("/api/chatbot/message", Some(&user), json!({
        "message": "hi, how do I book a ticket?",
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let history = parse_body(app.get(&format!("/api/chatbot/history/{}", user_id), Some(&user)).await).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["user_id"].as_str().unwrap(), user_id);

    let (_, snoop) = app.register("Snoop", "chat-snoop@example.com", "password123").await;
    let res = app.get(&format!("/api/chatbot/history/{}", user_id), Some(&snoop)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_chatbot_suggestions_are_static() {
    let app = TestApp::new().await;

    let body = parse_body(app.get("/api/chatbot/suggestions", None).await).await;
    assert!(body["suggestions"].as_array().unwrap().len() >= 5);
    assert!(body["popular_questions"].as_array().unwrap().len() >= 5);
}
