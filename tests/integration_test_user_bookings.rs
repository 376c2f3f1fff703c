mod common;

use axum::http::StatusCode;
use common::{future_date, parse_body, seat_grid, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_user_bookings_pagination_and_stats() {
    let app = TestApp::new().await;
    let (admin, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(3, 10, "STANDARD")).await;
    let session_id = app
        .create_session(&admin, &cinema_id, &hall_id, &movie_id, future_date(7), "20:00", "22:00", 5000, 8000)
        .await;

    let (user_id, user) = app.register("Frequent", "frequent@example.com", "password123").await;

    for n in 1..=3 {
        let res = app.post("/api/booking", Some(&user), json!({
            "session_id": session_id,
            "selected_seats": [{ "row": "A", "number": n }],
            "customer_info": { "name": "Frequent", "email": "frequent@example.com" },
        })).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    // One paid, one cancelled.
    let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM bookings WHERE user_id = ? ORDER BY created_at")
        .bind(&user_id)
        .fetch_all(&app.pool)
        .await
        .unwrap();
    sqlx::query("UPDATE bookings SET payment_status = 'COMPLETED' WHERE id = ?")
        .bind(&ids[0])
        .execute(&app.pool)
        .await
        .unwrap();
    let res = app.put(&format!("/api/booking/{}/cancel", ids[1]), Some(&user), json!({})).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let body = parse_body(app.get(&format!("/api/booking/user/{}?page=1&limit=2", user_id), Some(&user)).await).await;

    assert_eq!(body["bookings"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["total_pages"], 2);

    let stats = &body["stats"];
    assert_eq!(stats["total_bookings"], 3);
    assert_eq!(stats["cancelled_bookings"], 1);
    // Only the completed payment counts as spend.
    assert_eq!(stats["total_spent"], 5000);
    // Two confirmed bookings on a future session.
    assert_eq!(stats["upcoming_sessions"], 2);
}

#[tokio::test]
async fn test_user_bookings_hidden_from_other_users() {
    let app = TestApp::new().await;
    let (admin, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(2, 2, "STANDARD")).await;
    let session_id = app
        .create_session(&admin, &cinema_id, &hall_id, &movie_id, future_date(7), "20:00", "22:00", 5000, 8000)
        .await;

    let (user_id, user) = app.register("Private", "private@example.com", "password123").await;
    let res = app.post("/api/booking", Some(&user), json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "A", "number": 1 }],
        "customer_info": { "name": "Private", "email": "private@example.com" },
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let (_, snoop) = app.register("Snoop", "snoop@example.com", "password123").await;
    let res = app.get(&format!("/api/booking/user/{}", user_id), Some(&snoop)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Admins can look.
    let res = app.get(&format!("/api/booking/user/{}", user_id), Some(&admin)).await;
    assert_eq!(res.status(), StatusCode::OK);
}
