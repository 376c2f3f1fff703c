mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{future_date, parse_body, seat_grid, TestApp};
use serde_json::json;

async fn book_seat(app: &TestApp, session_id: &str, auth: Option<&common::AuthHeaders>, row: &str, number: i32) -> String {
    let res = app.post("/api/booking", auth, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": row, "number": number }],
        "customer_info": { "name": "Seat Holder", "email": "holder@example.com" },
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["booking"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_cancel_restores_seats_and_is_terminal() {
    let app = TestApp::new().await;
    let (admin, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(4, 4, "STANDARD")).await;
    let session_id = app
        .create_session(&admin, &cinema_id, &hall_id, &movie_id, future_date(7), "20:00", "22:00", 5000, 8000)
        .await;

    let (_, user) = app.register("Casey", "casey@example.com", "password123").await;
    let booking_id = book_seat(&app, &session_id, Some(&user), "A", 1).await;

    let session = parse_body(app.get(&format!("/api/session/{}", session_id), None).await).await;
    assert_eq!(session["session"]["available_seats"], 15);

    let res = app.put(&format!("/api/booking/{}/cancel", booking_id), Some(&user), json!({
        "reason": "Plans changed",
    })).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // The exact seat is free again.
    let session = parse_body(app.get(&format!("/api/session/{}", session_id), None).await).await;
    assert_eq!(session["session"]["available_seats"], 16);
    let seats = parse_body(app.get(&format!("/api/session/{}/seats", session_id), None).await).await;
    assert_eq!(seats["occupied_seats"], json!([]));

    // Re-cancelling fails cleanly.
    let res = app.put(&format!("/api/booking/{}/cancel", booking_id), Some(&user), json!({})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("already cancelled"));
}

#[tokio::test]
async fn test_cancel_requires_ownership_or_admin() {
    let app = TestApp::new().await;
    let (admin, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(4, 4, "STANDARD")).await;
    let session_id = app
        .create_session(&admin, &cinema_id, &hall_id, &movie_id, future_date(7), "20:00", "22:00", 5000, 8000)
        .await;

    let (_, owner) = app.register("Owner", "owner-cancel@example.com", "password123").await;
    let booking_id = book_seat(&app, &session_id, Some(&owner), "B", 2).await;

    let (_, stranger) = app.register("Stranger", "stranger@example.com", "password123").await;
    let res = app.put(&format!("/api/booking/{}/cancel", booking_id), Some(&stranger), json!({})).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Unauthenticated callers cannot cancel at all.
    let res = app.put(&format!("/api/booking/{}/cancel", booking_id), None, json!({})).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Admins can cancel on behalf of the customer.
    let res = app.put(&format!("/api/booking/{}/cancel", booking_id), Some(&admin), json!({})).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_cancel_window_closes_two_hours_before_start() {
    let app = TestApp::new().await;
    let (admin, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(3, 3, "STANDARD")).await;
    let session_id = app
        .create_session(&admin, &cinema_id, &hall_id, &movie_id, future_date(7), "20:00", "22:00", 5000, 8000)
        .await;

    let (_, user) = app.register("Rushed", "rushed@example.com", "password123").await;
    let booking_id = book_seat(&app, &session_id, Some(&user), "A", 1).await;

    // Move the session to one hour from now: inside the no-cancel window.
    let soon = Utc::now().naive_utc() + Duration::hours(1);
    sqlx::query("UPDATE sessions SET session_date = ?, start_time = ?, end_time = ? WHERE id = ?")
        .bind(soon.date())
        .bind(soon.time())
        .bind(soon.time() + Duration::hours(2))
        .bind(&session_id)
        .execute(&app.pool)
        .await
        .unwrap();

    let res = app.put(&format!("/api/booking/{}/cancel", booking_id), Some(&user), json!({})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("2 hours"));

    // Seats stay held.
    let seats = parse_body(app.get(&format!("/api/session/{}/seats", session_id), None).await).await;
    assert_eq!(seats["occupied_seats"], json!(["A1"]));
}

#[tokio::test]
async fn test_cancel_refunds_completed_payment() {
    let app = TestApp::new().await;
    let (admin, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(3, 3, "STANDARD")).await;
    let session_id = app
        .create_session(&admin, &cinema_id, &hall_id, &movie_id, future_date(7), "20:00", "22:00", 5000, 8000)
        .await;

    let (user_id, user) = app.register("Payer", "payer@example.com", "password123").await;
    let booking_id = book_seat(&app, &session_id, Some(&user), "C", 3).await;

    // Payment confirmation is an external collaborator; flip the row directly.
    sqlx::query("UPDATE bookings SET payment_status = 'COMPLETED' WHERE id = ?")
        .bind(&booking_id)
        .execute(&app.pool)
        .await
        .unwrap();

    let res = app.put(&format!("/api/booking/{}/cancel", booking_id), Some(&user), json!({})).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let bookings = parse_body(app.get(&format!("/api/booking/user/{}?page=1&limit=10", user_id), Some(&user)).await).await;
    let cancelled = &bookings["bookings"][0];
    assert_eq!(cancelled["status"], "CANCELLED");
    assert_eq!(cancelled["payment_status"], "REFUNDED");
}
