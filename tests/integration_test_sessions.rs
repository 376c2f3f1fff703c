mod common;

use axum::http::StatusCode;
use common::{future_date, parse_body, seat_grid, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_session_creation_rejects_hall_overlap() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(3, 3, "STANDARD")).await;
    let date = future_date(7);

    let first = app.post("/api/session", Some(&auth), json!({
        "movie_id": movie_id,
        "hall_id": hall_id,
        "cinema_id": cinema_id,
        "session_date": date,
        "start_time": "18:00",
        "end_time": "20:00",
        "standard_price": 5000,
        "vip_price": 8000,
    })).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // Overlapping slot in the same hall.
    let second = app.post("/api/session", Some(&auth), json!({
        "movie_id": movie_id,
        "hall_id": hall_id,
        "cinema_id": cinema_id,
        "session_date": date,
        "start_time": "19:00",
        "end_time": "21:00",
        "standard_price": 5000,
        "vip_price": 8000,
    })).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // Back-to-back is fine.
    let third = app.post("/api/session", Some(&auth), json!({
        "movie_id": movie_id,
        "hall_id": hall_id,
        "cinema_id": cinema_id,
        "session_date": date,
        "start_time": "20:00",
        "end_time": "22:00",
        "standard_price": 5000,
        "vip_price": 8000,
    })).await;
    assert_eq!(third.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_session_capacity_comes_from_hall_grid() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(4, 6, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(5), "20:00", "22:00", 5000, 8000)
        .await;

    let body = parse_body(app.get(&format!("/api/session/{}", session_id), None).await).await;
    assert_eq!(body["session"]["total_seats"], 24);
    assert_eq!(body["session"]["available_seats"], 24);
    assert_eq!(body["session"]["occupancy_status"], "AVAILABLE");
}

#[tokio::test]
async fn test_occupancy_status_boundaries() {
    let app = TestApp::new().await;
    // One row of ten seats keeps the arithmetic visible: book 7 -> 70%
    // occupied (FillingUp boundary), book 2 more -> 90% (FewSeatsLeft).
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(1, 10, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(5), "20:00", "22:00", 5000, 8000)
        .await;

    let book = |seats: Vec<i32>| {
        let selected: Vec<_> = seats.into_iter().map(|n| json!({ "row": "A", "number": n })).collect();
        json!({
            "session_id": session_id,
            "selected_seats": selected,
            "customer_info": { "name": "Bulk", "email": "bulk@example.com" },
        })
    };

    let res = app.post("/api/booking", None, book((1..=6).collect())).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let session = parse_body(app.get(&format!("/api/session/{}", session_id), None).await).await;
    assert_eq!(session["session"]["occupancy_status"], "AVAILABLE");

    let res = app.post("/api/booking", None, book(vec![7])).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let session = parse_body(app.get(&format!("/api/session/{}", session_id), None).await).await;
    assert_eq!(session["session"]["available_seats"], 3);
    assert_eq!(session["session"]["occupancy_status"], "FILLING_UP");

    let res = app.post("/api/booking", None, book(vec![8, 9])).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let session = parse_body(app.get(&format!("/api/session/{}", session_id), None).await).await;
    assert_eq!(session["session"]["available_seats"], 1);
    assert_eq!(session["session"]["occupancy_status"], "FEW_SEATS_LEFT");
}

#[tokio::test]
async fn test_seats_endpoint_reflects_pending_holds() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(2, 4, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(5), "20:00", "22:00", 5000, 8000)
        .await;

    let res = app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "A", "number": 2 }, { "row": "B", "number": 4 }],
        "customer_info": { "name": "Holder", "email": "holder@example.com" },
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Payment is still pending, yet the seats count as occupied.
    let seats = parse_body(app.get(&format!("/api/session/{}/seats", session_id), None).await).await;
    assert_eq!(seats["occupied_seats"], json!(["A2", "B4"]));
    assert_eq!(seats["prices"]["standard"], 5000);
    assert_eq!(seats["prices"]["vip"], 8000);
    assert_eq!(seats["layout"]["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_payment_releases_the_seat_hold() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(2, 4, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(5), "20:00", "22:00", 5000, 8000)
        .await;

    let created = parse_body(app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "A", "number": 1 }],
        "customer_info": { "name": "Flaky Payer", "email": "flaky@example.com" },
    })).await).await;
    let booking_id = created["booking"]["id"].as_str().unwrap();

    sqlx::query("UPDATE bookings SET payment_status = 'FAILED' WHERE id = ?")
        .bind(booking_id)
        .execute(&app.pool)
        .await
        .unwrap();

    // Failed-payment bookings do not hold seats: the same seat can be
    // booked again without a conflict.
    let seats = parse_body(app.get(&format!("/api/session/{}/seats", session_id), None).await).await;
    assert_eq!(seats["occupied_seats"], json!([]));

    let res = app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "A", "number": 1 }],
        "customer_info": { "name": "Second Chance", "email": "second@example.com" },
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_session_deletion_refused_with_confirmed_bookings() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(2, 4, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(5), "20:00", "22:00", 5000, 8000)
        .await;

    let res = app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "B", "number": 1 }],
        "customer_info": { "name": "Sticky", "email": "sticky@example.com" },
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app.delete(&format!("/api/session/{}", session_id), Some(&auth)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // The session is untouched and still bookable.
    let body = parse_body(app.get(&format!("/api/session/{}", session_id), None).await).await;
    assert_eq!(body["session"]["id"].as_str().unwrap(), session_id);

    // After the booking is cancelled the session can be deactivated.
    let booking_id: String = sqlx::query_scalar("SELECT id FROM bookings WHERE session_id = ?")
        .bind(&session_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    let res = app.put(&format!("/api/booking/{}/cancel", booking_id), Some(&auth), json!({})).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.delete(&format!("/api/session/{}", session_id), Some(&auth)).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.get(&format!("/api/session/{}", session_id), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_management_requires_elevated_role() {
    let app = TestApp::new().await;
    let (_admin, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(2, 2, "STANDARD")).await;

    let (_, plain) = app.register("Plain", "plain@example.com", "password123").await;
    let res = app.post("/api/session", Some(&plain), json!({
        "movie_id": movie_id,
        "hall_id": hall_id,
        "cinema_id": cinema_id,
        "session_date": future_date(3),
        "start_time": "10:00",
        "end_time": "12:00",
        "standard_price": 5000,
        "vip_price": 8000,
    })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Owners of a different cinema are rejected too.
    let (other_id, _) = app.register("Other Owner", "other-owner@example.com", "password123").await;
    app.promote(&other_id, "OWNER").await;
    let (_, other_owner) = app.login("other-owner@example.com", "password123").await;

    let res = app.post("/api/session", Some(&other_owner), json!({
        "movie_id": movie_id,
        "hall_id": hall_id,
        "cinema_id": cinema_id,
        "session_date": future_date(3),
        "start_time": "10:00",
        "end_time": "12:00",
        "standard_price": 5000,
        "vip_price": 8000,
    })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
