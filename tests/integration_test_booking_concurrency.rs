mod common;

use axum::http::StatusCode;
use common::{future_date, parse_body, seat_grid, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_concurrent_overlapping_bookings_never_double_book() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(5, 5, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(7), "20:00", "22:00", 5000, 8000)
        .await;

    let body = |name: &str| json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "B", "number": 2 }],
        "customer_info": { "name": name, "email": format!("{}@example.com", name) },
    });

    let (first, second) = tokio::join!(
        app.post("/api/booking", None, body("alpha")),
        app.post("/api/booking", None, body("beta")),
    );

    let mut statuses = [first.status(), second.status()];
    statuses.sort();

    // Exactly one winner; the loser sees a seat conflict or a clean
    // busy error after bounded retries, never a second success.
    assert_eq!(statuses[0], StatusCode::CREATED);
    assert!(
        statuses[1] == StatusCode::BAD_REQUEST || statuses[1] == StatusCode::CONFLICT,
        "loser got {}", statuses[1]
    );

    let session = parse_body(app.get(&format!("/api/session/{}", session_id), None).await).await;
    assert_eq!(session["session"]["available_seats"], 24);

    let seats = parse_body(app.get(&format!("/api/session/{}/seats", session_id), None).await).await;
    assert_eq!(seats["occupied_seats"], json!(["B2"]));
}

#[tokio::test]
async fn test_concurrent_disjoint_bookings_all_succeed() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(5, 5, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(7), "20:00", "22:00", 5000, 8000)
        .await;

    let body = |row: &str| json!({
        "session_id": session_id,
        "selected_seats": [{ "row": row, "number": 1 }],
        "customer_info": { "name": "Row Fan", "email": format!("{}@example.com", row) },
    });

    let (a, b, c) = tokio::join!(
        app.post("/api/booking", None, body("A")),
        app.post("/api/booking", None, body("B")),
        app.post("/api/booking", None, body("C")),
    );

    for res in [a, b, c] {
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    // Counter invariant: available + held == total.
    let session = parse_body(app.get(&format!("/api/session/{}", session_id), None).await).await;
    assert_eq!(session["session"]["available_seats"], 22);

    let seats = parse_body(app.get(&format!("/api/session/{}/seats", session_id), None).await).await;
    assert_eq!(seats["occupied_seats"], json!(["A1", "B1", "C1"]));
}

#[tokio::test]
async fn test_booking_codes_are_unique_across_concurrent_creation() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(4, 6, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(7), "20:00", "22:00", 5000, 8000)
        .await;

    let body = |row: &str, number: i32| json!({
        "session_id": session_id,
        "selected_seats": [{ "row": row, "number": number }],
        "customer_info": { "name": "Coder", "email": "codes@example.com" },
    });

    let (a, b, c) = tokio::join!(
        app.post("/api/booking", None, body("A", 1)),
        app.post("/api/booking", None, body("B", 2)),
        app.post("/api/booking", None, body("C", 3)),
    );

    let mut codes = Vec::new();
    for res in [a, b, c] {
        assert_eq!(res.status(), StatusCode::CREATED);
        let code = parse_body(res).await["booking"]["booking_code"].as_str().unwrap().to_string();
        codes.push(code);
    }

    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), 3);
}
