mod common;

use axum::http::StatusCode;
use common::{future_date, parse_body, seat_grid, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_booking_happy_path_with_student_discount() {
    let app = TestApp::new().await;
    // 10x10 standard grid -> 100 seats.
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(10, 10, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(7), "20:00", "22:00", 5000, 8000)
        .await;

    let res = app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [
            { "row": "A", "number": 1 },
            { "row": "A", "number": 2 },
        ],
        "customer_info": { "name": "Jamie Doe", "email": "jamie@example.com" },
        "discount_type": "student",
        "payment_method": "card",
    })).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;

    let booking = &body["booking"];
    assert_eq!(booking["total_amount"], 10000);
    assert_eq!(booking["discount_amount"], 2000);
    assert_eq!(booking["final_amount"], 8000);
    assert_eq!(booking["status"], "CONFIRMED");
    assert_eq!(booking["payment_status"], "PENDING");

    let code = booking["booking_code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert!(code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));

    let payment_url = body["payment_url"].as_str().unwrap();
    assert!(payment_url.contains(booking["id"].as_str().unwrap()));
    assert!(payment_url.contains("amount=80.00"));

    // The session counter dropped by two and occupancy stays Available.
    let session = parse_body(app.get(&format!("/api/session/{}", session_id), None).await).await;
    assert_eq!(session["session"]["available_seats"], 98);
    assert_eq!(session["session"]["occupancy_status"], "AVAILABLE");
}

#[tokio::test]
async fn test_vip_seats_use_vip_price() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(2, 5, "VIP")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(3), "18:00", "20:00", 5000, 8000)
        .await;

    let res = app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "B", "number": 3 }],
        "customer_info": { "name": "Vip Fan", "email": "vip@example.com" },
    })).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert_eq!(body["booking"]["total_amount"], 8000);
    assert_eq!(body["booking"]["seats"][0]["price"], 8000);
    assert_eq!(body["booking"]["seats"][0]["kind"], "VIP");
}

#[tokio::test]
async fn test_seat_conflict_lists_exact_codes() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(5, 5, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(5), "20:00", "22:00", 5000, 8000)
        .await;

    let first = app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "C", "number": 3 }, { "row": "C", "number": 4 }],
        "customer_info": { "name": "First", "email": "first@example.com" },
    })).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "C", "number": 4 }, { "row": "C", "number": 5 }],
        "customer_info": { "name": "Second", "email": "second@example.com" },
    })).await;

    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(second).await;
    assert_eq!(body["conflicting_seats"], json!(["C4"]));

    // Only the first booking's seats were deducted.
    let session = parse_body(app.get(&format!("/api/session/{}", session_id), None).await).await;
    assert_eq!(session["session"]["available_seats"], 23);
}

#[tokio::test]
async fn test_booking_rejected_for_past_session() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(3, 3, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(-1), "20:00", "22:00", 5000, 8000)
        .await;

    let res = app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "A", "number": 1 }],
        "customer_info": { "name": "Late", "email": "late@example.com" },
    })).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_rejected_for_unknown_session() {
    let app = TestApp::new().await;

    let res = app.post("/api/booking", None, json!({
        "session_id": "no-such-session",
        "selected_seats": [{ "row": "A", "number": 1 }],
        "customer_info": { "name": "Ghost", "email": "ghost@example.com" },
    })).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_rejected_for_seat_outside_grid_and_duplicates() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(2, 2, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(2), "20:00", "22:00", 5000, 8000)
        .await;

    let outside = app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "Z", "number": 9 }],
        "customer_info": { "name": "Off Grid", "email": "off@example.com" },
    })).await;
    assert_eq!(outside.status(), StatusCode::BAD_REQUEST);

    let duplicate = app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "A", "number": 1 }, { "row": "A", "number": 1 }],
        "customer_info": { "name": "Twice", "email": "twice@example.com" },
    })).await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let empty = app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [],
        "customer_info": { "name": "None", "email": "none@example.com" },
    })).await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_detail_joins_catalog() {
    let app = TestApp::new().await;
    let (auth, cinema_id, hall_id, movie_id) = app.seed_catalog(seat_grid(3, 3, "STANDARD")).await;
    let session_id = app
        .create_session(&auth, &cinema_id, &hall_id, &movie_id, future_date(4), "20:00", "22:00", 5000, 8000)
        .await;

    let created = parse_body(app.post("/api/booking", None, json!({
        "session_id": session_id,
        "selected_seats": [{ "row": "B", "number": 2 }],
        "customer_info": { "name": "Detail", "email": "detail@example.com" },
    })).await).await;
    let booking_id = created["booking"]["id"].as_str().unwrap();

    let res = app.get(&format!("/api/booking/{}", booking_id), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["booking"]["id"], created["booking"]["id"]);
    assert_eq!(body["session"]["id"].as_str().unwrap(), session_id);
    assert_eq!(body["movie"]["id"].as_str().unwrap(), movie_id);
    assert_eq!(body["cinema"]["id"].as_str().unwrap(), cinema_id);
    assert_eq!(body["hall"]["id"].as_str().unwrap(), hall_id);
}
