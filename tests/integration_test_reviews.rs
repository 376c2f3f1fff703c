mod common;

use axum::http::StatusCode;
use common::{parse_body, seat_grid, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_review_moderation_flow_updates_cinema_rating() {
    let app = TestApp::new().await;
    let (admin, cinema_id, _, _) = app.seed_catalog(seat_grid(2, 2, "STANDARD")).await;

    let (_, reviewer) = app.register("Critic", "critic@example.com", "password123").await;

    let created = parse_body(app.post("/api/review", Some(&reviewer), json!({
        "cinema_id": cinema_id,
        "rating": 4,
        "comment": "Comfortable seats, long queues.",
    })).await).await;
    let review_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["is_approved"], false);

    // Pending reviews are invisible to the public listing.
    let listing = parse_body(app.get(&format!("/api/review?cinema_id={}", cinema_id), None).await).await;
    assert_eq!(listing["reviews"].as_array().unwrap().len(), 0);

    // Approval publishes it and refreshes the cinema's denormalized rating.
    let res = app.put(&format!("/api/review/{}/approve", review_id), Some(&admin), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);

    let listing = parse_body(app.get(&format!("/api/review?cinema_id={}", cinema_id), None).await).await;
    assert_eq!(listing["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(listing["stats"]["total_reviews"], 1);
    assert_eq!(listing["stats"]["average_rating"], 40);

    let cinema = parse_body(app.get(&format!("/api/cinema/{}", cinema_id), None).await).await;
    assert_eq!(cinema["cinema"]["rating"], 40);
    assert_eq!(cinema["cinema"]["review_count"], 1);
}

#[tokio::test]
async fn test_review_requires_target_and_valid_rating() {
    let app = TestApp::new().await;
    let (_, reviewer) = app.register("Critic", "critic2@example.com", "password123").await;

    let res = app.post("/api/review", Some(&reviewer), json!({
        "rating": 3,
        "comment": "No target",
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/api/review", Some(&reviewer), json!({
        "cinema_id": "does-not-matter",
        "rating": 6,
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/api/review", Some(&reviewer), json!({
        "cinema_id": "no-such-cinema",
        "rating": 3,
    })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_edits_return_to_moderation_and_deletion_is_guarded() {
    let app = TestApp::new().await;
    let (admin, cinema_id, _, _) = app.seed_catalog(seat_grid(2, 2, "STANDARD")).await;
    let (_, reviewer) = app.register("Critic", "critic3@example.com", "password123").await;

    let created = parse_body(app.post("/api/review", Some(&reviewer), json!({
        "cinema_id": cinema_id,
        "rating": 5,
    })).await).await;
    let review_id = created["id"].as_str().unwrap().to_string();

    app.put(&format!("/api/review/{}/approve", review_id), Some(&admin), json!({})).await;

    // Author edit succeeds but resets the approval flag.
    let updated = parse_body(app.put(&format!("/api/review/{}", review_id), Some(&reviewer), json!({
        "rating": 2,
    })).await).await;
    assert_eq!(updated["rating"], 2);
    assert_eq!(updated["is_approved"], false);

    // A stranger cannot edit or delete someone else's review.
    let (_, stranger) = app.register("Stranger", "stranger-review@example.com", "password123").await;
    let res = app.put(&format!("/api/review/{}", review_id), Some(&stranger), json!({ "rating": 1 })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let res = app.delete(&format!("/api/review/{}", review_id), Some(&stranger)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Admins can moderate it away.
    let res = app.delete(&format!("/api/review/{}", review_id), Some(&admin)).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}
