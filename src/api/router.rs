use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, booking, chatbot, cinema, hall, health, movie, review, session};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))

        // Cinemas
        .route("/api/cinema", get(cinema::list_cinemas).post(cinema::create_cinema))
        .route("/api/cinema/{id}", get(cinema::get_cinema).put(cinema::update_cinema).delete(cinema::delete_cinema))

        // Halls
        .route("/api/hall", post(hall::create_hall))
        .route("/api/hall/{id}", get(hall::get_hall).put(hall::update_hall).delete(hall::delete_hall))

        // Movies
        .route("/api/movie", get(movie::list_movies).post(movie::create_movie))
        .route("/api/movie/popular", get(movie::list_popular))
        .route("/api/movie/new", get(movie::list_new))
        .route("/api/movie/genres", get(movie::list_genres))
        .route("/api/movie/{id}", get(movie::get_movie).put(movie::update_movie).delete(movie::delete_movie))

        // Sessions
        .route("/api/session", get(session::list_sessions).post(session::create_session))
        .route("/api/session/{id}", get(session::get_session).put(session::update_session).delete(session::delete_session))
        .route("/api/session/{id}/seats", get(session::get_session_seats))

        // Bookings
        .route("/api/booking", post(booking::create_booking))
        .route("/api/booking/{id}", get(booking::get_booking))
        .route("/api/booking/user/{user_id}", get(booking::get_user_bookings))
        .route("/api/booking/{id}/cancel", put(booking::cancel_booking))
        .route("/api/booking/{id}/qr", get(booking::get_booking_qr))

        // Reviews
        .route("/api/review", get(review::list_reviews).post(review::create_review))
        .route("/api/review/{id}", put(review::update_review).delete(review::delete_review))
        .route("/api/review/{id}/approve", put(review::approve_review))

        // Chatbot
        .route("/api/chatbot/message", post(chatbot::send_message))
        .route("/api/chatbot/suggestions", get(chatbot::get_suggestions))
        .route("/api/chatbot/history/{user_id}", get(chatbot::get_history))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
