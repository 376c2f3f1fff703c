#![allow(dead_code)]

use cinema_backend::{
    api::router::create_router,
    config::Config,
    domain::services::{auth_service::AuthService, booking_service::BookingService, chatbot::ChatbotService},
    infra::payment::stub_payment_link::StubPaymentLink,
    infra::repositories::{
        sqlite_auth_repo::SqliteAuthRepo,
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_chat_repo::SqliteChatRepo,
        sqlite_cinema_repo::SqliteCinemaRepo,
        sqlite_hall_repo::SqliteHallRepo,
        sqlite_movie_repo::SqliteMovieRepo,
        sqlite_review_repo::SqliteReviewRepo,
        sqlite_session_repo::SqliteSessionRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            payment_base_url: "https://payments.test/pay".to_string(),
        };

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        let cinema_repo = Arc::new(SqliteCinemaRepo::new(pool.clone()));
        let hall_repo = Arc::new(SqliteHallRepo::new(pool.clone()));
        let movie_repo = Arc::new(SqliteMovieRepo::new(pool.clone()));
        let session_repo = Arc::new(SqliteSessionRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let chat_repo = Arc::new(SqliteChatRepo::new(pool.clone()));
        let payment_links = Arc::new(StubPaymentLink::new(config.payment_base_url.clone()));

        let booking_service = Arc::new(BookingService::new(
            session_repo.clone(),
            hall_repo.clone(),
            booking_repo.clone(),
            payment_links.clone(),
        ));
        let chatbot_service = Arc::new(ChatbotService::new(
            movie_repo.clone(),
            cinema_repo.clone(),
            session_repo.clone(),
            chat_repo.clone(),
        ));

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            auth_repo,
            cinema_repo,
            hall_repo,
            movie_repo,
            session_repo,
            booking_repo,
            review_repo: Arc::new(SqliteReviewRepo::new(pool.clone())),
            chat_repo,
            auth_service,
            booking_service,
            chatbot_service,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, auth: Option<&AuthHeaders>) -> Response {
        self.send(Method::GET, uri, auth, None).await
    }

    pub async fn post(&self, uri: &str, auth: Option<&AuthHeaders>, body: Value) -> Response {
        self.send(Method::POST, uri, auth, Some(body)).await
    }

    pub async fn put(&self, uri: &str, auth: Option<&AuthHeaders>, body: Value) -> Response {
        self.send(Method::PUT, uri, auth, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, auth: Option<&AuthHeaders>) -> Response {
        self.send(Method::DELETE, uri, auth, None).await
    }

    /// Registers a user and returns (user_id, auth headers).
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (String, AuthHeaders) {
        let response = self.post("/api/auth/register", None, json!({
            "name": name,
            "email": email,
            "password": password,
        })).await;

        if !response.status().is_success() {
            panic!("Registration failed in test helper: status {}", response.status());
        }

        extract_auth(response).await
    }

    pub async fn login(&self, email: &str, password: &str) -> (String, AuthHeaders) {
        let response = self.post("/api/auth/login", None, json!({
            "email": email,
            "password": password,
        })).await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        extract_auth(response).await
    }

    /// Tests cannot mint elevated roles over the API; poke the row directly.
    pub async fn promote(&self, user_id: &str, role: &str) {
        sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .expect("Failed to promote user");
    }

    /// Registers an admin user and a cinema + hall + movie, returning
    /// (admin auth, cinema_id, hall_id, movie_id). The hall uses `grid`.
    pub async fn seed_catalog(&self, grid: Value) -> (AuthHeaders, String, String, String) {
        let email = format!("admin-{}@test.local", Uuid::new_v4());
        let (admin_id, _) = self.register("Admin", &email, "password123").await;
        self.promote(&admin_id, "ADMIN").await;
        // Fresh tokens so the role claim reflects the promotion.
        let (_, auth) = self.login(&email, "password123").await;

        let cinema = parse_body(self.post("/api/cinema", Some(&auth), json!({
            "name": "Grand Plaza",
            "brand": "Grand",
            "address": "1 Main St",
            "city": "Springfield",
            "district": "Center",
        })).await).await;
        let cinema_id = cinema["id"].as_str().expect("cinema id").to_string();

        let hall = parse_body(self.post("/api/hall", Some(&auth), json!({
            "cinema_id": cinema_id,
            "name": "Hall 1",
            "seat_grid": grid,
        })).await).await;
        let hall_id = hall["id"].as_str().expect("hall id").to_string();

        let movie = parse_body(self.post("/api/movie", Some(&auth), json!({
            "title": "Interstellar Run",
            "duration_min": 120,
            "release_date": "2025-01-01",
            "genres": ["Sci-Fi"],
            "is_popular": true,
        })).await).await;
        let movie_id = movie["id"].as_str().expect("movie id").to_string();

        (auth, cinema_id, hall_id, movie_id)
    }

    pub async fn create_session(
        &self,
        auth: &AuthHeaders,
        cinema_id: &str,
        hall_id: &str,
        movie_id: &str,
        date: NaiveDate,
        start: &str,
        end: &str,
        standard_price: i64,
        vip_price: i64,
    ) -> String {
        let session = parse_body(self.post("/api/session", Some(auth), json!({
            "movie_id": movie_id,
            "hall_id": hall_id,
            "cinema_id": cinema_id,
            "session_date": date,
            "start_time": start,
            "end_time": end,
            "standard_price": standard_price,
            "vip_price": vip_price,
        })).await).await;
        session["id"].as_str().expect("session id").to_string()
    }
}

pub async fn extract_auth(response: Response) -> (String, AuthHeaders) {
    let cookies: Vec<String> = response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap().to_string())
        .collect();

    let access_token_cookie = cookies.iter()
        .find(|c| c.contains("access_token="))
        .expect("No access_token cookie returned");

    let start = access_token_cookie.find("access_token=").unwrap() + 13;
    let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
    let access_token = access_token_cookie[start..start + end].to_string();

    let body_json = parse_body(response).await;
    let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();
    let user_id = body_json["user"]["id"].as_str().expect("No user id in body").to_string();

    (user_id, AuthHeaders { access_token, csrf_token })
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Uniform grid of lettered rows, every seat the same kind.
pub fn seat_grid(rows: u8, per_row: i32, kind: &str) -> Value {
    let rows: Vec<Value> = (0..rows)
        .map(|i| json!({
            "row": char::from(b'A' + i).to_string(),
            "seats": (1..=per_row).map(|number| json!({ "number": number, "kind": kind })).collect::<Vec<Value>>(),
        }))
        .collect();
    json!({ "rows": rows })
}

pub fn future_date(days: i64) -> NaiveDate {
    (Utc::now() + Duration::days(days)).date_naive()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
