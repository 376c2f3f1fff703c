use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::chatbot::ChatbotService;
use crate::infra::payment::stub_payment_link::StubPaymentLink;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_booking_repo::PostgresBookingRepo,
    postgres_chat_repo::PostgresChatRepo, postgres_cinema_repo::PostgresCinemaRepo,
    postgres_hall_repo::PostgresHallRepo, postgres_movie_repo::PostgresMovieRepo,
    postgres_review_repo::PostgresReviewRepo, postgres_session_repo::PostgresSessionRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_booking_repo::SqliteBookingRepo,
    sqlite_chat_repo::SqliteChatRepo, sqlite_cinema_repo::SqliteCinemaRepo,
    sqlite_hall_repo::SqliteHallRepo, sqlite_movie_repo::SqliteMovieRepo,
    sqlite_review_repo::SqliteReviewRepo, sqlite_session_repo::SqliteSessionRepo,
    sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let payment_links = Arc::new(StubPaymentLink::new(config.payment_base_url.clone()));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        let cinema_repo = Arc::new(PostgresCinemaRepo::new(pool.clone()));
        let hall_repo = Arc::new(PostgresHallRepo::new(pool.clone()));
        let movie_repo = Arc::new(PostgresMovieRepo::new(pool.clone()));
        let session_repo = Arc::new(PostgresSessionRepo::new(pool.clone()));
        let booking_repo = Arc::new(PostgresBookingRepo::new(pool.clone()));
        let chat_repo = Arc::new(PostgresChatRepo::new(pool.clone()));

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

        AppState {
            config: config.clone(),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            auth_repo,
            cinema_repo,
            hall_repo,
            movie_repo,
            session_repo,
            booking_repo,
            review_repo: Arc::new(PostgresReviewRepo::new(pool.clone())),
            chat_repo,
            auth_service,
            booking_service,
            chatbot_service,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        let cinema_repo = Arc::new(SqliteCinemaRepo::new(pool.clone()));
        let hall_repo = Arc::new(SqliteHallRepo::new(pool.clone()));
        let movie_repo = Arc::new(SqliteMovieRepo::new(pool.clone()));
        let session_repo = Arc::new(SqliteSessionRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let chat_repo = Arc::new(SqliteChatRepo::new(pool.clone()));

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

        AppState {
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
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
