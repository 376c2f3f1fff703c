use crate::domain::models::{
    auth::RefreshTokenRecord,
    booking::{Booking, UserBookingStats},
    chat::ChatMessage,
    cinema::Cinema,
    hall::Hall,
    movie::Movie,
    review::{Review, ReviewStats},
    session::Session,
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct CinemaFilter {
    pub city: Option<String>,
    pub brand: Option<String>,
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Default, Clone)]
pub struct MovieFilter {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Default, Clone)]
pub struct SessionFilter {
    pub movie_id: Option<String>,
    pub cinema_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Default, Clone)]
pub struct ReviewFilter {
    pub cinema_id: Option<String>,
    pub movie_id: Option<String>,
    pub user_id: Option<String>,
    pub min_rating: Option<i32>,
    pub approved_only: bool,
    pub page: i64,
    pub limit: i64,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait CinemaRepository: Send + Sync {
    async fn create(&self, cinema: &Cinema) -> Result<Cinema, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Cinema>, AppError>;
    async fn list(&self, filter: &CinemaFilter) -> Result<(Vec<Cinema>, i64), AppError>;
    async fn update(&self, cinema: &Cinema) -> Result<Cinema, AppError>;
    async fn deactivate(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait HallRepository: Send + Sync {
    async fn create(&self, hall: &Hall) -> Result<Hall, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Hall>, AppError>;
    async fn list_by_cinema(&self, cinema_id: &str) -> Result<Vec<Hall>, AppError>;
    async fn update(&self, hall: &Hall) -> Result<Hall, AppError>;
    async fn deactivate(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn create(&self, movie: &Movie) -> Result<Movie, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Movie>, AppError>;
    async fn list(&self, filter: &MovieFilter) -> Result<(Vec<Movie>, i64), AppError>;
    async fn list_popular(&self, limit: i64) -> Result<Vec<Movie>, AppError>;
    async fn list_new(&self, limit: i64) -> Result<Vec<Movie>, AppError>;
    async fn distinct_genres(&self) -> Result<Vec<String>, AppError>;
    async fn update(&self, movie: &Movie) -> Result<Movie, AppError>;
    async fn deactivate(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<Session, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, AppError>;
    async fn find_active(&self, id: &str) -> Result<Option<Session>, AppError>;
    async fn list(&self, filter: &SessionFilter) -> Result<(Vec<Session>, i64), AppError>;
    async fn update(&self, session: &Session) -> Result<Session, AppError>;
    async fn deactivate(&self, id: &str) -> Result<(), AppError>;
    async fn exists_overlap(&self, hall_id: &str, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Result<bool, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking and decrements the session's seat counter as one
    /// atomic unit, re-running the seat-conflict check against held bookings
    /// inside the transaction. Writers on the same session are serialized at
    /// the storage layer; transient serialization failures surface as
    /// `StorageConflict` for the coordinator to retry.
    async fn create_held(&self, booking: &Booking) -> Result<Booking, AppError>;

    /// Marks the booking cancelled (refunding a completed payment) and
    /// returns its seats to the session counter, bounded by `total_seats`,
    /// in one atomic unit.
    async fn cancel_held(&self, booking_id: &str, reason: Option<&str>) -> Result<(), AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Booking>, AppError>;

    /// Seat codes currently held by Confirmed, non-failed-payment bookings.
    async fn held_seat_codes(&self, session_id: &str) -> Result<Vec<String>, AppError>;

    async fn list_by_user(&self, user_id: &str, page: i64, limit: i64) -> Result<(Vec<Booking>, i64), AppError>;
    async fn user_stats(&self, user_id: &str) -> Result<UserBookingStats, AppError>;
    async fn count_active_for_session(&self, session_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> Result<Review, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Review>, AppError>;
    async fn list(&self, filter: &ReviewFilter) -> Result<(Vec<Review>, i64), AppError>;
    async fn stats(&self, filter: &ReviewFilter) -> Result<ReviewStats, AppError>;
    async fn update(&self, review: &Review) -> Result<Review, AppError>;
    /// Approves the review and refreshes the cinema's denormalized
    /// rating/review_count in the same transaction.
    async fn approve(&self, id: &str) -> Result<Review, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn create(&self, message: &ChatMessage) -> Result<ChatMessage, AppError>;
    async fn history(&self, user_id: &str, limit: i64) -> Result<Vec<ChatMessage>, AppError>;
}

/// Stub stand-in for the external payment gateway.
pub trait PaymentLinkProvider: Send + Sync {
    fn payment_url(&self, booking_id: &str, amount: i64) -> String;
}
