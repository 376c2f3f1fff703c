pub mod sqlite_auth_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_chat_repo;
pub mod sqlite_cinema_repo;
pub mod sqlite_hall_repo;
pub mod sqlite_movie_repo;
pub mod sqlite_review_repo;
pub mod sqlite_session_repo;
pub mod sqlite_user_repo;

pub mod postgres_auth_repo;
pub mod postgres_booking_repo;
pub mod postgres_chat_repo;
pub mod postgres_cinema_repo;
pub mod postgres_hall_repo;
pub mod postgres_movie_repo;
pub mod postgres_review_repo;
pub mod postgres_session_repo;
pub mod postgres_user_repo;
