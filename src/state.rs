use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, BookingRepository, ChatRepository, CinemaRepository,
    HallRepository, MovieRepository, ReviewRepository,
    SessionRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::chatbot::ChatbotService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub cinema_repo: Arc<dyn CinemaRepository>,
    pub hall_repo: Arc<dyn HallRepository>,
    pub movie_repo: Arc<dyn MovieRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub chat_repo: Arc<dyn ChatRepository>,
    pub auth_service: Arc<AuthService>,
    pub booking_service: Arc<BookingService>,
    pub chatbot_service: Arc<ChatbotService>,
}
