pub mod auth;
pub mod booking;
pub mod chatbot;
pub mod cinema;
pub mod hall;
pub mod health;
pub mod movie;
pub mod review;
pub mod session;
