pub mod auth;
pub mod booking;
pub mod chat;
pub mod cinema;
pub mod hall;
pub mod movie;
pub mod review;
pub mod session;
pub mod user;
