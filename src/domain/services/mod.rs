pub mod auth_service;
pub mod booking_service;
pub mod chatbot;
pub mod codes;
pub mod inventory;
pub mod pricing;
