pub mod auth;
pub mod board;
pub mod chat;
pub mod community;
pub mod leagues;
pub mod matches;
pub mod reports;
pub mod teams;
