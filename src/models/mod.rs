pub mod board;
pub mod chat;
pub mod r#match;
pub mod report;
pub mod sports;
pub mod team;
pub mod user;
