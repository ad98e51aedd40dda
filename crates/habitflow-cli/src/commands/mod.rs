pub mod category;
pub mod config;
pub mod habit;
pub mod health;
pub mod mood;
pub mod reminder;
pub mod user;
pub mod water;
