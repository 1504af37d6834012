pub mod auth;
pub mod health;
pub mod stories;
pub mod users;
