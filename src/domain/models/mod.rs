pub mod auth;
pub mod client;
pub mod connection;
pub mod org;
pub mod rating;
pub mod user;
