pub mod auth_service;
pub mod lifecycle;
pub mod matching;
pub mod policy;
pub mod seed;
