pub mod areas;
pub mod auth;
pub mod config;
pub mod controls;
pub mod library;
pub mod records;
