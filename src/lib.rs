//! Top-5 list service: peer-list recommendations plus list and catalog APIs.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Config;
pub use routes::{create_router, AppState};
