pub mod catalog;
pub mod lists;
pub mod ranking;
pub mod recommendations;
pub mod scoring;
pub mod stores;

pub use recommendations::RecommendationError;
pub use stores::{CatalogStore, ListStore, PgStore};
