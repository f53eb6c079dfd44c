use std::sync::Arc;

use crate::{
    db::Cache,
    services::{CatalogStore, ListStore},
};

/// Shared, read-only handles used by every handler
#[derive(Clone)]
pub struct AppState {
    pub lists: Arc<dyn ListStore>,
    pub catalog: Arc<dyn CatalogStore>,
    /// Suggestion cache; `None` when Redis is not configured
    pub cache: Option<Cache>,
    pub suggestion_cache_ttl: u64,
    pub scoring_shard_size: usize,
}

impl AppState {
    pub fn new(lists: Arc<dyn ListStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            lists,
            catalog,
            cache: None,
            suggestion_cache_ttl: 3600,
            scoring_shard_size: 2000,
        }
    }

    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some(cache);
        self.suggestion_cache_ttl = ttl;
        self
    }

    pub fn with_scoring_shard_size(mut self, shard_size: usize) -> Self {
        self.scoring_shard_size = shard_size;
        self
    }
}
