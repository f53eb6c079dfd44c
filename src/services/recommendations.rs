use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::models::{Recommendation, RecommendationRequest};

use super::{
    ranking,
    scoring::{self, UserInput},
    stores::ListStore,
};

/// Error types for the recommendation pipeline
#[derive(Debug, Error)]
pub enum RecommendationError {
    /// Rejected before any storage access or scoring
    #[error("{0}")]
    InvalidInput(String),
    /// Candidate lists could not be loaded; no partial results are produced
    #[error("Candidate lists unavailable: {0}")]
    StorageUnavailable(String),
    /// Internal invariant violation during scoring
    #[error("Recommendation computation failed: {0}")]
    ComputationFault(String),
}

/// Validated recommendation request
#[derive(Debug, Clone)]
pub struct RecommendationQuery {
    pub subcategory_id: i32,
    pub input: UserInput,
}

impl RecommendationQuery {
    /// Checks the subcategory and normalizes the candidate items
    pub fn from_request(request: &RecommendationRequest) -> Result<Self, RecommendationError> {
        let subcategory_id = request
            .subcategory_id
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                RecommendationError::InvalidInput("Subcategory and items are required".to_string())
            })?;

        let input = UserInput::parse(request.items.as_slice())?;

        Ok(Self {
            subcategory_id,
            input,
        })
    }
}

/// Finds items recommended by other accounts' lists in the same subcategory
///
/// Loads every other account's active list for the subcategory, scores the
/// candidate items against the caller's input and returns the ranked top
/// results. An empty result means no peer list overlapped with the input.
pub async fn recommend(
    store: Arc<dyn ListStore>,
    account_id: i32,
    request: RecommendationRequest,
    shard_size: usize,
) -> Result<Vec<Recommendation>, RecommendationError> {
    let start = Instant::now();
    let query = RecommendationQuery::from_request(&request)?;

    tracing::info!(
        account_id,
        subcategory_id = query.subcategory_id,
        input_count = query.input.len(),
        "Starting recommendation"
    );

    let lists = store
        .active_lists(query.subcategory_id, account_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, subcategory_id = query.subcategory_id, "Candidate load failed");
            RecommendationError::StorageUnavailable(e.to_string())
        })?;

    let candidate_lists = lists.len();
    let scores = scoring::score_sharded(lists, Arc::new(query.input), shard_size).await?;
    let scored_items = scores.len();
    let recommendations = ranking::rank(scores);

    tracing::info!(
        candidate_lists,
        scored_items,
        returned = recommendations.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendation completed"
    );

    Ok(recommendations)
}
