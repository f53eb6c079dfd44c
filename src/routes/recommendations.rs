use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult,
    middleware::{AccountId, ApiJson, RequestId},
    models::{Recommendation, RecommendationRequest},
    routes::AppState,
    services::recommendations,
};

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AccountId(account_id): AccountId,
    ApiJson(request): ApiJson<RecommendationRequest>,
) -> AppResult<Json<Vec<Recommendation>>> {
    tracing::info!(
        request_id = %request_id,
        account_id,
        item_count = request.items.len(),
        "Processing recommendation request"
    );

    let recommendations = recommendations::recommend(
        state.lists.clone(),
        account_id,
        request,
        state.scoring_shard_size,
    )
    .await?;

    Ok(Json(recommendations))
}
