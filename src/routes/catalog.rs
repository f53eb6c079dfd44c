use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    middleware::AccountId,
    models::{Category, Subcategory, SuggestionQuery},
    routes::AppState,
    services::catalog,
};

pub async fn categories(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
) -> AppResult<Json<Vec<Category>>> {
    let categories = catalog::categories(state.catalog.as_ref(), account_id).await?;
    Ok(Json(categories))
}

pub async fn subcategories(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
    Path(category_id): Path<i32>,
) -> AppResult<Json<Vec<Subcategory>>> {
    let subcategories =
        catalog::subcategories(state.catalog.as_ref(), category_id, account_id).await?;
    Ok(Json(subcategories))
}

/// Item-name autocomplete
pub async fn suggestions(
    State(state): State<AppState>,
    AccountId(_account_id): AccountId,
    Query(query): Query<SuggestionQuery>,
) -> AppResult<Json<Vec<String>>> {
    let names = catalog::suggest_items(
        state.catalog.as_ref(),
        state.cache.as_ref(),
        state.suggestion_cache_ttl,
        query,
    )
    .await?;
    Ok(Json(names))
}
