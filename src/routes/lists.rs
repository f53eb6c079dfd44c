use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::{AccountId, ApiJson},
    models::{ListFilter, SaveListRequest, SaveListResponse, SavedList, UpdateVisibilityRequest},
    routes::AppState,
    services::lists,
};

/// Returns the caller's lists
pub async fn get_lists(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
    Query(filter): Query<ListFilter>,
) -> AppResult<Json<Vec<SavedList>>> {
    let saved = lists::get_lists(state.lists.as_ref(), account_id, filter).await?;
    Ok(Json(saved))
}

/// Creates or replaces the caller's list for a subcategory
pub async fn save_list(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
    ApiJson(request): ApiJson<SaveListRequest>,
) -> AppResult<Json<SaveListResponse>> {
    let list_id = lists::save_list(state.lists.as_ref(), account_id, request).await?;
    Ok(Json(SaveListResponse {
        success: true,
        list_id,
    }))
}

/// Changes the visibility of one of the caller's lists
pub async fn update_list(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
    Path(list_id): Path<i32>,
    ApiJson(request): ApiJson<UpdateVisibilityRequest>,
) -> AppResult<Json<Value>> {
    lists::update_visibility(state.lists.as_ref(), account_id, list_id, request.visibility_id)
        .await?;
    Ok(Json(json!({ "success": true })))
}

/// Deletes one of the caller's lists
pub async fn delete_list(
    State(state): State<AppState>,
    AccountId(account_id): AccountId,
    Path(list_id): Path<i32>,
) -> AppResult<Json<Value>> {
    lists::delete_list(state.lists.as_ref(), account_id, list_id).await?;
    Ok(Json(json!({ "success": true })))
}
