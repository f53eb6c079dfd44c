use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        ItemName, ListEntry, ListFilter, NewList, SaveListRequest, SavedList, LIST_SIZE,
        VISIBILITY_RANGE,
    },
};

use super::stores::ListStore;

/// Validates a save request into a list ready for storage
///
/// A list must have exactly five items with distinct (case-insensitive)
/// names and ranks 1 through 5 used once each.
pub fn validate_list(request: &SaveListRequest) -> AppResult<NewList> {
    let category_id = positive_id(request.category_id, "Category")?;
    let subcategory_id = positive_id(request.subcategory_id, "Subcategory")?;

    if let Some(visibility_id) = request.visibility_id {
        validate_visibility(visibility_id)?;
    }

    if request.items.len() != LIST_SIZE {
        return Err(AppError::InvalidInput(format!(
            "You must provide exactly {} items",
            LIST_SIZE
        )));
    }

    let mut names = HashSet::with_capacity(LIST_SIZE);
    let mut ranks = HashSet::with_capacity(LIST_SIZE);
    let mut entries = Vec::with_capacity(LIST_SIZE);

    for input in &request.items {
        let item = ItemName::normalize(&input.item_name)
            .ok_or_else(|| AppError::InvalidInput("Item name is required".to_string()))?;

        let rank = u8::try_from(input.rank)
            .ok()
            .filter(|rank| (1..=LIST_SIZE as u8).contains(rank))
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Rank must be between 1 and {}", LIST_SIZE))
            })?;

        if !names.insert(item.clone()) {
            return Err(AppError::InvalidInput(
                "Duplicate items are not allowed".to_string(),
            ));
        }
        if !ranks.insert(rank) {
            return Err(AppError::InvalidInput(format!("Duplicate rank {}", rank)));
        }

        entries.push(ListEntry::new(item, rank));
    }

    entries.sort_by_key(|entry| entry.rank);

    Ok(NewList {
        category_id,
        subcategory_id,
        visibility_id: request.visibility_id,
        entries,
    })
}

fn positive_id(id: Option<i32>, what: &str) -> AppResult<i32> {
    id.filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidInput(format!("{} is required", what)))
}

fn validate_visibility(visibility_id: i16) -> AppResult<i16> {
    if VISIBILITY_RANGE.contains(&visibility_id) {
        Ok(visibility_id)
    } else {
        Err(AppError::InvalidInput("Invalid visibility ID".to_string()))
    }
}

/// Saves (creates or replaces) the account's list for a subcategory
pub async fn save_list(
    store: &dyn ListStore,
    account_id: i32,
    request: SaveListRequest,
) -> AppResult<i32> {
    let list = validate_list(&request)?;
    store.save_list(account_id, &list).await
}

/// Fetches the account's lists, optionally narrowed to one category/subcategory
pub async fn get_lists(
    store: &dyn ListStore,
    account_id: i32,
    filter: ListFilter,
) -> AppResult<Vec<SavedList>> {
    store.lists_for_account(account_id, &filter).await
}

/// Changes visibility on one of the account's lists
pub async fn update_visibility(
    store: &dyn ListStore,
    account_id: i32,
    list_id: i32,
    visibility_id: Option<i16>,
) -> AppResult<()> {
    let visibility_id = visibility_id
        .ok_or_else(|| AppError::InvalidInput("Invalid visibility ID".to_string()))
        .and_then(validate_visibility)?;

    if store.set_visibility(account_id, list_id, visibility_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("List not found or unauthorized".to_string()))
    }
}

/// Deletes one of the account's lists
pub async fn delete_list(store: &dyn ListStore, account_id: i32, list_id: i32) -> AppResult<()> {
    if store.delete_list(account_id, list_id).await? {
        tracing::info!(account_id, list_id, "List deleted");
        Ok(())
    } else {
        Err(AppError::NotFound("List not found or unauthorized".to_string()))
    }
}
