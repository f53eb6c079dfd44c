use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ItemName;

/// Number of slots in every saved list
pub const LIST_SIZE: usize = 5;

/// Lowest and highest valid visibility ids
pub const VISIBILITY_RANGE: std::ops::RangeInclusive<i16> = 1..=3;

/// One `(item, rank)` slot of a peer's list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub item: ItemName,
    /// 1-based position in the owner's list
    pub rank: u8,
}

impl ListEntry {
    pub fn new(item: ItemName, rank: u8) -> Self {
        Self { item, rank }
    }
}

/// An active list owned by another account, as handed to the scoring engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedList {
    pub list_id: i32,
    pub account_id: i32,
    pub entries: Vec<ListEntry>,
}

impl RankedList {
    /// The item the owner ranked first, if the list has one
    pub fn top_item(&self) -> Option<&ItemName> {
        self.entries
            .iter()
            .find(|entry| entry.rank == 1)
            .map(|entry| &entry.item)
    }
}

/// Item slot in a save request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemInput {
    pub item_name: String,
    pub rank: i32,
}

/// Request to create or replace the caller's list for a subcategory
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveListRequest {
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub subcategory_id: Option<i32>,
    #[serde(default)]
    pub visibility_id: Option<i16>,
    #[serde(default)]
    pub items: Vec<ListItemInput>,
}

/// A validated list ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewList {
    pub category_id: i32,
    pub subcategory_id: i32,
    /// `None` keeps the existing visibility (or the default for a new list)
    pub visibility_id: Option<i16>,
    /// Exactly [`LIST_SIZE`] entries ordered by rank
    pub entries: Vec<ListEntry>,
}

/// Request to change a list's visibility
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVisibilityRequest {
    #[serde(default)]
    pub visibility_id: Option<i16>,
}

/// Query filter for fetching the caller's lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilter {
    pub category_id: Option<i32>,
    pub subcategory_id: Option<i32>,
}

/// Item as shown in a saved list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedListItem {
    pub item_name: String,
    pub rank: i16,
}

/// One of the caller's own lists
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedList {
    pub id: i32,
    pub category_id: i32,
    pub category_name: String,
    pub subcategory_id: i32,
    pub subcategory_name: String,
    pub visibility_id: i16,
    pub active: bool,
    pub modified_at: DateTime<Utc>,
    pub items: Vec<SavedListItem>,
}

/// Response body for a successful save
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveListResponse {
    pub success: bool,
    pub list_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> ItemName {
        ItemName::normalize(name).unwrap()
    }

    #[test]
    fn test_top_item_uses_rank_not_position() {
        let list = RankedList {
            list_id: 1,
            account_id: 2,
            entries: vec![ListEntry::new(item("b"), 2), ListEntry::new(item("a"), 1)],
        };
        assert_eq!(list.top_item(), Some(&item("a")));
    }

    #[test]
    fn test_top_item_missing() {
        let list = RankedList {
            list_id: 1,
            account_id: 2,
            entries: vec![ListEntry::new(item("b"), 2)],
        };
        assert_eq!(list.top_item(), None);
    }

    #[test]
    fn test_save_request_deserializes_camel_case() {
        let request: SaveListRequest = serde_json::from_str(
            r#"{"categoryId":1,"subcategoryId":4,"items":[{"itemName":"Heat","rank":1}]}"#,
        )
        .unwrap();
        assert_eq!(request.category_id, Some(1));
        assert_eq!(request.subcategory_id, Some(4));
        assert_eq!(request.visibility_id, None);
        assert_eq!(request.items[0].item_name, "Heat");
    }
}
