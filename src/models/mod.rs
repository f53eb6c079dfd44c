mod catalog;
mod item;
mod list;
mod recommendation;

pub use catalog::{Category, Subcategory, SuggestionQuery};
pub use item::{display_name, ItemName};
pub use list::{
    ListEntry, ListFilter, ListItemInput, NewList, RankedList, SaveListRequest,
    SaveListResponse, SavedList, SavedListItem, UpdateVisibilityRequest, LIST_SIZE,
    VISIBILITY_RANGE,
};
pub use recommendation::{Recommendation, RecommendationRequest};
