use serde::{Deserialize, Serialize};

/// Top-level category with the caller's list count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub category_name: String,
    pub list_count: i64,
}

/// Leaf taxonomy node with the caller's list count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: i32,
    pub category_id: i32,
    pub subcategory_name: String,
    pub popular: bool,
    pub list_count: i64,
}

/// Query parameters for item autocomplete
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub category_id: Option<i32>,
}
