//! Storage abstractions
//!
//! Services reach persistent data only through these traits so the
//! recommendation pipeline can run against Postgres in production and
//! against mocks or in-memory stores in tests.

use crate::{
    error::AppResult,
    models::{Category, ListFilter, NewList, RankedList, SavedList, Subcategory},
};

pub mod postgres;

pub use postgres::PgStore;

/// Access to users' ranked lists
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ListStore: Send + Sync {
    /// Active lists in `subcategory_id` owned by anyone except `exclude_account_id`
    ///
    /// No ordering is guaranteed.
    async fn active_lists(
        &self,
        subcategory_id: i32,
        exclude_account_id: i32,
    ) -> AppResult<Vec<RankedList>>;

    /// The account's own lists, optionally narrowed by category/subcategory
    async fn lists_for_account(
        &self,
        account_id: i32,
        filter: &ListFilter,
    ) -> AppResult<Vec<SavedList>>;

    /// Creates or replaces the account's list for the list's subcategory
    ///
    /// Returns the id of the stored list.
    async fn save_list(&self, account_id: i32, list: &NewList) -> AppResult<i32>;

    /// Sets visibility on a list the account owns; `false` when no such list
    async fn set_visibility(
        &self,
        account_id: i32,
        list_id: i32,
        visibility_id: i16,
    ) -> AppResult<bool>;

    /// Deletes a list the account owns; `false` when no such list
    async fn delete_list(&self, account_id: i32, list_id: i32) -> AppResult<bool>;
}

/// Access to the category taxonomy and the item dictionary
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// All categories with the account's list count for each
    async fn categories(&self, account_id: i32) -> AppResult<Vec<Category>>;

    /// Subcategories of a category, popular first then by name
    async fn subcategories(&self, category_id: i32, account_id: i32)
        -> AppResult<Vec<Subcategory>>;

    /// Normalized item names containing `fragment` that appear in any list of the category
    async fn search_items(
        &self,
        category_id: i32,
        fragment: &str,
        limit: i64,
    ) -> AppResult<Vec<String>>;
}
