use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{display_name, Category, Subcategory, SuggestionQuery},
};

use super::stores::CatalogStore;

/// Queries shorter than this return no suggestions
pub const MIN_SUGGESTION_QUERY_LEN: usize = 3;

/// Maximum number of suggestions per query
pub const MAX_SUGGESTIONS: i64 = 10;

/// Lists all categories with the account's list counts
pub async fn categories(store: &dyn CatalogStore, account_id: i32) -> AppResult<Vec<Category>> {
    store.categories(account_id).await
}

/// Lists a category's subcategories with the account's list counts
pub async fn subcategories(
    store: &dyn CatalogStore,
    category_id: i32,
    account_id: i32,
) -> AppResult<Vec<Subcategory>> {
    if category_id <= 0 {
        return Err(AppError::InvalidInput("Invalid category ID".to_string()));
    }
    store.subcategories(category_id, account_id).await
}

/// Autocompletes item names already used in a category
///
/// Short queries yield an empty list rather than an error. Results are
/// cached per category and normalized query when a cache is configured.
pub async fn suggest_items(
    store: &dyn CatalogStore,
    cache: Option<&Cache>,
    cache_ttl: u64,
    query: SuggestionQuery,
) -> AppResult<Vec<String>> {
    let fragment = query.query.unwrap_or_default().trim().to_lowercase();
    if fragment.chars().count() < MIN_SUGGESTION_QUERY_LEN {
        return Ok(Vec::new());
    }

    let category_id = query
        .category_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidInput("Category ID is required".to_string()))?;

    match cache {
        Some(cache) => {
            let key = CacheKey::Suggestions {
                category_id,
                query: fragment.clone(),
            };
            cached!(cache, key, cache_ttl, fetch_suggestions(store, category_id, &fragment))
        }
        None => fetch_suggestions(store, category_id, &fragment).await,
    }
}

async fn fetch_suggestions(
    store: &dyn CatalogStore,
    category_id: i32,
    fragment: &str,
) -> AppResult<Vec<String>> {
    let names = store
        .search_items(category_id, fragment, MAX_SUGGESTIONS)
        .await?;

    tracing::debug!(category_id, fragment, count = names.len(), "Fetched item suggestions");

    Ok(names.iter().map(|name| display_name(name)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stores::MockCatalogStore;
    use mockall::predicate::eq;

    fn query(q: Option<&str>, category_id: Option<i32>) -> SuggestionQuery {
        SuggestionQuery {
            query: q.map(str::to_string),
            category_id,
        }
    }

    #[tokio::test]
    async fn test_short_query_returns_empty() {
        let mut store = MockCatalogStore::new();
        store.expect_search_items().never();

        let result = suggest_items(&store, None, 60, query(Some("ab"), Some(1))).await.unwrap();
        assert!(result.is_empty());

        let result = suggest_items(&store, None, 60, query(None, None)).await.unwrap();
        assert!(result.is_empty());

        // padding does not count towards the minimum
        let result = suggest_items(&store, None, 60, query(Some("  ab  "), Some(1)))
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_missing_category_rejected() {
        let store = MockCatalogStore::new();
        let err = suggest_items(&store, None, 60, query(Some("alien"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_suggestions_normalized_and_formatted() {
        let mut store = MockCatalogStore::new();
        store
            .expect_search_items()
            .with(eq(3), eq("ali"), eq(MAX_SUGGESTIONS))
            .times(1)
            .returning(|_, _, _| Ok(vec!["alien".to_string(), "aliens vs predator".to_string()]));

        let result = suggest_items(&store, None, 60, query(Some("  ALI "), Some(3)))
            .await
            .unwrap();

        assert_eq!(result, vec!["Alien", "Aliens Vs Predator"]);
    }

    #[tokio::test]
    async fn test_subcategories_rejects_bad_category() {
        let mut store = MockCatalogStore::new();
        store.expect_subcategories().never();
        assert!(subcategories(&store, 0, 1).await.is_err());
    }
}
