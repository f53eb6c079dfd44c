use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::{
    error::AppResult,
    models::{
        display_name, Category, ItemName, ListEntry, ListFilter, NewList, RankedList, SavedList,
        SavedListItem, Subcategory, LIST_SIZE,
    },
};

use super::{CatalogStore, ListStore};

/// Visibility assigned to newly created lists
const DEFAULT_VISIBILITY: i16 = 1;

/// Postgres-backed implementation of the storage traits
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// One list slot as returned by the candidate query
#[derive(Debug, Clone, sqlx::FromRow)]
struct CandidateRow {
    list_id: i32,
    account_id: i32,
    list_rank: i16,
    item_name: String,
}

/// One list slot (or an empty list) of the account's own lists
#[derive(Debug, Clone, sqlx::FromRow)]
struct SavedListRow {
    id: i32,
    category_id: i32,
    category_name: String,
    subcategory_id: i32,
    subcategory_name: String,
    visibility_id: i16,
    state: bool,
    mod_date: DateTime<Utc>,
    list_rank: Option<i16>,
    item_name: Option<String>,
}

/// Groups candidate rows into lists, dropping slots that cannot be scored
fn group_candidate_rows(rows: Vec<CandidateRow>) -> Vec<RankedList> {
    let mut lists: BTreeMap<i32, RankedList> = BTreeMap::new();

    for row in rows {
        let list = lists.entry(row.list_id).or_insert_with(|| RankedList {
            list_id: row.list_id,
            account_id: row.account_id,
            entries: Vec::with_capacity(LIST_SIZE),
        });

        let rank = match u8::try_from(row.list_rank) {
            Ok(rank) if (1..=LIST_SIZE as u8).contains(&rank) => rank,
            _ => {
                tracing::warn!(
                    list_id = row.list_id,
                    list_rank = row.list_rank,
                    "Skipping list entry with out-of-range rank"
                );
                continue;
            }
        };

        match ItemName::normalize(&row.item_name) {
            Some(item) => list.entries.push(ListEntry::new(item, rank)),
            None => {
                tracing::warn!(list_id = row.list_id, "Skipping list entry with blank item name");
            }
        }
    }

    lists.into_values().collect()
}

/// Groups rows of the account's own lists, preserving query order
fn group_saved_rows(rows: Vec<SavedListRow>) -> Vec<SavedList> {
    let mut lists: Vec<SavedList> = Vec::new();

    for row in rows {
        let is_new = lists.last().map(|last| last.id != row.id).unwrap_or(true);
        if is_new {
            lists.push(SavedList {
                id: row.id,
                category_id: row.category_id,
                category_name: row.category_name,
                subcategory_id: row.subcategory_id,
                subcategory_name: row.subcategory_name,
                visibility_id: row.visibility_id,
                active: row.state,
                modified_at: row.mod_date,
                items: Vec::with_capacity(LIST_SIZE),
            });
        }

        if let (Some(rank), Some(name), Some(list)) = (row.list_rank, row.item_name, lists.last_mut()) {
            list.items.push(SavedListItem {
                item_name: display_name(&name),
                rank,
            });
        }
    }

    lists
}

/// Escapes LIKE wildcards so user input only matches literally
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait::async_trait]
impl ListStore for PgStore {
    #[instrument(skip(self))]
    async fn active_lists(
        &self,
        subcategory_id: i32,
        exclude_account_id: i32,
    ) -> AppResult<Vec<RankedList>> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT lm.id AS list_id, lm.account_id, l.list_rank, i.item_name
            FROM lists_meta lm
            INNER JOIN lists l ON l.list_id = lm.id
            INNER JOIN items i ON i.id = l.item_id
            WHERE lm.subcategory_id = $1
              AND lm.account_id <> $2
              AND lm.state = true
            ORDER BY lm.id, l.list_rank
            "#,
        )
        .bind(subcategory_id)
        .bind(exclude_account_id)
        .fetch_all(&self.pool)
        .await?;

        let row_count = rows.len();
        let lists = group_candidate_rows(rows);

        tracing::debug!(row_count, list_count = lists.len(), "Loaded candidate lists");

        Ok(lists)
    }

    #[instrument(skip(self))]
    async fn lists_for_account(
        &self,
        account_id: i32,
        filter: &ListFilter,
    ) -> AppResult<Vec<SavedList>> {
        let rows = sqlx::query_as::<_, SavedListRow>(
            r#"
            SELECT lm.id, lm.category_id, c.category_name, lm.subcategory_id,
                   s.subcategory_name, lm.visibility_id, lm.state, lm.mod_date,
                   l.list_rank, i.item_name
            FROM lists_meta lm
            INNER JOIN categories c ON c.id = lm.category_id
            INNER JOIN subcategories s ON s.id = lm.subcategory_id
            LEFT JOIN lists l ON l.list_id = lm.id
            LEFT JOIN items i ON i.id = l.item_id
            WHERE lm.account_id = $1
              AND ($2::int IS NULL OR lm.category_id = $2)
              AND ($3::int IS NULL OR lm.subcategory_id = $3)
            ORDER BY c.category_name, s.subcategory_name, lm.id, l.list_rank
            "#,
        )
        .bind(account_id)
        .bind(filter.category_id)
        .bind(filter.subcategory_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_saved_rows(rows))
    }

    #[instrument(skip(self, list), fields(subcategory_id = list.subcategory_id))]
    async fn save_list(&self, account_id: i32, list: &NewList) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i32, i16)> = sqlx::query_as(
            r#"
            SELECT id, visibility_id
            FROM lists_meta
            WHERE account_id = $1 AND category_id = $2 AND subcategory_id = $3
            FOR UPDATE
            "#,
        )
        .bind(account_id)
        .bind(list.category_id)
        .bind(list.subcategory_id)
        .fetch_optional(&mut *tx)
        .await?;

        let list_id = match existing {
            Some((list_id, current_visibility)) => {
                sqlx::query(
                    r#"
                    UPDATE lists_meta
                    SET visibility_id = $1, state = true, mod_date = NOW()
                    WHERE id = $2
                    "#,
                )
                .bind(list.visibility_id.unwrap_or(current_visibility))
                .bind(list_id)
                .execute(&mut *tx)
                .await?;

                sqlx::query("DELETE FROM lists WHERE list_id = $1")
                    .bind(list_id)
                    .execute(&mut *tx)
                    .await?;

                list_id
            }
            None => {
                let (list_id,): (i32,) = sqlx::query_as(
                    r#"
                    INSERT INTO lists_meta
                        (account_id, category_id, subcategory_id, visibility_id, state, mod_date)
                    VALUES ($1, $2, $3, $4, true, NOW())
                    RETURNING id
                    "#,
                )
                .bind(account_id)
                .bind(list.category_id)
                .bind(list.subcategory_id)
                .bind(list.visibility_id.unwrap_or(DEFAULT_VISIBILITY))
                .fetch_one(&mut *tx)
                .await?;

                list_id
            }
        };

        for entry in &list.entries {
            let (item_id,): (i32,) = sqlx::query_as(
                r#"
                INSERT INTO items (item_name)
                VALUES ($1)
                ON CONFLICT (item_name) DO UPDATE SET item_name = EXCLUDED.item_name
                RETURNING id
                "#,
            )
            .bind(entry.item.as_str())
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO lists (list_id, item_id, list_rank) VALUES ($1, $2, $3)")
                .bind(list_id)
                .bind(item_id)
                .bind(i16::from(entry.rank))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(list_id, account_id, "List saved");

        Ok(list_id)
    }

    async fn set_visibility(
        &self,
        account_id: i32,
        list_id: i32,
        visibility_id: i16,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE lists_meta SET visibility_id = $1 WHERE id = $2 AND account_id = $3",
        )
        .bind(visibility_id)
        .bind(list_id)
        .bind(account_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_list(&self, account_id: i32, list_id: i32) -> AppResult<bool> {
        // list entries cascade
        let result = sqlx::query("DELETE FROM lists_meta WHERE id = $1 AND account_id = $2")
            .bind(list_id)
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgStore {
    async fn categories(&self, account_id: i32) -> AppResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.category_name, COUNT(lm.id) AS list_count
            FROM categories c
            LEFT JOIN lists_meta lm ON lm.category_id = c.id AND lm.account_id = $1
            GROUP BY c.id, c.category_name
            ORDER BY c.category_name
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn subcategories(
        &self,
        category_id: i32,
        account_id: i32,
    ) -> AppResult<Vec<Subcategory>> {
        let subcategories = sqlx::query_as::<_, Subcategory>(
            r#"
            SELECT s.id, s.category_id, s.subcategory_name, s.popular, COUNT(lm.id) AS list_count
            FROM subcategories s
            LEFT JOIN lists_meta lm ON lm.subcategory_id = s.id AND lm.account_id = $2
            WHERE s.category_id = $1
            GROUP BY s.id, s.category_id, s.subcategory_name, s.popular
            ORDER BY s.popular DESC, s.subcategory_name
            "#,
        )
        .bind(category_id)
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subcategories)
    }

    #[instrument(skip(self))]
    async fn search_items(
        &self,
        category_id: i32,
        fragment: &str,
        limit: i64,
    ) -> AppResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT i.item_name
            FROM items i
            INNER JOIN lists l ON l.item_id = i.id
            INNER JOIN lists_meta lm ON lm.id = l.list_id
            WHERE lm.category_id = $1
              AND i.item_name LIKE '%' || $2 || '%' ESCAPE '\'
            ORDER BY i.item_name
            LIMIT $3
            "#,
        )
        .bind(category_id)
        .bind(escape_like(fragment))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}
