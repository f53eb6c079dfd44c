use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::{ItemName, RankedList};

use super::recommendations::RecommendationError;

/// Accumulated score per candidate item
pub type ScoreMap = HashMap<ItemName, i64>;

/// Bonus added to every entry of a list whose #1 matches the user's #1
pub const NO1_MATCH_BONUS: i64 = 15;

/// Maximum number of items a user may submit
pub const MAX_INPUT_ITEMS: usize = 5;

/// The requester's own candidate items, normalized and in rank order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    items: Vec<ItemName>,
    lookup: HashSet<ItemName>,
}

impl UserInput {
    /// Validates and normalizes raw item names
    ///
    /// Requires 1 to [`MAX_INPUT_ITEMS`] non-blank names that stay distinct
    /// after normalization.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, RecommendationError> {
        if raw.is_empty() {
            return Err(RecommendationError::InvalidInput(
                "At least one item is required".to_string(),
            ));
        }
        if raw.len() > MAX_INPUT_ITEMS {
            return Err(RecommendationError::InvalidInput(format!(
                "At most {} items are allowed",
                MAX_INPUT_ITEMS
            )));
        }

        let mut items = Vec::with_capacity(raw.len());
        let mut lookup = HashSet::with_capacity(raw.len());

        for (idx, name) in raw.iter().enumerate() {
            let item = ItemName::normalize(name.as_ref()).ok_or_else(|| {
                RecommendationError::InvalidInput(format!("Item {} is empty", idx + 1))
            })?;
            if !lookup.insert(item.clone()) {
                return Err(RecommendationError::InvalidInput(format!(
                    "Duplicate item: {}",
                    item
                )));
            }
            items.push(item);
        }

        Ok(Self { items, lookup })
    }

    /// The user's rank-1 item
    pub fn top(&self) -> &ItemName {
        // parse() guarantees at least one item
        &self.items[0]
    }

    pub fn contains(&self, item: &ItemName) -> bool {
        self.lookup.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Points for an entry based on its rank in its own list
pub fn rank_points(rank: u8) -> i64 {
    match rank {
        1 => 8,
        2 => 5,
        3 => 3,
        4 => 2,
        _ => 0,
    }
}

/// Stepped bonus by hit percentage
pub fn tier_bonus(hit_pct: u32) -> i64 {
    match hit_pct {
        p if p >= 80 => 100,
        p if p >= 60 => 50,
        p if p >= 30 => 25,
        p if p > 0 => 5,
        _ => 0,
    }
}

/// Floored percentage of the user's items found anywhere in `list`
pub fn hit_percentage(list: &RankedList, input: &UserInput) -> u32 {
    if input.is_empty() {
        return 0;
    }

    let hits: HashSet<&ItemName> = list
        .entries
        .iter()
        .map(|entry| &entry.item)
        .filter(|item| input.contains(item))
        .collect();

    (100 * hits.len() / input.len()) as u32
}

/// Whether `list` ranks the user's #1 item first as well
fn shares_top_pick(list: &RankedList, input: &UserInput) -> bool {
    list.top_item() == Some(input.top())
}

/// Request-scoped score accumulator
///
/// Folding is commutative and associative per item, so boards built from
/// disjoint sets of lists can be merged in any order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: ScoreMap,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one peer list into the running totals
    pub fn fold_list(
        &mut self,
        list: &RankedList,
        input: &UserInput,
    ) -> Result<(), RecommendationError> {
        let hit_pct = hit_percentage(list, input);
        if hit_pct == 0 {
            return Ok(());
        }

        // Both bonuses are list-wide and apply to every entry of the list
        let list_bonus = tier_bonus(hit_pct)
            + if shares_top_pick(list, input) {
                NO1_MATCH_BONUS
            } else {
                0
            };

        for entry in &list.entries {
            if input.contains(&entry.item) {
                continue;
            }
            self.add(&entry.item, rank_points(entry.rank) + list_bonus)?;
        }

        Ok(())
    }

    fn add(&mut self, item: &ItemName, points: i64) -> Result<(), RecommendationError> {
        let total = self.totals.entry(item.clone()).or_insert(0);
        *total = total.checked_add(points).ok_or_else(|| {
            RecommendationError::ComputationFault(format!("Score overflow for item '{}'", item))
        })?;
        Ok(())
    }

    /// Combines two partial boards by summing per item
    pub fn merge(mut self, other: ScoreBoard) -> Result<Self, RecommendationError> {
        for (item, points) in other.totals {
            self.add(&item, points)?;
        }
        Ok(self)
    }

    pub fn into_scores(self) -> ScoreMap {
        self.totals
    }
}

/// Scores every candidate item across `lists`
pub fn score(lists: &[RankedList], input: &UserInput) -> Result<ScoreMap, RecommendationError> {
    let mut board = ScoreBoard::new();
    for list in lists {
        board.fold_list(list, input)?;
    }
    Ok(board.into_scores())
}

/// Scores `lists` in shards of `shard_size` on the blocking pool and merges them
///
/// Falls back to a single inline pass when everything fits in one shard.
pub async fn score_sharded(
    lists: Vec<RankedList>,
    input: Arc<UserInput>,
    shard_size: usize,
) -> Result<ScoreMap, RecommendationError> {
    let shard_size = shard_size.max(1);
    if lists.len() <= shard_size {
        return score(&lists, &input);
    }

    let mut shards: Vec<Vec<RankedList>> = Vec::new();
    let mut remaining = lists.into_iter().peekable();
    while remaining.peek().is_some() {
        shards.push(remaining.by_ref().take(shard_size).collect());
    }

    tracing::debug!(shard_count = shards.len(), shard_size, "Scoring candidate lists in shards");

    let tasks: Vec<_> = shards
        .into_iter()
        .map(|shard| {
            let input = Arc::clone(&input);
            tokio::task::spawn_blocking(move || {
                let mut board = ScoreBoard::new();
                for list in &shard {
                    board.fold_list(list, &input)?;
                }
                Ok::<_, RecommendationError>(board)
            })
        })
        .collect();

    let mut merged = ScoreBoard::new();
    for task in tasks {
        let board = task
            .await
            .map_err(|e| RecommendationError::ComputationFault(format!("Scoring shard failed: {}", e)))??;
        merged = merged.merge(board)?;
    }

    Ok(merged.into_scores())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListEntry;

    fn item(name: &str) -> ItemName {
        ItemName::normalize(name).unwrap()
    }

    fn input(names: &[&str]) -> UserInput {
        UserInput::parse(names).unwrap()
    }

    fn list(list_id: i32, entries: &[(&str, u8)]) -> RankedList {
        RankedList {
            list_id,
            account_id: 100 + list_id,
            entries: entries
                .iter()
                .map(|(name, rank)| ListEntry::new(item(name), *rank))
                .collect(),
        }
    }

    #[test]
    fn test_worked_example() {
        let user = input(&["a", "b", "c"]);
        let lists = vec![list(1, &[("a", 1), ("d", 2), ("e", 3)])];

        let scores = score(&lists, &user).unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[&item("d")], 45);
        assert_eq!(scores[&item("e")], 43);
        assert!(!scores.contains_key(&item("a")));
    }

    #[test]
    fn test_empty_lists_yield_empty_scores() {
        let scores = score(&[], &input(&["a"])).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_zero_overlap_lists_contribute_nothing() {
        let user = input(&["a", "b"]);
        let lists = vec![
            list(1, &[("x", 1), ("y", 2), ("z", 3)]),
            list(2, &[("q", 1), ("r", 2)]),
        ];
        assert!(score(&lists, &user).unwrap().is_empty());
    }

    #[test]
    fn test_user_items_never_scored_case_insensitive() {
        let user = input(&["Heat", "ALIEN"]);
        let lists = vec![list(1, &[("heat", 1), ("alien", 2), ("ronin", 3)])];

        let scores = score(&lists, &user).unwrap();

        assert!(!scores.contains_key(&item("heat")));
        assert!(!scores.contains_key(&item("alien")));
        assert!(scores.contains_key(&item("ronin")));
    }

    #[test]
    fn test_no1_bonus_follows_rank_not_position() {
        let user = input(&["x", "w"]);
        let lists = vec![
            list(1, &[("y", 2), ("x", 1), ("z", 3)]),
            list(2, &[("x", 2), ("w", 1), ("v", 3)]),
        ];

        let scores = score(&lists, &user).unwrap();

        // list 1: hit 50% -> +25, rank-1 is x -> +15
        // list 2: hit 100% -> +100, rank-1 is w -> no bonus
        assert_eq!(scores[&item("y")], 5 + 15 + 25);
        assert_eq!(scores[&item("z")], 3 + 15 + 25);
        assert_eq!(scores[&item("v")], 3 + 100);
    }

    #[test]
    fn test_no1_bonus_applies_to_every_entry() {
        let user = input(&["x"]);
        let lists = vec![list(1, &[("x", 1), ("y", 2), ("z", 5)])];

        let scores = score(&lists, &user).unwrap();

        // hit 100% -> +100, no1 match -> +15
        assert_eq!(scores[&item("y")], 5 + 15 + 100);
        assert_eq!(scores[&item("z")], 15 + 100);
    }

    #[test]
    fn test_no1_bonus_requires_both_top_ranks() {
        let user = input(&["x", "w"]);
        // "x" is present but not ranked first by the peer
        let lists = vec![list(1, &[("y", 1), ("x", 2)])];

        let scores = score(&lists, &user).unwrap();

        // hit 50% -> +25, no no1 bonus
        assert_eq!(scores[&item("y")], 8 + 25);
    }

    #[test]
    fn test_short_input_uses_actual_denominator() {
        let user = input(&["a", "b"]);
        let lists = vec![list(1, &[("b", 1), ("c", 2)])];

        let scores = score(&lists, &user).unwrap();

        // 1 of 2 -> 50% -> +25
        assert_eq!(scores[&item("c")], 5 + 25);
    }

    #[test]
    fn test_hit_percentage_floors() {
        let user = input(&["a", "b", "c"]);
        assert_eq!(hit_percentage(&list(1, &[("a", 1)]), &user), 33);
        assert_eq!(hit_percentage(&list(2, &[("a", 1), ("b", 2)]), &user), 66);
        assert_eq!(hit_percentage(&list(3, &[("z", 1)]), &user), 0);
    }

    #[test]
    fn test_hit_percentage_counts_duplicates_once() {
        let user = input(&["a", "b"]);
        let malformed = list(1, &[("a", 1), ("a", 2)]);
        assert_eq!(hit_percentage(&malformed, &user), 50);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(tier_bonus(100), 100);
        assert_eq!(tier_bonus(80), 100);
        assert_eq!(tier_bonus(79), 50);
        assert_eq!(tier_bonus(60), 50);
        assert_eq!(tier_bonus(59), 25);
        assert_eq!(tier_bonus(30), 25);
        assert_eq!(tier_bonus(29), 5);
        assert_eq!(tier_bonus(1), 5);
        assert_eq!(tier_bonus(0), 0);
    }

    #[test]
    fn test_rank_points_table() {
        let points: Vec<i64> = (1..=6).map(rank_points).collect();
        assert_eq!(points, vec![8, 5, 3, 2, 0, 0]);
        assert_eq!(rank_points(0), 0);
    }

    #[test]
    fn test_scores_accumulate_across_lists() {
        let user = input(&["a", "b", "c", "d", "e"]);
        let lists = vec![
            // 1/5 = 20% -> +5, no1 match -> +15
            list(1, &[("a", 1), ("m", 2)]),
            // 4/5 = 80% -> +100
            list(2, &[("m", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)]),
        ];

        let scores = score(&lists, &user).unwrap();

        assert_eq!(scores[&item("m")], (5 + 15 + 5) + (8 + 100));
    }

    #[test]
    fn test_short_list_handled() {
        let user = input(&["a"]);
        let lists = vec![list(1, &[("a", 1)]), list(2, &[])];
        assert!(score(&lists, &user).unwrap().is_empty());
    }

    #[test]
    fn test_deterministic() {
        let user = input(&["a", "b", "c"]);
        let lists = vec![
            list(1, &[("a", 1), ("d", 2), ("e", 3)]),
            list(2, &[("b", 1), ("d", 2), ("f", 3)]),
            list(3, &[("c", 3), ("g", 1)]),
        ];
        assert_eq!(score(&lists, &user).unwrap(), score(&lists, &user).unwrap());
    }

    #[test]
    fn test_merge_equals_single_pass() {
        let user = input(&["a", "b", "c"]);
        let lists = vec![
            list(1, &[("a", 1), ("d", 2), ("e", 3)]),
            list(2, &[("b", 1), ("d", 2), ("f", 3)]),
            list(3, &[("c", 3), ("d", 1)]),
        ];

        let mut left = ScoreBoard::new();
        left.fold_list(&lists[0], &user).unwrap();
        let mut right = ScoreBoard::new();
        right.fold_list(&lists[1], &user).unwrap();
        right.fold_list(&lists[2], &user).unwrap();

        let merged = right.merge(left).unwrap().into_scores();
        assert_eq!(merged, score(&lists, &user).unwrap());
    }

    #[test]
    fn test_overflow_is_computation_fault() {
        let mut board = ScoreBoard::new();
        board.add(&item("x"), i64::MAX).unwrap();
        let err = board.add(&item("x"), 1).unwrap_err();
        assert!(matches!(err, RecommendationError::ComputationFault(_)));
    }

    #[tokio::test]
    async fn test_sharded_scoring_matches_single_pass() {
        let user = Arc::new(input(&["a", "b", "c"]));
        let lists: Vec<RankedList> = (0..25)
            .map(|i| {
                let filler = format!("item{}", i % 7);
                let top = if i % 3 == 0 { "a" } else { "b" };
                list(i, &[(top, 1), (filler.as_str(), 2), ("shared", 3), ("c", 4)])
            })
            .collect();

        let expected = score(&lists, &user).unwrap();
        let sharded = score_sharded(lists, user, 4).await.unwrap();

        assert_eq!(sharded, expected);
    }

    #[test]
    fn test_input_validation() {
        assert!(UserInput::parse::<&str>(&[]).is_err());
        assert!(UserInput::parse(&["a", "b", "c", "d", "e", "f"]).is_err());
        assert!(UserInput::parse(&["a", "  "]).is_err());
        assert!(UserInput::parse(&["Alien", "alien "]).is_err());

        let user = input(&[" Alien ", "Heat"]);
        assert_eq!(user.top(), &item("alien"));
        assert_eq!(user.len(), 2);
    }
}
