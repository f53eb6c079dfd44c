use crate::models::Recommendation;

use super::scoring::ScoreMap;

/// Maximum number of recommendations returned per request
pub const MAX_RECOMMENDATIONS: usize = 50;

/// Orders scored items and converts them to display form
///
/// Sorts by points descending, breaking ties by normalized name ascending,
/// and keeps at most [`MAX_RECOMMENDATIONS`] entries.
pub fn rank(scores: ScoreMap) -> Vec<Recommendation> {
    let mut scored: Vec<_> = scores.into_iter().collect();
    scored.sort_by(|(a_name, a_points), (b_name, b_points)| {
        b_points.cmp(a_points).then_with(|| a_name.cmp(b_name))
    });

    scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(name, points)| Recommendation {
            item_name: name.display_name(),
            points,
        })
        .collect()
}
