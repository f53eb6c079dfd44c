use serde::{Deserialize, Serialize};

/// Incoming recommendation request
///
/// Fields default so that a missing subcategory or item list is reported as
/// invalid input rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub subcategory_id: Option<i32>,
    #[serde(default)]
    pub items: Vec<String>,
}

/// A ranked, display-ready recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub item_name: String,
    pub points: i64,
}
