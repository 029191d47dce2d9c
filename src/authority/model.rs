//! Wire model for the external claim-search service.
//!
//! Mirrors the Google Fact Check Tools `claims:search` response shape. Records
//! are heterogeneous; every field is optional or defaulted so that one odd
//! record never poisons the whole response.

use serde::Deserialize;

use crate::claim::Verdict;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSearchResponse {
    #[serde(default)]
    pub claims: Vec<ClaimRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub claimant: Option<String>,
    #[serde(default)]
    pub claim_date: Option<String>,
    #[serde(default)]
    pub claim_review: Vec<ClaimReview>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReview {
    #[serde(default)]
    pub publisher: Option<Publisher>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub textual_rating: Option<String>,
    #[serde(default)]
    pub review_rating: Option<ReviewRating>,
    #[serde(default)]
    pub language_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRating {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating_value: Option<f64>,
    #[serde(default)]
    pub best_rating: Option<f64>,
    #[serde(default)]
    pub worst_rating: Option<f64>,
}

/// One claim review normalized into the canonical vocabulary.
#[derive(Debug, Clone)]
pub struct NormalizedFactCheck {
    pub claim: String,
    pub verdict: Verdict,
    pub explanation: String,
    pub source: String,
    pub url: String,
}
