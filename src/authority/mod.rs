//! External fact-check authority lookup.
//!
//! Best-effort enhancement stage: queries a pre-vetted claim-search service
//! and normalizes its free-text rating vocabulary into the canonical verdict
//! enum. Every failure here is logged and swallowed; the stage yields a miss
//! and the pipeline proceeds.

pub mod model;

#[cfg(test)]
mod tests;

pub use model::NormalizedFactCheck;

use tracing::{debug, info, instrument, warn};

use crate::claim::{EvidenceItem, SourceType, Verdict, VerificationResult, truncate_chars};
use crate::constants::SNIPPET_MAX_CHARS;
use crate::credibility;
use model::{ClaimRecord, ClaimSearchResponse, ReviewRating};
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from the authority search client.
pub enum AuthorityError {
    /// No API key configured; the stage is disabled.
    #[error("authority lookup not configured (missing API key)")]
    NotConfigured,

    /// Transport-level failure.
    #[error("authority request failed: {0}")]
    RequestFailed(String),

    /// The service returned a malformed body.
    #[error("invalid authority response: {0}")]
    InvalidResponse(String),
}

/// Async claim-search interface, returning already-normalized records in the
/// service's own ranking order.
pub trait AuthorityClient: Send + Sync {
    fn search(
        &self,
        query: &str,
        language: &str,
        max_results: u32,
    ) -> impl std::future::Future<Output = Result<Vec<NormalizedFactCheck>, AuthorityError>> + Send;
}

/// Google Fact Check Tools `claims:search` client.
#[derive(Debug, Clone)]
pub struct GoogleFactCheckClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

/// Default claim-search endpoint.
pub const DEFAULT_FACTCHECK_ENDPOINT: &str =
    "https://factchecktools.googleapis.com/v1alpha1/claims:search";

impl GoogleFactCheckClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: std::time::Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

impl AuthorityClient for GoogleFactCheckClient {
    #[instrument(skip(self, query))]
    async fn search(
        &self,
        query: &str,
        language: &str,
        max_results: u32,
    ) -> Result<Vec<NormalizedFactCheck>, AuthorityError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AuthorityError::NotConfigured);
        };

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", api_key),
                ("query", query),
                ("languageCode", language),
                ("pageSize", &max_results.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AuthorityError::RequestFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthorityError::RequestFailed(e.to_string()))?;

        let body: ClaimSearchResponse = response
            .json()
            .await
            .map_err(|e| AuthorityError::InvalidResponse(e.to_string()))?;

        Ok(body
            .claims
            .into_iter()
            .filter_map(normalize_record)
            .collect())
    }
}

/// Normalizes one claim record. Only the first review per claim is used.
fn normalize_record(record: ClaimRecord) -> Option<NormalizedFactCheck> {
    let review = record.claim_review.into_iter().next()?;

    let rating_name = review
        .review_rating
        .as_ref()
        .and_then(|r| r.name.clone())
        .or_else(|| review.textual_rating.clone())
        .unwrap_or_default();

    let verdict = normalize_verdict(&rating_name, review.review_rating.as_ref());

    let (source, site) = review
        .publisher
        .map(|p| (p.name.unwrap_or_default(), p.site.unwrap_or_default()))
        .unwrap_or_default();
    let source = if source.is_empty() {
        "Unknown".to_string()
    } else {
        source
    };

    // Prefer the review title as the explanation; fall back to the rating name.
    let explanation = review
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or(rating_name);

    let url = review.url.filter(|u| !u.is_empty()).unwrap_or(site);

    Some(NormalizedFactCheck {
        claim: record.text,
        verdict,
        explanation,
        source,
        url,
    })
}

const TRUE_KEYWORDS: [&str; 6] = [
    "true",
    "accurate",
    "correct",
    "verified",
    "fact-checked",
    "correct fact",
];

const FALSE_KEYWORDS: [&str; 6] = [
    "false",
    "inaccurate",
    "incorrect",
    "fabricated",
    "false claim",
    "false information",
];

const MISLEADING_KEYWORDS: [&str; 6] = [
    "misleading",
    "misleaded",
    "mixed",
    "partial",
    "out of context",
    "lacks context",
];

/// Maps a provider's free-text rating to the canonical verdict enum.
///
/// Keyword scan first; FALSE is checked before TRUE so that ratings like
/// "false information" never match the "true"-family substrings. When no
/// keyword matches but a numeric scale is present, a value above half the
/// best rating counts as TRUE. The final fallback is MISLEADING.
pub fn normalize_verdict(rating_name: &str, rating: Option<&ReviewRating>) -> Verdict {
    let name = rating_name.to_lowercase();

    if FALSE_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        return Verdict::False;
    }
    if MISLEADING_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        return Verdict::Misleading;
    }
    if TRUE_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        return Verdict::True;
    }

    if let Some(rating) = rating
        && let Some(value) = rating.rating_value
    {
        let best = rating.best_rating.unwrap_or(1.0);
        return if value > best / 2.0 {
            Verdict::True
        } else {
            Verdict::False
        };
    }

    Verdict::Misleading
}

/// Runs the authority stage: best-ranked normalized record wins.
///
/// Confidence is fixed at 0.95 for any authority match, independent of the
/// review's own rating strength. Retained from the original system as
/// specified; the tests flag this as a known simplification.
#[instrument(skip(client, claim_text))]
pub async fn lookup<A: AuthorityClient>(
    client: &A,
    claim_text: &str,
    language: &str,
    max_results: u32,
) -> Option<VerificationResult> {
    let records = match client.search(claim_text, language, max_results).await {
        Ok(records) => records,
        Err(AuthorityError::NotConfigured) => {
            debug!("Authority lookup disabled, skipping stage");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "Authority lookup failed, continuing without it");
            return None;
        }
    };

    let best = records.into_iter().next()?;
    let rating = credibility::rate(&best.source, SourceType::Factcheck);

    let item = EvidenceItem {
        source_type: SourceType::Factcheck,
        source: best.source.clone(),
        url: best.url.clone(),
        snippet: truncate_chars(&best.explanation, SNIPPET_MAX_CHARS),
        credibility_score: rating.score,
        credibility_level: rating.level,
        is_verified_source: rating.is_verified_source,
        similarity_or_distance: None,
    };

    info!(verdict = best.verdict.as_str(), source = %best.source, "Found live fact-check");

    Some(VerificationResult::live_fact_check(
        best.verdict,
        format!("Fact check by {}: {}", best.source, best.explanation),
        format!("Live match from {}", best.source),
        item,
    ))
}

/// Scripted authority client for tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Default)]
pub struct MockAuthorityClient {
    records: Vec<NormalizedFactCheck>,
    fail: bool,
}

#[cfg(any(test, feature = "mock"))]
impl MockAuthorityClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<NormalizedFactCheck>) -> Self {
        Self {
            records,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
        }
    }
}

#[cfg(any(test, feature = "mock"))]
impl AuthorityClient for MockAuthorityClient {
    async fn search(
        &self,
        _query: &str,
        _language: &str,
        _max_results: u32,
    ) -> Result<Vec<NormalizedFactCheck>, AuthorityError> {
        if self.fail {
            return Err(AuthorityError::RequestFailed("mock failure".to_string()));
        }
        Ok(self.records.clone())
    }
}
