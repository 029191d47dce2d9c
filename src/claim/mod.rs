//! Core data model: claims, verdicts, evidence items, and verification results.
//!
//! A [`VerificationResult`] is created exactly once per claim check and never
//! mutated afterwards. The constructors on it are the only way pipeline stages
//! produce results, which keeps the structural invariants (canonical verdicts,
//! clamped scores, per-mode source shapes) in one place.


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional claim category supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Election,
    Disaster,
    Other,
}

/// A natural-language factual assertion submitted for verification.
///
/// Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// The claim text. Must be non-empty.
    pub text: String,

    /// ISO 639-1 language code.
    #[serde(default = "default_language")]
    pub language: String,

    /// Optional category hint.
    #[serde(default)]
    pub category: Option<Category>,
}

fn default_language() -> String {
    "en".to_string()
}

impl Claim {
    /// Creates an English-language claim with no category.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: default_language(),
            category: None,
        }
    }
}

/// Canonical claim classification. Never a provider's raw rating string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    True,
    False,
    Misleading,
    Unverified,
}

impl Verdict {
    /// Parses a stored verdict string (cache metadata), tolerating case.
    /// Anything unrecognized resolves to [`Verdict::Unverified`].
    pub fn from_stored(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" => Verdict::True,
            "false" => Verdict::False,
            "misleading" => Verdict::Misleading,
            _ => Verdict::Unverified,
        }
    }

    /// Canonical lowercase string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "true",
            Verdict::False => "false",
            Verdict::Misleading => "misleading",
            Verdict::Unverified => "unverified",
        }
    }
}

/// How the verdict was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    /// Near-duplicate claim found in the semantic cache.
    ExistingFactCheck,
    /// Matched by the external fact-check authority.
    LiveFactCheck,
    /// Adjudicated by the reasoning backend over aggregated evidence.
    Reasoned,
    /// All reasoning backends failed; 503-class condition.
    Error,
}

/// Provenance class of an evidence item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    News,
    Gov,
    Social,
    Factcheck,
}

/// Trust tier assigned by the credibility rater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredibilityLevel {
    #[serde(rename = "high")]
    High,
    #[serde(rename = "medium-high")]
    MediumHigh,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "low")]
    Low,
}

/// One normalized piece of supporting or refuting material.
///
/// Created by the evidence aggregator or the authority lookup; never mutated
/// after creation and owned by the result that references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceItem {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub source: String,
    pub url: String,
    pub snippet: String,
    pub credibility_score: f64,
    pub credibility_level: CredibilityLevel,
    pub is_verified_source: bool,
    /// Similarity (cache hits) or raw distance (corpus hits), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_or_distance: Option<f64>,
}

/// Terminal outcome of one claim-check invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub mode: VerificationMode,
    pub verdict: Verdict,
    pub confidence: f64,
    pub contradiction_score: f64,
    pub explanation: String,
    pub raw_answer: String,
    pub sources_used: Vec<EvidenceItem>,
    pub timestamp: DateTime<Utc>,
}

impl VerificationResult {
    /// Semantic cache hit. `confidence` is the match similarity.
    pub fn existing_fact_check(
        verdict: Verdict,
        similarity: f64,
        explanation: String,
        raw_answer: String,
        source: EvidenceItem,
    ) -> Self {
        debug_assert_eq!(source.source_type, SourceType::Factcheck);
        Self {
            mode: VerificationMode::ExistingFactCheck,
            verdict,
            confidence: round2(clamp_score(similarity)),
            contradiction_score: 0.0,
            explanation,
            raw_answer,
            sources_used: vec![source],
            timestamp: Utc::now(),
        }
    }

    /// Live authority match. Confidence is fixed at 0.95 regardless of the
    /// review's own rating strength; see the authority module notes.
    pub fn live_fact_check(
        verdict: Verdict,
        explanation: String,
        raw_answer: String,
        source: EvidenceItem,
    ) -> Self {
        debug_assert_eq!(source.source_type, SourceType::Factcheck);
        Self {
            mode: VerificationMode::LiveFactCheck,
            verdict,
            confidence: 0.95,
            contradiction_score: 0.0,
            explanation,
            raw_answer,
            sources_used: vec![source],
            timestamp: Utc::now(),
        }
    }

    /// Reasoned verdict assembled from the parsed model answer.
    pub fn reasoned(
        verdict: Verdict,
        confidence: f64,
        contradiction_score: f64,
        explanation: String,
        raw_answer: String,
        sources_used: Vec<EvidenceItem>,
    ) -> Self {
        Self {
            mode: VerificationMode::Reasoned,
            verdict,
            confidence: round2(clamp_score(confidence)),
            contradiction_score: round2(clamp_score(contradiction_score)),
            explanation,
            raw_answer,
            sources_used,
            timestamp: Utc::now(),
        }
    }

    /// Evidence aggregation found nothing; the reasoning stage was skipped.
    pub fn insufficient_evidence() -> Self {
        Self {
            mode: VerificationMode::Reasoned,
            verdict: Verdict::Unverified,
            confidence: 0.0,
            contradiction_score: 0.0,
            explanation: "NOT ENOUGH EVIDENCE: No relevant information found in knowledge base."
                .to_string(),
            raw_answer: "No context available".to_string(),
            sources_used: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Total reasoning exhaustion or an unexpected stage failure.
    pub fn error(explanation: String, raw_answer: String) -> Self {
        Self {
            mode: VerificationMode::Error,
            verdict: Verdict::Unverified,
            confidence: 0.0,
            contradiction_score: 0.0,
            explanation,
            raw_answer,
            sources_used: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

/// Clamps a score into `[0, 1]`. NaN collapses to 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Rounds to two decimal places, matching the wire format of scores.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Truncates to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
