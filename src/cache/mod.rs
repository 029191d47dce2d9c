//! Semantic cache of previously adjudicated claims.
//!
//! Near-duplicate claims short-circuit the whole pipeline: if the closest
//! stored claim clears the similarity gate, its verdict is replayed as an
//! `existing_fact_check` result. A miss (or any store failure) is not an
//! error; the pipeline simply falls through to the next stage.

#[cfg(test)]
mod tests;

use tracing::{debug, info, instrument, warn};

use crate::claim::{EvidenceItem, SourceType, Verdict, VerificationResult, truncate_chars};
use crate::constants::{DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K_VERIFIED, VERIFIED_CLAIMS_COLLECTION};
use crate::credibility;
use crate::vectordb::CorpusStore;

/// Resolver over the `verified_claims` collection.
#[derive(Debug, Clone)]
pub struct SemanticCacheResolver {
    top_k: u64,
    similarity_threshold: f64,
}

impl Default for SemanticCacheResolver {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K_VERIFIED,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl SemanticCacheResolver {
    pub fn new(top_k: u64, similarity_threshold: f64) -> Self {
        Self {
            top_k,
            similarity_threshold,
        }
    }

    /// Looks up `claim_text` against stored fact-checks.
    ///
    /// Returns `Some` only when the top hit's similarity clears the gate.
    /// Side-effect-free; store failures degrade to a miss.
    #[instrument(skip(self, corpus, claim_text))]
    pub async fn resolve<C: CorpusStore>(
        &self,
        corpus: &C,
        claim_text: &str,
    ) -> Option<VerificationResult> {
        let hits = match corpus
            .query_similar(VERIFIED_CLAIMS_COLLECTION, claim_text, self.top_k)
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "Semantic cache query failed, treating as miss");
                return None;
            }
        };

        let top = hits.first()?;
        let similarity = top.similarity();

        if similarity < self.similarity_threshold {
            debug!(
                similarity = similarity,
                threshold = self.similarity_threshold,
                "Cache candidate below similarity gate"
            );
            return None;
        }

        let verdict = top
            .metadata
            .verdict
            .as_deref()
            .map(Verdict::from_stored)
            .unwrap_or(Verdict::Unverified);
        let explanation = top.metadata.explanation.clone().unwrap_or_default();
        let source = top.metadata.source.clone();
        let rating = credibility::rate(&source, SourceType::Factcheck);

        let item = EvidenceItem {
            source_type: SourceType::Factcheck,
            source: source.clone(),
            url: top.metadata.url.clone(),
            snippet: truncate_chars(&explanation, 200),
            credibility_score: rating.score,
            credibility_level: rating.level,
            is_verified_source: rating.is_verified_source,
            similarity_or_distance: Some(similarity),
        };

        info!(
            verdict = verdict.as_str(),
            similarity = similarity,
            "Found existing fact-check in semantic cache"
        );

        Some(VerificationResult::existing_fact_check(
            verdict,
            similarity,
            explanation,
            format!("Matched existing fact-check from {source}"),
            item,
        ))
    }
}
