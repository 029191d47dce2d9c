//! Verification pipeline orchestrator.
//!
//! Stages run in a fixed order with short-circuits: semantic cache,
//! external fact-check authority, evidence aggregation, then model
//! reasoning. Earlier stages are cheaper and more trustworthy, so the
//! first stage that produces a verdict ends the run. Every run emits
//! exactly one audit record, fire-and-forget.

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, instrument, warn};

use crate::auditlog::{AuditRecord, AuditSink};
use crate::authority::{self, AuthorityClient};
use crate::cache::SemanticCacheResolver;
use crate::claim::{Claim, EvidenceItem, VerificationResult};
use crate::constants::{DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K_VERIFIED};
use crate::evidence::{AggregatorConfig, EvidenceAggregator};
use crate::gateway::ModelGateway;
use crate::gateway::prompt::{FACT_CHECK_SYSTEM_PROMPT, build_fact_check_prompt};
use crate::newsfeed::NewsFetcher;
use crate::parser::{contradiction_score, parse_model_answer};
use crate::vectordb::CorpusStore;

const ALL_MODELS_DOWN: &str = "Service temporarily unavailable. All models are currently down.";

/// Tunables for one engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub similarity_threshold: f64,
    pub top_k_verified: u64,
    /// Max records requested from the fact-check authority.
    pub authority_page_size: u32,
    pub aggregator: AggregatorConfig,
    /// Wall-clock budget for one whole verification.
    pub overall_deadline: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            top_k_verified: DEFAULT_TOP_K_VERIFIED,
            authority_page_size: 5,
            aggregator: AggregatorConfig::default(),
            overall_deadline: Duration::from_secs(60),
        }
    }
}

/// The claim-verification pipeline.
pub struct VerificationEngine<C, A, N>
where
    C: CorpusStore,
    A: AuthorityClient,
    N: NewsFetcher,
{
    corpus: C,
    authority: A,
    news: N,
    cache: SemanticCacheResolver,
    aggregator: EvidenceAggregator,
    gateway: Arc<ModelGateway>,
    audit: Arc<dyn AuditSink>,
    config: EngineConfig,
}

impl<C, A, N> VerificationEngine<C, A, N>
where
    C: CorpusStore,
    A: AuthorityClient,
    N: NewsFetcher,
{
    pub fn new(
        corpus: C,
        authority: A,
        news: N,
        gateway: Arc<ModelGateway>,
        audit: Arc<dyn AuditSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            cache: SemanticCacheResolver::new(config.top_k_verified, config.similarity_threshold),
            aggregator: EvidenceAggregator::new(config.aggregator.clone()),
            corpus,
            authority,
            news,
            gateway,
            audit,
            config,
        }
    }

    pub fn gateway(&self) -> &ModelGateway {
        &self.gateway
    }

    /// Runs the full pipeline for one claim. Never returns an `Err`:
    /// every failure mode is folded into a `VerificationResult`.
    #[instrument(skip(self, claim, user_id), fields(language = %claim.language))]
    pub async fn check_claim(&self, claim: &Claim, user_id: &str) -> VerificationResult {
        let started = Instant::now();
        let deadline = started + self.config.overall_deadline;

        let (result, backend_used) = self.run_stages(claim, deadline).await;

        info!(
            mode = ?result.mode,
            verdict = result.verdict.as_str(),
            confidence = result.confidence,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "verification finished"
        );

        self.spawn_audit(claim, &result, backend_used, started.elapsed(), user_id);
        result
    }

    async fn run_stages(
        &self,
        claim: &Claim,
        deadline: Instant,
    ) -> (VerificationResult, Option<String>) {
        // Stage 1: semantic cache over already-verified claims.
        if let Some(hit) = self.cache.resolve(&self.corpus, &claim.text).await {
            return (hit, None);
        }

        // Stage 2: external fact-check authority.
        if let Some(hit) = authority::lookup(
            &self.authority,
            &claim.text,
            &claim.language,
            self.config.authority_page_size,
        )
        .await
        {
            return (hit, None);
        }

        if Instant::now() >= deadline {
            warn!("deadline expired before evidence aggregation");
            return (VerificationResult::insufficient_evidence(), None);
        }

        // Stage 3: evidence aggregation. Runs even when sparse; only a
        // completely empty bundle skips reasoning.
        let evidence = self
            .aggregator
            .aggregate(&self.corpus, &self.news, &claim.text, deadline)
            .await;
        if evidence.is_empty() {
            return (VerificationResult::insufficient_evidence(), None);
        }

        // Stage 4: model reasoning over the assembled context, bounded
        // by whatever remains of the overall deadline.
        let prompt = build_fact_check_prompt(&claim.text, &evidence.context);
        let remaining = deadline.saturating_duration_since(Instant::now());
        let generated = tokio::time::timeout(
            remaining,
            self.gateway.generate(FACT_CHECK_SYSTEM_PROMPT, &prompt),
        )
        .await;
        let response = match generated {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(error = %e, "reasoning gateway exhausted");
                let result = VerificationResult::error(ALL_MODELS_DOWN.to_string(), e.to_string());
                return (result, None);
            }
            Err(_) => {
                warn!(budget_ms = remaining.as_millis() as u64, "deadline expired during reasoning");
                let result = VerificationResult::error(
                    ALL_MODELS_DOWN.to_string(),
                    "verification deadline exceeded during reasoning".to_string(),
                );
                return (result, None);
            }
        };

        let parsed = parse_model_answer(&response.text);
        let sources_used = validate_sources(&parsed.sources, evidence.sources);

        let result = VerificationResult::reasoned(
            parsed.verdict,
            parsed.confidence,
            contradiction_score(&evidence.context),
            parsed.explanation,
            response.text,
            sources_used,
        );
        (result, Some(response.backend_id))
    }

    /// One best-effort audit record per result. A sink failure is the
    /// sink's problem; the caller already has its verdict.
    fn spawn_audit(
        &self,
        claim: &Claim,
        result: &VerificationResult,
        backend_used: Option<String>,
        latency: Duration,
        user_id: &str,
    ) {
        let record = AuditRecord::new(
            claim.text.clone(),
            result.verdict,
            result.confidence,
            result.mode,
            backend_used,
            latency.as_millis() as u64,
            user_id,
        );
        let sink = Arc::clone(&self.audit);
        tokio::spawn(async move { sink.log(record).await });
    }
}

/// Keeps the evidence items the model actually cited. When the model
/// named nothing recognizable the full evidence set is kept, so the
/// caller can always see what the verdict was grounded in.
fn validate_sources(mentioned: &[String], evidence: Vec<EvidenceItem>) -> Vec<EvidenceItem> {
    if mentioned.is_empty() {
        return evidence;
    }
    let mentioned_lower: Vec<String> = mentioned.iter().map(|s| s.to_lowercase()).collect();
    let cited: Vec<EvidenceItem> = evidence
        .iter()
        .filter(|item| {
            let source = item.source.to_lowercase();
            mentioned_lower
                .iter()
                .any(|m| m.contains(&source) || source.contains(m.as_str()))
        })
        .cloned()
        .collect();
    if cited.is_empty() { evidence } else { cited }
}
