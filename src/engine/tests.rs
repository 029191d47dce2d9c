use std::sync::Arc;
use std::time::Duration;

use crate::auditlog::MemoryAuditSink;
use crate::authority::MockAuthorityClient;
use crate::authority::model::NormalizedFactCheck;
use crate::claim::{Claim, Verdict, VerificationMode};
use crate::constants::{NEWS_COLLECTION, VERIFIED_CLAIMS_COLLECTION};
use crate::engine::{EngineConfig, VerificationEngine, validate_sources};
use crate::gateway::backends::{BackendKind, GenerativeBackend, ScriptedBackend};
use crate::gateway::{ModelGateway, RetryPolicy};
use crate::newsfeed::MockNewsFetcher;
use crate::vectordb::{CorpusHit, CorpusMetadata, MockCorpusStore};

fn news_hit(text: &str, source: &str, distance: f64) -> CorpusHit {
    CorpusHit {
        id: 1,
        text: text.to_string(),
        metadata: CorpusMetadata {
            source: source.to_string(),
            url: format!("https://{}.example/a", source.to_lowercase()),
            verdict: None,
            explanation: None,
        },
        distance,
    }
}

fn cached_hit(similarity: f64) -> CorpusHit {
    CorpusHit {
        id: 7,
        text: "The Earth is round".to_string(),
        metadata: CorpusMetadata {
            source: "Alt News".to_string(),
            url: "https://altnews.in/earth".to_string(),
            verdict: Some("true".to_string()),
            explanation: Some("Settled science.".to_string()),
        },
        distance: 1.0 - similarity,
    }
}

fn fast_gateway(backends: Vec<Box<dyn GenerativeBackend>>) -> Arc<ModelGateway> {
    Arc::new(ModelGateway::new(backends).with_retry_policy(RetryPolicy {
        max_attempts: 2,
        base_backoff: Duration::from_millis(1),
        per_backend_budget: Duration::from_secs(5),
    }))
}

fn engine_with(
    corpus: MockCorpusStore,
    authority: MockAuthorityClient,
    gateway: Arc<ModelGateway>,
    audit: Arc<MemoryAuditSink>,
) -> VerificationEngine<MockCorpusStore, MockAuthorityClient, MockNewsFetcher> {
    VerificationEngine::new(
        corpus,
        authority,
        MockNewsFetcher::new(),
        gateway,
        audit,
        EngineConfig::default(),
    )
}

#[tokio::test]
async fn cache_hit_short_circuits_the_pipeline() {
    let corpus =
        MockCorpusStore::new().with_hits(VERIFIED_CLAIMS_COLLECTION, vec![cached_hit(0.9)]);
    let backend = ScriptedBackend::new("gemini", BackendKind::Cloud).reply("should not be called");
    let audit = Arc::new(MemoryAuditSink::new());
    let engine = engine_with(
        corpus,
        MockAuthorityClient::new(),
        fast_gateway(vec![Box::new(backend)]),
        Arc::clone(&audit),
    );

    let result = engine
        .check_claim(&Claim::new("The Earth is round"), "guest")
        .await;

    assert_eq!(result.mode, VerificationMode::ExistingFactCheck);
    assert_eq!(result.verdict, Verdict::True);
    assert_eq!(result.sources_used.len(), 1);
}

#[tokio::test]
async fn authority_hit_skips_evidence_and_reasoning() {
    let authority = MockAuthorityClient::with_records(vec![NormalizedFactCheck {
        claim: "Drinking hot water cures flu".to_string(),
        verdict: Verdict::False,
        explanation: "No clinical evidence supports this.".to_string(),
        source: "BOOM Live".to_string(),
        url: "https://boomlive.in/flu".to_string(),
    }]);
    let audit = Arc::new(MemoryAuditSink::new());
    let engine = engine_with(
        MockCorpusStore::new(),
        authority,
        fast_gateway(vec![Box::new(
            ScriptedBackend::new("gemini", BackendKind::Cloud).reply("unused"),
        )]),
        Arc::clone(&audit),
    );

    let result = engine
        .check_claim(&Claim::new("Drinking hot water cures flu"), "guest")
        .await;

    assert_eq!(result.mode, VerificationMode::LiveFactCheck);
    assert_eq!(result.verdict, Verdict::False);
    assert_eq!(result.confidence, 0.95);
}

#[tokio::test]
async fn empty_evidence_yields_insufficient_evidence_without_reasoning() {
    let backend = ScriptedBackend::new("gemini", BackendKind::Cloud).reply("unused");
    let engine = engine_with(
        MockCorpusStore::new(),
        MockAuthorityClient::new(),
        fast_gateway(vec![Box::new(backend)]),
        Arc::new(MemoryAuditSink::new()),
    );

    let result = engine.check_claim(&Claim::new("An obscure claim"), "guest").await;

    assert_eq!(result.mode, VerificationMode::Reasoned);
    assert_eq!(result.verdict, Verdict::Unverified);
    assert_eq!(result.confidence, 0.0);
    assert!(result.explanation.starts_with("NOT ENOUGH EVIDENCE"));
    assert!(result.sources_used.is_empty());
}

#[tokio::test]
async fn populated_corpus_runs_reasoning_and_keeps_cited_sources() {
    let corpus = MockCorpusStore::new().with_hits(
        NEWS_COLLECTION,
        vec![
            news_hit("Satellite imagery confirms the coastline report.", "Reuters", 0.2),
            news_hit("Unrelated celebrity gossip.", "NDTV", 0.4),
        ],
    );
    let backend = ScriptedBackend::new("gemini", BackendKind::Cloud).reply(
        "VERDICT: TRUE\nCONFIDENCE: 0.88\nEXPLANATION: Imagery confirms it.\nSOURCES: Reuters",
    );
    let audit = Arc::new(MemoryAuditSink::new());
    let engine = engine_with(
        corpus,
        MockAuthorityClient::new(),
        fast_gateway(vec![Box::new(backend)]),
        Arc::clone(&audit),
    );

    let result = engine
        .check_claim(&Claim::new("The coastline has shifted"), "guest")
        .await;

    assert_eq!(result.mode, VerificationMode::Reasoned);
    assert_eq!(result.verdict, Verdict::True);
    assert_eq!(result.confidence, 0.88);
    assert_eq!(result.sources_used.len(), 1);
    assert_eq!(result.sources_used[0].source, "Reuters");
}

#[tokio::test]
async fn gateway_exhaustion_maps_to_error_mode() {
    let corpus = MockCorpusStore::new()
        .with_hits(NEWS_COLLECTION, vec![news_hit("Some coverage.", "BBC", 0.3)]);
    let backend = ScriptedBackend::new("gemini", BackendKind::Cloud);
    let engine = engine_with(
        corpus,
        MockAuthorityClient::new(),
        fast_gateway(vec![Box::new(backend)]),
        Arc::new(MemoryAuditSink::new()),
    );

    let result = engine.check_claim(&Claim::new("A claim"), "guest").await;

    assert_eq!(result.mode, VerificationMode::Error);
    assert_eq!(result.verdict, Verdict::Unverified);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(
        result.explanation,
        "Service temporarily unavailable. All models are currently down."
    );
}

#[tokio::test]
async fn expired_deadline_skips_evidence_and_reasoning() {
    // Evidence exists and the backend would answer TRUE, so anything
    // other than the short-circuit would produce a reasoned verdict.
    let corpus = MockCorpusStore::new()
        .with_hits(NEWS_COLLECTION, vec![news_hit("Some coverage.", "BBC", 0.3)]);
    let backend = ScriptedBackend::new("gemini", BackendKind::Cloud)
        .reply("VERDICT: TRUE\nCONFIDENCE: 0.9\nEXPLANATION: x\nSOURCES: BBC");
    let engine = VerificationEngine::new(
        corpus,
        MockAuthorityClient::new(),
        MockNewsFetcher::new(),
        fast_gateway(vec![Box::new(backend)]),
        Arc::new(MemoryAuditSink::new()),
        EngineConfig {
            overall_deadline: Duration::ZERO,
            ..EngineConfig::default()
        },
    );

    let result = engine.check_claim(&Claim::new("A claim"), "guest").await;

    assert_eq!(result.mode, VerificationMode::Reasoned);
    assert_eq!(result.verdict, Verdict::Unverified);
    assert!(result.explanation.starts_with("NOT ENOUGH EVIDENCE"));
    assert!(result.sources_used.is_empty());
}

#[tokio::test]
async fn deadline_bounds_slow_reasoning() {
    let corpus = MockCorpusStore::new()
        .with_hits(NEWS_COLLECTION, vec![news_hit("Some coverage.", "BBC", 0.3)]);
    // Backend stalls far past the overall budget before it would reply.
    let backend = ScriptedBackend::new("gemini", BackendKind::Cloud)
        .reply("VERDICT: TRUE\nCONFIDENCE: 0.9\nEXPLANATION: x\nSOURCES: BBC")
        .delayed(Duration::from_secs(5));
    let engine = VerificationEngine::new(
        corpus,
        MockAuthorityClient::new(),
        MockNewsFetcher::new(),
        fast_gateway(vec![Box::new(backend)]),
        Arc::new(MemoryAuditSink::new()),
        EngineConfig {
            overall_deadline: Duration::from_millis(100),
            ..EngineConfig::default()
        },
    );

    let started = std::time::Instant::now();
    let result = engine.check_claim(&Claim::new("A claim"), "guest").await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(result.mode, VerificationMode::Error);
    assert_eq!(result.verdict, Verdict::Unverified);
    assert_eq!(
        result.explanation,
        "Service temporarily unavailable. All models are currently down."
    );
    assert!(result.raw_answer.contains("deadline"));
}

#[tokio::test]
async fn every_run_audits_exactly_once() {
    let audit = Arc::new(MemoryAuditSink::new());
    let engine = engine_with(
        MockCorpusStore::new(),
        MockAuthorityClient::new(),
        fast_gateway(vec![Box::new(ScriptedBackend::new(
            "gemini",
            BackendKind::Cloud,
        ))]),
        Arc::clone(&audit),
    );

    engine.check_claim(&Claim::new("Anything"), "user-42").await;

    // The audit write is spawned; give it a beat to land.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let records = audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_hash.len(), 16);
}

#[tokio::test]
async fn authority_failure_degrades_to_later_stages() {
    let engine = engine_with(
        MockCorpusStore::new(),
        MockAuthorityClient::failing(),
        fast_gateway(vec![Box::new(ScriptedBackend::new(
            "gemini",
            BackendKind::Cloud,
        ))]),
        Arc::new(MemoryAuditSink::new()),
    );

    let result = engine.check_claim(&Claim::new("A claim"), "guest").await;
    // No corpus either, so the run bottoms out at insufficient evidence.
    assert_eq!(result.verdict, Verdict::Unverified);
    assert!(result.explanation.starts_with("NOT ENOUGH EVIDENCE"));
}

#[test]
fn uncited_sources_fall_back_to_full_evidence() {
    let evidence = vec![
        crate::claim::EvidenceItem {
            source_type: crate::claim::SourceType::News,
            source: "Reuters".to_string(),
            url: String::new(),
            snippet: String::new(),
            credibility_score: 0.8,
            credibility_level: crate::claim::CredibilityLevel::MediumHigh,
            is_verified_source: true,
            similarity_or_distance: None,
        },
        crate::claim::EvidenceItem {
            source_type: crate::claim::SourceType::News,
            source: "NDTV".to_string(),
            url: String::new(),
            snippet: String::new(),
            credibility_score: 0.8,
            credibility_level: crate::claim::CredibilityLevel::MediumHigh,
            is_verified_source: true,
            similarity_or_distance: None,
        },
    ];

    let cited = validate_sources(&["Reuters".to_string()], evidence.clone());
    assert_eq!(cited.len(), 1);

    let unmatched = validate_sources(&["Wikipedia".to_string()], evidence.clone());
    assert_eq!(unmatched.len(), 2);

    let unmentioned = validate_sources(&[], evidence);
    assert_eq!(unmentioned.len(), 2);
}
