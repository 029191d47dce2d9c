use super::*;
use crate::claim::VerificationMode;
use crate::vectordb::{CorpusHit, CorpusMetadata, MockCorpusStore};

fn cached_claim(distance: f64, verdict: &str) -> CorpusHit {
    CorpusHit {
        id: 7,
        text: "Claim: vaccines are safe Verdict: true".to_string(),
        metadata: CorpusMetadata {
            source: "AltNews".to_string(),
            url: "https://altnews.in/check/7".to_string(),
            verdict: Some(verdict.to_string()),
            explanation: Some("WHO-approved vaccines passed phase-3 trials.".to_string()),
        },
        distance,
    }
}

#[tokio::test]
async fn hit_above_threshold_returns_existing_fact_check() {
    let store =
        MockCorpusStore::new().with_hits(VERIFIED_CLAIMS_COLLECTION, vec![cached_claim(0.2, "true")]);
    let resolver = SemanticCacheResolver::default();

    let result = resolver.resolve(&store, "are vaccines safe").await.unwrap();

    assert_eq!(result.mode, VerificationMode::ExistingFactCheck);
    assert_eq!(result.verdict, Verdict::True);
    assert_eq!(result.confidence, 0.8); // 1 - 0.2
    assert_eq!(result.sources_used.len(), 1);
    assert_eq!(result.sources_used[0].source_type, SourceType::Factcheck);
    assert!(result.raw_answer.contains("AltNews"));
}

#[tokio::test]
async fn hit_below_threshold_is_a_miss() {
    let store =
        MockCorpusStore::new().with_hits(VERIFIED_CLAIMS_COLLECTION, vec![cached_claim(0.5, "true")]);
    let resolver = SemanticCacheResolver::default();

    assert!(resolver.resolve(&store, "unrelated claim").await.is_none());
}

#[tokio::test]
async fn empty_collection_is_a_miss() {
    let store = MockCorpusStore::new();
    let resolver = SemanticCacheResolver::default();
    assert!(resolver.resolve(&store, "anything").await.is_none());
}

#[tokio::test]
async fn store_failure_degrades_to_miss() {
    let store = MockCorpusStore::new().fail_queries();
    let resolver = SemanticCacheResolver::default();
    assert!(resolver.resolve(&store, "anything").await.is_none());
}

#[tokio::test]
async fn resolve_is_idempotent_against_unchanged_cache() {
    let store =
        MockCorpusStore::new().with_hits(VERIFIED_CLAIMS_COLLECTION, vec![cached_claim(0.1, "false")]);
    let resolver = SemanticCacheResolver::default();

    let first = resolver.resolve(&store, "the claim").await.unwrap();
    let second = resolver.resolve(&store, "the claim").await.unwrap();

    assert_eq!(first.verdict, second.verdict);
    assert_eq!(first.confidence, second.confidence);
}

#[tokio::test]
async fn garbage_stored_verdict_resolves_to_unverified() {
    let store = MockCorpusStore::new()
        .with_hits(VERIFIED_CLAIMS_COLLECTION, vec![cached_claim(0.1, "pants-on-fire")]);
    let resolver = SemanticCacheResolver::default();

    let result = resolver.resolve(&store, "the claim").await.unwrap();
    assert_eq!(result.verdict, Verdict::Unverified);
}
