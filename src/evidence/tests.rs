use super::*;
use crate::claim::CredibilityLevel;
use crate::newsfeed::MockNewsFetcher;
use crate::vectordb::{CorpusHit, CorpusMetadata, MockCorpusStore};

fn far_deadline() -> Instant {
    Instant::now() + Duration::from_secs(60)
}

fn corpus_hit(id: u64, source: &str, url: &str, text: &str, distance: f64) -> CorpusHit {
    CorpusHit {
        id,
        text: text.to_string(),
        metadata: CorpusMetadata {
            source: source.to_string(),
            url: url.to_string(),
            verdict: None,
            explanation: None,
        },
        distance,
    }
}

fn live_article(source: &str, title: &str) -> NewsArticle {
    NewsArticle {
        title: title.to_string(),
        description: Some("fresh coverage of the event".to_string()),
        text: None,
        url: "https://example.com/live".to_string(),
        source: source.to_string(),
    }
}

#[tokio::test]
async fn live_items_precede_indexed_corpus_items() {
    let store = MockCorpusStore::new().with_hits(
        NEWS_COLLECTION,
        vec![corpus_hit(1, "The Hindu", "https://thehindu.com/a", "indexed article", 0.3)],
    );
    let fetcher = MockNewsFetcher::with_articles(vec![live_article("NDTV", "Breaking")]);
    let aggregator = EvidenceAggregator::default();

    let bundle = aggregator
        .aggregate(&store, &fetcher, "the claim", far_deadline())
        .await;

    assert_eq!(bundle.sources.len(), 2);
    assert_eq!(bundle.sources[0].source, "NDTV");
    assert!(bundle.sources[0].similarity_or_distance.is_none());
    assert_eq!(bundle.sources[1].source, "The Hindu");

    let live_pos = bundle.context.find("[LIVE NEWS 1 - NDTV]").unwrap();
    let indexed_pos = bundle.context.find("[NEWS 1 - The Hindu]").unwrap();
    assert!(live_pos < indexed_pos);
}

#[tokio::test]
async fn corpus_sections_appear_in_news_gov_social_order() {
    let store = MockCorpusStore::new()
        .with_hits(NEWS_COLLECTION, vec![corpus_hit(1, "Reuters", "u1", "news text", 0.2)])
        .with_hits(GOV_COLLECTION, vec![corpus_hit(2, "PIB", "u2", "bulletin text", 0.25)])
        .with_hits(SOCIAL_COLLECTION, vec![corpus_hit(3, "handle", "u3", "post text", 0.4)]);
    let fetcher = MockNewsFetcher::new();
    let aggregator = EvidenceAggregator::default();

    let bundle = aggregator
        .aggregate(&store, &fetcher, "the claim", far_deadline())
        .await;

    assert_eq!(bundle.sources.len(), 3);
    assert_eq!(bundle.sources[0].source_type, SourceType::News);
    assert_eq!(bundle.sources[1].source_type, SourceType::Gov);
    assert_eq!(bundle.sources[2].source_type, SourceType::Social);

    assert!(bundle.context.contains("[NEWS 1 - Reuters]"));
    assert!(bundle.context.contains("[GOVERNMENT 1 - PIB]"));
    assert!(bundle.context.contains("[SOCIAL 1 - handle]"));
}

#[tokio::test]
async fn credibility_is_applied_per_item() {
    let store = MockCorpusStore::new()
        .with_hits(GOV_COLLECTION, vec![corpus_hit(1, "PIB", "u", "official", 0.2)])
        .with_hits(SOCIAL_COLLECTION, vec![corpus_hit(2, "random", "u", "viral", 0.3)]);
    let fetcher = MockNewsFetcher::new();
    let aggregator = EvidenceAggregator::default();

    let bundle = aggregator
        .aggregate(&store, &fetcher, "the claim", far_deadline())
        .await;

    let gov = &bundle.sources[0];
    assert_eq!(gov.credibility_score, 0.95);
    assert_eq!(gov.credibility_level, CredibilityLevel::High);

    let social = &bundle.sources[1];
    assert_eq!(social.credibility_score, 0.40);
    assert_eq!(social.credibility_level, CredibilityLevel::Low);
}

#[tokio::test]
async fn missing_url_is_synthesized_from_source_slug() {
    let store = MockCorpusStore::new().with_hits(
        NEWS_COLLECTION,
        vec![corpus_hit(1, "Daily Bugle", "", "article", 0.3)],
    );
    let fetcher = MockNewsFetcher::new();
    let aggregator = EvidenceAggregator::default();

    let bundle = aggregator
        .aggregate(&store, &fetcher, "the claim", far_deadline())
        .await;

    assert_eq!(bundle.sources[0].url, "https://reference.daily-bugle.com");
}

#[tokio::test]
async fn empty_text_yields_placeholder_snippet_and_long_text_is_truncated() {
    let long_text = "x".repeat(900);
    let store = MockCorpusStore::new().with_hits(
        NEWS_COLLECTION,
        vec![
            corpus_hit(1, "A", "u", "", 0.3),
            corpus_hit(2, "B", "u", &long_text, 0.3),
        ],
    );
    let fetcher = MockNewsFetcher::new();
    let aggregator = EvidenceAggregator::default();

    let bundle = aggregator
        .aggregate(&store, &fetcher, "the claim", far_deadline())
        .await;

    assert_eq!(bundle.sources[0].snippet, "No content available");
    assert_eq!(bundle.sources[1].snippet.chars().count(), SNIPPET_MAX_CHARS);
}

#[tokio::test]
async fn failing_collaborators_yield_an_empty_bundle() {
    let store = MockCorpusStore::new().fail_queries();
    let fetcher = MockNewsFetcher::failing();
    let aggregator = EvidenceAggregator::default();

    let bundle = aggregator
        .aggregate(&store, &fetcher, "the claim", far_deadline())
        .await;

    assert!(bundle.is_empty());
    assert!(bundle.context.is_empty());
}

#[tokio::test]
async fn expired_deadline_skips_all_queries() {
    let store = MockCorpusStore::new().with_hits(
        NEWS_COLLECTION,
        vec![corpus_hit(1, "Reuters", "u", "text", 0.2)],
    );
    let fetcher = MockNewsFetcher::with_articles(vec![live_article("NDTV", "t")]);
    let aggregator = EvidenceAggregator::default();

    let bundle = aggregator
        .aggregate(&store, &fetcher, "the claim", Instant::now())
        .await;

    assert!(bundle.is_empty());
}
