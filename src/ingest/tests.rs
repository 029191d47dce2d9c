use std::collections::HashSet;

use super::{collect_documents, FeedPage, FeedRecord, IngestReport};
use crate::constants::{NEWS_COLLECTION, VERIFIED_CLAIMS_COLLECTION};
use crate::hashing::content_hash;

#[test]
fn fact_check_record_indexes_the_claim_text() {
    let record = FeedRecord {
        claim: Some("5G towers spread viruses".to_string()),
        title: Some("Fact check: the 5G rumor".to_string()),
        ..Default::default()
    };
    assert_eq!(record.indexable_text(), "5G towers spread viruses");
}

#[test]
fn article_record_joins_title_and_body() {
    let record = FeedRecord {
        title: Some("Flood relief announced".to_string()),
        text: Some("The state released new funds.".to_string()),
        ..Default::default()
    };
    assert_eq!(
        record.indexable_text(),
        "Flood relief announced. The state released new funds."
    );

    let title_only = FeedRecord {
        title: Some("Flood relief announced".to_string()),
        ..Default::default()
    };
    assert_eq!(title_only.indexable_text(), "Flood relief announced");
}

#[test]
fn record_prefers_text_over_description() {
    let record = FeedRecord {
        text: Some("full body".to_string()),
        description: Some("summary".to_string()),
        ..Default::default()
    };
    assert_eq!(record.indexable_text(), "full body");
}

#[test]
fn social_record_uses_platform_as_source() {
    let record = FeedRecord {
        platform: Some("twitter".to_string()),
        ..Default::default()
    };
    assert_eq!(record.source_name(), "twitter");
}

#[test]
fn feed_page_tolerates_sparse_items() {
    let page: FeedPage = serde_json::from_str(
        r#"{"items":[{"claim":"x","rating":"False"},{"title":"t","url":"https://a"}]}"#,
    )
    .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].rating.as_deref(), Some("False"));
    assert!(page.items[1].claim.is_none());
}

#[test]
fn collect_documents_dedups_by_normalized_content() {
    let items = vec![
        FeedRecord {
            title: Some("Dam breach in Pune".to_string()),
            ..Default::default()
        },
        FeedRecord {
            // Same text after whitespace/case normalization.
            title: Some("  DAM   breach in pune ".to_string()),
            ..Default::default()
        },
        FeedRecord {
            text: Some("   ".to_string()),
            ..Default::default()
        },
        FeedRecord {
            title: Some("Relief camps opened".to_string()),
            ..Default::default()
        },
    ];

    let mut seen = HashSet::new();
    let (docs, duplicates) = collect_documents(NEWS_COLLECTION, items, &mut seen);

    assert_eq!(docs.len(), 2);
    assert_eq!(duplicates, 1);
    assert_eq!(docs[0].id, content_hash("Dam breach in Pune").to_string());
    assert_eq!(docs[1].id, content_hash("Relief camps opened").to_string());
    assert_eq!(seen.len(), 2);
}

#[test]
fn collect_documents_keeps_verdict_only_for_fact_checks() {
    let record = || FeedRecord {
        claim: Some("Garlic cures covid".to_string()),
        rating: Some("False".to_string()),
        ..Default::default()
    };

    let mut seen = HashSet::new();
    let (fact_docs, _) = collect_documents(VERIFIED_CLAIMS_COLLECTION, vec![record()], &mut seen);
    assert_eq!(fact_docs[0].metadata.verdict.as_deref(), Some("False"));

    let mut seen = HashSet::new();
    let (news_docs, _) = collect_documents(NEWS_COLLECTION, vec![record()], &mut seen);
    assert!(news_docs[0].metadata.verdict.is_none());
}

#[test]
fn report_total_sums_all_corpora() {
    let report = IngestReport {
        news: 10,
        government: 4,
        fact_checks: 3,
        social: 7,
        duplicates: 2,
        errors: vec!["social.get_samples: timeout".to_string()],
    };
    assert_eq!(report.total(), 24);
}
