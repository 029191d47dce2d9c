//! Corpus ingestion from the feed server.
//!
//! Pulls the four tool endpoints (`news.get_latest`, `gov.get_bulletins`,
//! `factcheck.get_recent`, `social.get_samples`), dedups by content hash
//! of the normalized text, and upserts each batch into its corpus
//! collection. One failing source never aborts the others.

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::constants::{
    GOV_COLLECTION, NEWS_COLLECTION, SOCIAL_COLLECTION, VERIFIED_CLAIMS_COLLECTION,
};
use crate::hashing::content_hash;
use crate::vectordb::{CorpusDocument, CorpusMetadata, CorpusStore};

const DEFAULT_BATCH_LIMIT: u64 = 50;

/// One raw item from any of the feed endpoints. The endpoints disagree
/// on field names, so everything is optional and normalized afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
struct FeedRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    claim: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    verdict: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    rating: Option<String>,
}

impl FeedRecord {
    /// Indexable text: claim for fact checks, title + body otherwise.
    fn indexable_text(&self) -> String {
        if let Some(claim) = self.claim.as_deref().filter(|c| !c.is_empty()) {
            return claim.to_string();
        }
        let title = self.title.as_deref().unwrap_or("");
        let body = self
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.description.as_deref())
            .unwrap_or("");
        match (title.is_empty(), body.is_empty()) {
            (false, false) => format!("{title}. {body}"),
            (false, true) => title.to_string(),
            _ => body.to_string(),
        }
    }

    fn source_name(&self) -> String {
        self.source
            .clone()
            .or_else(|| self.platform.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct FeedPage {
    #[serde(default)]
    items: Vec<FeedRecord>,
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub news: usize,
    pub government: usize,
    pub fact_checks: usize,
    pub social: usize,
    /// Items skipped because an identical text was already seen this run.
    pub duplicates: usize,
    /// Per-source failure summaries; empty on a clean run.
    pub errors: Vec<String>,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.news + self.government + self.fact_checks + self.social
    }
}

/// Pulls feed endpoints and indexes their items into the corpora.
pub struct Ingestor<C: CorpusStore> {
    corpus: C,
    client: reqwest::Client,
    feed_base_url: String,
    batch_limit: u64,
}

impl<C: CorpusStore> Ingestor<C> {
    pub fn new(corpus: C, feed_base_url: impl Into<String>) -> Self {
        Self {
            corpus,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_default(),
            feed_base_url: feed_base_url.into(),
            batch_limit: DEFAULT_BATCH_LIMIT,
        }
    }

    /// Runs a full ingestion cycle across all four endpoints.
    #[instrument(skip(self))]
    pub async fn run(&self) -> IngestReport {
        let mut report = IngestReport::default();
        let mut seen = HashSet::new();

        let sources = [
            ("news.get_latest", NEWS_COLLECTION),
            ("gov.get_bulletins", GOV_COLLECTION),
            ("factcheck.get_recent", VERIFIED_CLAIMS_COLLECTION),
            ("social.get_samples", SOCIAL_COLLECTION),
        ];

        for (tool, collection) in sources {
            match self.ingest_source(tool, collection, &mut seen).await {
                Ok((ingested, duplicates)) => {
                    report.duplicates += duplicates;
                    match collection {
                        NEWS_COLLECTION => report.news = ingested,
                        GOV_COLLECTION => report.government = ingested,
                        VERIFIED_CLAIMS_COLLECTION => report.fact_checks = ingested,
                        _ => report.social = ingested,
                    }
                }
                Err(message) => {
                    warn!(tool, error = %message, "feed source failed, continuing");
                    report.errors.push(format!("{tool}: {message}"));
                }
            }
        }

        info!(
            total = report.total(),
            duplicates = report.duplicates,
            failures = report.errors.len(),
            "ingestion cycle finished"
        );
        report
    }

    /// Fetches one endpoint and upserts its deduplicated batch. Returns
    /// (ingested, duplicates).
    async fn ingest_source(
        &self,
        tool: &str,
        collection: &str,
        seen: &mut HashSet<u64>,
    ) -> Result<(usize, usize), String> {
        let url = format!("{}/tools/{}", self.feed_base_url, tool);
        let page: FeedPage = self
            .client
            .get(&url)
            .query(&[("limit", self.batch_limit)])
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?
            .json()
            .await
            .map_err(|e| e.to_string())?;

        let (docs, duplicates) = collect_documents(collection, page.items, seen);

        let ingested = docs.len();
        if ingested > 0 {
            self.corpus
                .upsert_documents(collection, docs)
                .await
                .map_err(|e| e.to_string())?;
        }
        Ok((ingested, duplicates))
    }
}

/// Builds the deduplicated upsert batch for one feed page. Returns the
/// documents plus how many items were skipped as duplicates.
fn collect_documents(
    collection: &str,
    items: Vec<FeedRecord>,
    seen: &mut HashSet<u64>,
) -> (Vec<CorpusDocument>, usize) {
    let mut duplicates = 0;
    let mut docs = Vec::with_capacity(items.len());

    for record in items {
        let text = record.indexable_text();
        if text.trim().is_empty() {
            continue;
        }
        let hash = content_hash(&text);
        if !seen.insert(hash) {
            duplicates += 1;
            continue;
        }

        let metadata = CorpusMetadata {
            source: record.source_name(),
            url: record.url.clone().unwrap_or_default(),
            verdict: if collection == VERIFIED_CLAIMS_COLLECTION {
                record.verdict.clone().or_else(|| record.rating.clone())
            } else {
                None
            },
            explanation: if collection == VERIFIED_CLAIMS_COLLECTION {
                record.explanation.clone().or_else(|| record.title.clone())
            } else {
                None
            },
        };

        docs.push(CorpusDocument {
            id: hash.to_string(),
            text,
            metadata,
        });
    }

    (docs, duplicates)
}
