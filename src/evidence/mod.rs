//! Evidence aggregation across live news and the indexed corpora.
//!
//! Fans out one live-fetch and three corpus queries concurrently, joins them,
//! and normalizes every raw hit into an [`EvidenceItem`] plus a textual
//! context block for the reasoning prompt. Live-fetch items are always
//! prepended ahead of indexed-corpus items, regardless of which query
//! finished first: freshness outranks corpus breadth, and that ordering is
//! observable in verdicts, so it is preserved literally.
//!
//! No hard cap is applied to the assembled context beyond per-item snippet
//! truncation; the per-corpus result caps are deliberately large to sweep the
//! full breadth of indexed angles on a claim.

#[cfg(test)]
mod tests;

use std::time::Duration;
use tokio::time::{Instant, timeout};
use tracing::{debug, instrument, warn};

use crate::claim::{EvidenceItem, SourceType, truncate_chars};
use crate::constants::{
    DEFAULT_LIVE_NEWS_LIMIT, DEFAULT_TOP_K_GOV, DEFAULT_TOP_K_NEWS, DEFAULT_TOP_K_SOCIAL,
    GOV_COLLECTION, NEWS_COLLECTION, SNIPPET_MAX_CHARS, SOCIAL_COLLECTION,
};
use crate::credibility;
use crate::newsfeed::{NewsArticle, NewsFetcher};
use crate::vectordb::{CorpusHit, CorpusStore};

/// Aggregated evidence for one claim: the prompt context and the owned,
/// ordered source items backing it.
#[derive(Debug, Clone, Default)]
pub struct EvidenceBundle {
    pub context: String,
    pub sources: Vec<EvidenceItem>,
}

impl EvidenceBundle {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Fan-out caps and per-query timeouts.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub top_k_news: u64,
    pub top_k_gov: u64,
    pub top_k_social: u64,
    pub live_news_limit: u64,
    pub live_fetch_timeout: Duration,
    pub corpus_query_timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            top_k_news: DEFAULT_TOP_K_NEWS,
            top_k_gov: DEFAULT_TOP_K_GOV,
            top_k_social: DEFAULT_TOP_K_SOCIAL,
            live_news_limit: DEFAULT_LIVE_NEWS_LIMIT,
            live_fetch_timeout: Duration::from_secs(5),
            corpus_query_timeout: Duration::from_secs(10),
        }
    }
}

/// Concurrent evidence aggregator.
#[derive(Debug, Clone, Default)]
pub struct EvidenceAggregator {
    config: AggregatorConfig,
}

impl EvidenceAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Gathers evidence for `claim_text`, bounded by `deadline`.
    ///
    /// Never fails: every sub-query failure or timeout degrades to an empty
    /// contribution. With the deadline already expired, returns an empty
    /// bundle immediately.
    #[instrument(skip(self, corpus, news_fetcher, claim_text))]
    pub async fn aggregate<C: CorpusStore, N: NewsFetcher>(
        &self,
        corpus: &C,
        news_fetcher: &N,
        claim_text: &str,
        deadline: Instant,
    ) -> EvidenceBundle {
        let live_budget = budget(self.config.live_fetch_timeout, deadline);
        let corpus_budget = budget(self.config.corpus_query_timeout, deadline);

        // Four independent reads with no ordering dependency: join them so
        // latency is bounded by the slowest single query, not their sum.
        let (live, news_hits, gov_hits, social_hits) = tokio::join!(
            self.fetch_live(news_fetcher, claim_text, live_budget),
            self.query_corpus(corpus, NEWS_COLLECTION, claim_text, self.config.top_k_news, corpus_budget),
            self.query_corpus(corpus, GOV_COLLECTION, claim_text, self.config.top_k_gov, corpus_budget),
            self.query_corpus(corpus, SOCIAL_COLLECTION, claim_text, self.config.top_k_social, corpus_budget),
        );

        let mut context_parts: Vec<String> = Vec::new();
        let mut sources: Vec<EvidenceItem> = Vec::new();

        // Live items are buffered first, ahead of every indexed hit.
        for (idx, article) in live.iter().enumerate() {
            let body = article.body();
            context_parts.push(format!(
                "[LIVE NEWS {} - {}] {}\nTitle: {}\n{}\n",
                idx + 1,
                article.source,
                article.url,
                article.title,
                body,
            ));
            sources.push(normalize_article(article));
        }

        append_corpus_section(&mut context_parts, &mut sources, &news_hits, SourceType::News);
        append_corpus_section(&mut context_parts, &mut sources, &gov_hits, SourceType::Gov);
        append_corpus_section(&mut context_parts, &mut sources, &social_hits, SourceType::Social);

        debug!(
            live = live.len(),
            news = news_hits.len(),
            gov = gov_hits.len(),
            social = social_hits.len(),
            "Evidence aggregation complete"
        );

        EvidenceBundle {
            context: context_parts.join("\n"),
            sources,
        }
    }

    async fn fetch_live<N: NewsFetcher>(
        &self,
        fetcher: &N,
        topic: &str,
        time_budget: Duration,
    ) -> Vec<NewsArticle> {
        if time_budget.is_zero() {
            return Vec::new();
        }

        match timeout(time_budget, fetcher.fetch(topic, self.config.live_news_limit)).await {
            Ok(Ok(articles)) => articles,
            Ok(Err(e)) => {
                warn!(error = %e, "Live news fetch failed, continuing without it");
                Vec::new()
            }
            Err(_) => {
                warn!("Live news fetch timed out, continuing without it");
                Vec::new()
            }
        }
    }

    async fn query_corpus<C: CorpusStore>(
        &self,
        corpus: &C,
        collection: &str,
        claim_text: &str,
        top_k: u64,
        time_budget: Duration,
    ) -> Vec<CorpusHit> {
        if time_budget.is_zero() {
            return Vec::new();
        }

        match timeout(time_budget, corpus.query_similar(collection, claim_text, top_k)).await {
            Ok(Ok(hits)) => hits,
            Ok(Err(e)) => {
                warn!(collection = collection, error = %e, "Corpus query failed, skipping");
                Vec::new()
            }
            Err(_) => {
                warn!(collection = collection, "Corpus query timed out, skipping");
                Vec::new()
            }
        }
    }
}

/// Remaining time for one sub-query: its own timeout, clipped to the deadline.
fn budget(per_query: Duration, deadline: Instant) -> Duration {
    per_query.min(deadline.saturating_duration_since(Instant::now()))
}

fn append_corpus_section(
    context_parts: &mut Vec<String>,
    sources: &mut Vec<EvidenceItem>,
    hits: &[CorpusHit],
    source_type: SourceType,
) {
    let label = match source_type {
        SourceType::News => "NEWS",
        SourceType::Gov => "GOVERNMENT",
        SourceType::Social => "SOCIAL",
        SourceType::Factcheck => "FACTCHECK",
    };

    for (idx, hit) in hits.iter().enumerate() {
        let source = display_source(&hit.metadata.source, source_type);
        context_parts.push(format!(
            "[{} {} - {}] {}\n{}\n",
            label,
            idx + 1,
            source,
            hit.metadata.url,
            hit.text,
        ));
        sources.push(normalize_hit(hit, source_type));
    }
}

fn display_source(source: &str, source_type: SourceType) -> String {
    if !source.is_empty() {
        return source.to_string();
    }
    match source_type {
        SourceType::Gov => "Government".to_string(),
        SourceType::Social => "Social".to_string(),
        _ => "Unknown".to_string(),
    }
}

fn normalize_hit(hit: &CorpusHit, source_type: SourceType) -> EvidenceItem {
    let source = display_source(&hit.metadata.source, source_type);
    let rating = credibility::rate(&source, source_type);

    EvidenceItem {
        source_type,
        url: ensure_url(&hit.metadata.url, &source),
        snippet: snippet(hit.text.as_str()),
        credibility_score: rating.score,
        credibility_level: rating.level,
        is_verified_source: rating.is_verified_source,
        similarity_or_distance: Some(hit.distance),
        source,
    }
}

fn normalize_article(article: &NewsArticle) -> EvidenceItem {
    let source = display_source(&article.source, SourceType::News);
    let rating = credibility::rate(&source, SourceType::News);

    EvidenceItem {
        source_type: SourceType::News,
        url: ensure_url(&article.url, &source),
        snippet: snippet(article.body()),
        credibility_score: rating.score,
        credibility_level: rating.level,
        is_verified_source: rating.is_verified_source,
        similarity_or_distance: None,
        source,
    }
}

fn snippet(text: &str) -> String {
    if text.is_empty() {
        "No content available".to_string()
    } else {
        truncate_chars(text, SNIPPET_MAX_CHARS)
    }
}

/// Synthesizes a placeholder reference URL when a source carries none, so
/// every evidence item stays dereferenceable.
fn ensure_url(url: &str, source: &str) -> String {
    if !url.is_empty() {
        return url.to_string();
    }
    format!("https://reference.{}.com", slug(source))
}

fn slug(source: &str) -> String {
    source.to_lowercase().replace(' ', "-")
}
