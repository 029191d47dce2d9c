//! Live news fetch collaborator.
//!
//! Pulls fresh articles from the feed server for a claim topic. Strictly
//! best-effort: the aggregator runs it under a short timeout and an empty
//! result is perfectly normal.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
/// Errors from the live news fetcher.
pub enum NewsfeedError {
    /// Transport-level failure.
    #[error("news fetch from '{url}' failed: {message}")]
    RequestFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The feed returned a malformed body.
    #[error("invalid news feed response: {0}")]
    InvalidResponse(String),
}

/// One article as returned by the feed server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
}

impl NewsArticle {
    /// Body text, preferring full text over the description.
    pub fn body(&self) -> &str {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.description.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
struct FeedItems {
    #[serde(default)]
    items: Vec<NewsArticle>,
}

/// Async live-fetch interface used by the evidence aggregator.
pub trait NewsFetcher: Send + Sync {
    fn fetch(
        &self,
        topic: &str,
        limit: u64,
    ) -> impl std::future::Future<Output = Result<Vec<NewsArticle>, NewsfeedError>> + Send;
}

/// Client for the feed server's `news.get_latest` tool endpoint.
#[derive(Debug, Clone)]
pub struct FeedNewsClient {
    client: reqwest::Client,
    base_url: String,
}

impl FeedNewsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl NewsFetcher for FeedNewsClient {
    #[instrument(skip(self, topic))]
    async fn fetch(&self, topic: &str, limit: u64) -> Result<Vec<NewsArticle>, NewsfeedError> {
        let url = format!("{}/tools/news.get_latest", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("topic", topic), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(|e| NewsfeedError::RequestFailed {
                url: url.clone(),
                message: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| NewsfeedError::RequestFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let body: FeedItems = response
            .json()
            .await
            .map_err(|e| NewsfeedError::InvalidResponse(e.to_string()))?;

        Ok(body.items)
    }
}

/// Scripted news fetcher for tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Default)]
pub struct MockNewsFetcher {
    articles: Vec<NewsArticle>,
    fail: bool,
}

#[cfg(any(test, feature = "mock"))]
impl MockNewsFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: Vec<NewsArticle>) -> Self {
        Self {
            articles,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            articles: Vec::new(),
            fail: true,
        }
    }
}

#[cfg(any(test, feature = "mock"))]
impl NewsFetcher for MockNewsFetcher {
    async fn fetch(&self, _topic: &str, limit: u64) -> Result<Vec<NewsArticle>, NewsfeedError> {
        if self.fail {
            return Err(NewsfeedError::InvalidResponse("mock failure".to_string()));
        }
        let mut articles = self.articles.clone();
        articles.truncate(limit as usize);
        Ok(articles)
    }
}
