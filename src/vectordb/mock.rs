use parking_lot::RwLock;
use std::collections::HashMap;

use super::CorpusStore;
use super::error::VectorDbError;
use super::model::{CorpusDocument, CorpusHit};

/// In-memory corpus store with canned hits, for tests.
///
/// Hits are returned in insertion order, truncated to `top_k`. Upserts are
/// recorded so ingestion tests can assert on what was written.
#[derive(Default)]
pub struct MockCorpusStore {
    hits: RwLock<HashMap<String, Vec<CorpusHit>>>,
    upserts: RwLock<HashMap<String, Vec<CorpusDocument>>>,
    fail_queries: RwLock<bool>,
}

impl MockCorpusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds canned hits for a collection.
    pub fn with_hits(self, collection: &str, hits: Vec<CorpusHit>) -> Self {
        self.hits.write().insert(collection.to_string(), hits);
        self
    }

    /// Makes every subsequent query fail, for soft-miss policy tests.
    pub fn fail_queries(self) -> Self {
        *self.fail_queries.write() = true;
        self
    }

    /// Returns the documents upserted into a collection so far.
    pub fn upserted(&self, collection: &str) -> Vec<CorpusDocument> {
        self.upserts
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

impl CorpusStore for MockCorpusStore {
    async fn query_similar(
        &self,
        collection: &str,
        _text: &str,
        top_k: u64,
    ) -> Result<Vec<CorpusHit>, VectorDbError> {
        if *self.fail_queries.read() {
            return Err(VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: "mock failure".to_string(),
            });
        }

        let hits = self.hits.read();
        let mut results = hits.get(collection).cloned().unwrap_or_default();
        results.truncate(top_k as usize);
        Ok(results)
    }

    async fn upsert_documents(
        &self,
        collection: &str,
        docs: Vec<CorpusDocument>,
    ) -> Result<(), VectorDbError> {
        self.upserts
            .write()
            .entry(collection.to_string())
            .or_default()
            .extend(docs);
        Ok(())
    }
}
