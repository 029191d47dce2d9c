use std::sync::Arc;

use crate::authority::AuthorityClient;
use crate::engine::VerificationEngine;
use crate::ingest::Ingestor;
use crate::newsfeed::NewsFetcher;
use crate::vectordb::CorpusStore;

/// Shared handler state: the pipeline, the ingestor, and the admin
/// credential. Cheap to clone per request.
pub struct AppState<C, A, N>
where
    C: CorpusStore + 'static,
    A: AuthorityClient + 'static,
    N: NewsFetcher + 'static,
{
    pub engine: Arc<VerificationEngine<C, A, N>>,
    pub ingestor: Arc<Ingestor<C>>,
    pub admin_token: String,
}

impl<C, A, N> AppState<C, A, N>
where
    C: CorpusStore + 'static,
    A: AuthorityClient + 'static,
    N: NewsFetcher + 'static,
{
    pub fn new(
        engine: Arc<VerificationEngine<C, A, N>>,
        ingestor: Arc<Ingestor<C>>,
        admin_token: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            ingestor,
            admin_token: admin_token.into(),
        }
    }
}

// Manual impl: the derive would demand Clone on the generics.
impl<C, A, N> Clone for AppState<C, A, N>
where
    C: CorpusStore + 'static,
    A: AuthorityClient + 'static,
    N: NewsFetcher + 'static,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            ingestor: Arc::clone(&self.ingestor),
            admin_token: self.admin_token.clone(),
        }
    }
}
