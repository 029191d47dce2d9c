//! Vector similarity store.
//!
//! [`QdrantStore`] wraps the Qdrant client plus an [`Embedder`](crate::embedding::Embedder)
//! so that callers query and index corpora purely by text. The [`CorpusStore`]
//! trait is the seam the pipeline depends on; tests use [`MockCorpusStore`].

pub mod error;
pub mod model;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::VectorDbError;
pub use model::{CorpusDocument, CorpusHit, CorpusMetadata};
pub use store::QdrantStore;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockCorpusStore;

/// Minimal async corpus interface used by the pipeline.
pub trait CorpusStore: Send + Sync {
    /// Returns the `top_k` nearest documents to `text` in `collection`,
    /// ranked by embedding distance (closest first).
    fn query_similar(
        &self,
        collection: &str,
        text: &str,
        top_k: u64,
    ) -> impl std::future::Future<Output = Result<Vec<CorpusHit>, VectorDbError>> + Send;

    /// Inserts or updates documents in `collection`.
    fn upsert_documents(
        &self,
        collection: &str,
        docs: Vec<CorpusDocument>,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;
}

impl<C: CorpusStore> CorpusStore for std::sync::Arc<C> {
    fn query_similar(
        &self,
        collection: &str,
        text: &str,
        top_k: u64,
    ) -> impl std::future::Future<Output = Result<Vec<CorpusHit>, VectorDbError>> + Send {
        (**self).query_similar(collection, text, top_k)
    }

    fn upsert_documents(
        &self,
        collection: &str,
        docs: Vec<CorpusDocument>,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send {
        (**self).upsert_documents(collection, docs)
    }
}
