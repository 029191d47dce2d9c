use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use std::collections::HashMap;
use tracing::instrument;

use super::CorpusStore;
use super::error::VectorDbError;
use super::model::{CorpusDocument, CorpusHit};
use crate::constants::{ALL_COLLECTIONS, EMBEDDING_DIM};
use crate::embedding::Embedder;
use crate::hashing::hash_to_u64;

/// Qdrant-backed corpus store.
///
/// Holds the embedding collaborator so callers work purely in text space; the
/// orchestrator never sees a vector.
#[derive(Clone)]
pub struct QdrantStore<E: Embedder> {
    client: Qdrant,
    embedder: E,
    url: String,
}

impl<E: Embedder> QdrantStore<E> {
    /// Creates a store for `url`.
    pub fn new(url: &str, embedder: E) -> Result<Self, VectorDbError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            embedder,
            url: url.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns `true` when the backing embedder runs in stub mode.
    pub fn is_embedder_stub(&self) -> bool {
        self.embedder.is_stub()
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Ensures all corpus collections exist (creates missing ones).
    pub async fn ensure_collections(&self) -> Result<(), VectorDbError> {
        for name in ALL_COLLECTIONS {
            let exists = self.client.collection_exists(name).await.map_err(|e| {
                VectorDbError::CreateCollectionFailed {
                    collection: name.to_string(),
                    message: e.to_string(),
                }
            })?;

            if !exists {
                let vectors_config =
                    VectorParamsBuilder::new(EMBEDDING_DIM as u64, Distance::Cosine);
                self.client
                    .create_collection(
                        CreateCollectionBuilder::new(name)
                            .vectors_config(vectors_config)
                            .on_disk_payload(true),
                    )
                    .await
                    .map_err(|e| VectorDbError::CreateCollectionFailed {
                        collection: name.to_string(),
                        message: e.to_string(),
                    })?;
            }
        }

        Ok(())
    }
}

impl<E: Embedder> CorpusStore for QdrantStore<E> {
    #[instrument(skip(self, text), fields(collection = collection, top_k = top_k))]
    async fn query_similar(
        &self,
        collection: &str,
        text: &str,
        top_k: u64,
    ) -> Result<Vec<CorpusHit>, VectorDbError> {
        let vector = self.embedder.embed(text).await?;

        let search = SearchPointsBuilder::new(collection, vector, top_k).with_payload(true);

        let response =
            self.client
                .search_points(search)
                .await
                .map_err(|e| VectorDbError::SearchFailed {
                    collection: collection.to_string(),
                    message: e.to_string(),
                })?;

        Ok(response
            .result
            .into_iter()
            .filter_map(CorpusHit::from_scored_point)
            .collect())
    }

    #[instrument(skip(self, docs), fields(collection = collection, count = docs.len()))]
    async fn upsert_documents(
        &self,
        collection: &str,
        docs: Vec<CorpusDocument>,
    ) -> Result<(), VectorDbError> {
        if docs.is_empty() {
            return Ok(());
        }

        let mut points = Vec::with_capacity(docs.len());
        for doc in docs {
            let vector = self.embedder.embed(&doc.text).await?;

            let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
            payload.insert("text".to_string(), doc.text.into());
            payload.insert("source".to_string(), doc.metadata.source.into());
            payload.insert("url".to_string(), doc.metadata.url.into());
            if let Some(verdict) = doc.metadata.verdict {
                payload.insert("verdict".to_string(), verdict.into());
            }
            if let Some(explanation) = doc.metadata.explanation {
                payload.insert("explanation".to_string(), explanation.into());
            }

            points.push(PointStruct::new(
                hash_to_u64(doc.id.as_bytes()),
                vector,
                payload,
            ));
        }

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}
