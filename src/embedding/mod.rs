//! Text embedding collaborators.
//!
//! The core pipeline never computes embeddings itself; it hands text to an
//! [`Embedder`] and receives a fixed-dimension vector. Two implementations are
//! provided: [`HttpEmbedder`] delegates to a remote embedding service, and
//! [`StubEmbedder`] derives a deterministic pseudo-embedding from a BLAKE3
//! digest for dev and test environments without a model.

pub mod error;

pub use error::EmbeddingError;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::EMBEDDING_DIM;

/// Minimal async embedding interface used by the vector store.
pub trait Embedder: Send + Sync {
    /// Embeds `text` into a vector of [`EMBEDDING_DIM`] f32 components.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// True when this embedder produces stub vectors rather than real ones.
    fn is_stub(&self) -> bool {
        false
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Embedder backed by a remote embedding service.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    url: String,
}

impl HttpEmbedder {
    /// Creates an embedder posting to `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            url: url.into(),
        }
    }
}

impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { text })
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let body: EmbedResponse =
            response
                .error_for_status()
                .map_err(|e| EmbeddingError::RequestFailed {
                    url: self.url.clone(),
                    message: e.to_string(),
                })?
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    message: e.to_string(),
                })?;

        if body.embedding.len() != EMBEDDING_DIM {
            return Err(EmbeddingError::InvalidDimension {
                expected: EMBEDDING_DIM,
                actual: body.embedding.len(),
            });
        }

        Ok(body.embedding)
    }
}

/// Deterministic hash-derived embedder for environments without a model.
///
/// Vectors are stable per input text, so similarity searches behave
/// consistently across runs, but carry no semantic meaning.
#[derive(Debug, Clone, Default)]
pub struct StubEmbedder;

impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = Vec::with_capacity(EMBEDDING_DIM);
        let mut hasher = blake3::Hasher::new();
        hasher.update(text.as_bytes());
        let mut reader = hasher.finalize_xof();

        let mut buf = [0u8; 4];
        for _ in 0..EMBEDDING_DIM {
            reader.fill(&mut buf);
            let raw = u32::from_le_bytes(buf);
            // Map to [-1, 1).
            vector.push((raw as f32 / u32::MAX as f32) * 2.0 - 1.0);
        }

        Ok(vector)
    }

    fn is_stub(&self) -> bool {
        true
    }
}
