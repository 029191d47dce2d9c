//! Verity library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by pipeline stage:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Service configuration
//! - [`Claim`], [`Verdict`], [`VerificationResult`], [`EvidenceItem`] - Data model
//! - [`VerificationEngine`], [`EngineConfig`] - The orchestrated pipeline
//!
//! ## Pipeline Stages
//! - [`SemanticCacheResolver`] - Stage 1, similarity lookup over verified claims
//! - [`GoogleFactCheckClient`] - Stage 2, external fact-check authority
//! - [`EvidenceAggregator`] - Stage 3, concurrent multi-corpus evidence fan-out
//! - [`ModelGateway`] - Stage 4, multi-provider generation with failover
//! - [`parse_model_answer`] - Stage 5, tolerant verdict extraction
//!
//! ## Infrastructure
//! - [`QdrantStore`] - Vector similarity store over the four corpora
//! - [`HttpEmbedder`], [`StubEmbedder`] - Text embedding
//! - [`Ingestor`] - Feed-to-corpus indexing
//! - [`AuditSink`] impls - Best-effort verification audit trail
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod api;
pub mod auditlog;
pub mod authority;
pub mod cache;
pub mod claim;
pub mod config;
pub mod constants;
pub mod credibility;
pub mod embedding;
pub mod engine;
pub mod evidence;
pub mod gateway;
pub mod hashing;
pub mod ingest;
pub mod newsfeed;
pub mod parser;
pub mod vectordb;

pub use api::{ApiError, AppState, create_router_with_state};
pub use auditlog::{AuditRecord, AuditSink, HttpAuditSink, NullAuditSink};
#[cfg(any(test, feature = "mock"))]
pub use auditlog::MemoryAuditSink;
pub use authority::{AuthorityClient, GoogleFactCheckClient, NormalizedFactCheck, normalize_verdict};
#[cfg(any(test, feature = "mock"))]
pub use authority::MockAuthorityClient;
pub use cache::SemanticCacheResolver;
pub use claim::{
    Category, Claim, CredibilityLevel, EvidenceItem, SourceType, Verdict, VerificationMode,
    VerificationResult,
};
pub use config::{Config, ConfigError};
pub use credibility::{CredibilityRating, rate};
pub use embedding::{Embedder, EmbeddingError, HttpEmbedder, StubEmbedder};
pub use engine::{EngineConfig, VerificationEngine};
pub use evidence::{AggregatorConfig, EvidenceAggregator, EvidenceBundle};
pub use gateway::backends::{GenAiBackend, GenerativeBackend, OllamaBackend};
#[cfg(any(test, feature = "mock"))]
pub use gateway::backends::ScriptedBackend;
pub use gateway::{GatewayResponse, ModelGateway, OperationalMode, RetryPolicy};
pub use hashing::{content_hash, hash_to_u64, user_hash};
pub use ingest::{IngestReport, Ingestor};
pub use newsfeed::{FeedNewsClient, NewsArticle, NewsFetcher};
#[cfg(any(test, feature = "mock"))]
pub use newsfeed::MockNewsFetcher;
pub use parser::{ParsedVerdict, contradiction_score, parse_model_answer};
pub use vectordb::{CorpusDocument, CorpusHit, CorpusMetadata, CorpusStore, QdrantStore, VectorDbError};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockCorpusStore;
