//! Crate-wide constants shared across modules.

/// Collection holding previously adjudicated claims (the semantic cache).
pub const VERIFIED_CLAIMS_COLLECTION: &str = "verified_claims";

/// Indexed news article corpus.
pub const NEWS_COLLECTION: &str = "news_articles";

/// Indexed government bulletin corpus.
pub const GOV_COLLECTION: &str = "gov_bulletins";

/// Indexed social media sample corpus.
pub const SOCIAL_COLLECTION: &str = "social_posts";

/// All corpus collections, in ensure-order.
pub const ALL_COLLECTIONS: [&str; 4] = [
    VERIFIED_CLAIMS_COLLECTION,
    NEWS_COLLECTION,
    GOV_COLLECTION,
    SOCIAL_COLLECTION,
];

/// Embedding dimension used for all collections.
///
/// Matches the stub embedder output and the default remote embedding model.
pub const EMBEDDING_DIM: usize = 384;

/// Maximum snippet length carried on an evidence item, in characters.
pub const SNIPPET_MAX_CHARS: usize = 500;

/// Maximum number of source lines extracted from a model answer.
pub const MAX_SOURCES_MENTIONED: usize = 5;

/// Default similarity gate for the semantic cache.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.65;

/// Default per-corpus result caps. Deliberately large so a single claim check
/// sweeps the full breadth of indexed coverage.
pub const DEFAULT_TOP_K_VERIFIED: u64 = 5;
pub const DEFAULT_TOP_K_NEWS: u64 = 50;
pub const DEFAULT_TOP_K_GOV: u64 = 20;
pub const DEFAULT_TOP_K_SOCIAL: u64 = 15;

/// Default number of live news articles fetched per claim.
pub const DEFAULT_LIVE_NEWS_LIMIT: u64 = 5;
