use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::point_id::PointIdOptions;
use serde::{Deserialize, Serialize};

/// Payload fields stored alongside each corpus vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusMetadata {
    /// Publishing source name.
    pub source: String,
    /// Canonical URL, may be empty.
    pub url: String,
    /// Stored verdict string, present only on `verified_claims` documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
    /// Stored explanation, present only on `verified_claims` documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A document to be indexed into a corpus collection.
#[derive(Debug, Clone)]
pub struct CorpusDocument {
    /// Stable external id; hashed to a point id on upsert.
    pub id: String,
    /// Text body that gets embedded.
    pub text: String,
    pub metadata: CorpusMetadata,
}

/// One ranked similarity hit from a corpus collection.
#[derive(Debug, Clone)]
pub struct CorpusHit {
    pub id: u64,
    pub text: String,
    pub metadata: CorpusMetadata,
    /// Embedding distance. Lower is closer; `similarity = 1 - distance`.
    pub distance: f64,
}

impl CorpusHit {
    /// Converts a Qdrant scored point into a hit.
    ///
    /// Qdrant reports cosine similarity (higher is better); the pipeline works
    /// in distance space, so the score is inverted here.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n,
            _ => return None,
        };

        let payload = point.payload;

        let text = payload
            .get("text")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let source = payload
            .get("source")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let url = payload
            .get("url")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let verdict = payload
            .get("verdict")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let explanation = payload
            .get("explanation")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Some(CorpusHit {
            id,
            text,
            metadata: CorpusMetadata {
                source,
                url,
                verdict,
                explanation,
            },
            distance: 1.0 - point.score as f64,
        })
    }

    /// Similarity of this hit, `1 - distance`.
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}
