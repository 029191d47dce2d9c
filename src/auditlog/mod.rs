//! Best-effort audit trail for completed verifications.
//!
//! Audit writes never block or fail a verification; the engine spawns
//! them fire-and-forget and a sink failure is only logged.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::claim::{Verdict, VerificationMode};
use crate::hashing::user_hash;

/// One completed verification, flattened for the audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub id: uuid::Uuid,
    pub claim_text: String,
    pub verdict: Verdict,
    pub confidence: f64,
    pub mode: VerificationMode,
    /// Backend that produced the answer, when reasoning ran.
    pub backend_used: Option<String>,
    pub latency_ms: u64,
    /// Pseudonymous requester id; never the raw user identity.
    pub user_hash: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        claim_text: impl Into<String>,
        verdict: Verdict,
        confidence: f64,
        mode: VerificationMode,
        backend_used: Option<String>,
        latency_ms: u64,
        user_id: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            claim_text: claim_text.into(),
            verdict,
            confidence,
            mode,
            backend_used,
            latency_ms,
            user_hash: user_hash(user_id),
            timestamp: Utc::now(),
        }
    }
}

/// Destination for audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn log(&self, record: AuditRecord);
}

/// Ships records to an external collector over HTTP. Failures are
/// swallowed after a warning.
pub struct HttpAuditSink {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpAuditSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(3))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl AuditSink for HttpAuditSink {
    async fn log(&self, record: AuditRecord) {
        let result = self.client.post(&self.endpoint).json(&record).send().await;
        match result {
            Ok(response) if !response.status().is_success() => {
                warn!(status = %response.status(), "audit collector rejected record");
            }
            Err(e) => warn!(error = %e, "audit record delivery failed"),
            Ok(_) => {}
        }
    }
}

/// Discards records. Used when no collector is configured.
pub struct NullAuditSink;

#[async_trait]
impl AuditSink for NullAuditSink {
    async fn log(&self, _record: AuditRecord) {}
}

/// In-memory sink for tests.
#[cfg(any(test, feature = "mock"))]
pub struct MemoryAuditSink {
    records: parking_lot::RwLock<Vec<AuditRecord>>,
}

#[cfg(any(test, feature = "mock"))]
impl MemoryAuditSink {
    pub fn new() -> Self {
        Self {
            records: parking_lot::RwLock::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().clone()
    }
}

#[cfg(any(test, feature = "mock"))]
impl Default for MemoryAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn log(&self, record: AuditRecord) {
        self.records.write().push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_sink_captures_records() {
        let sink = MemoryAuditSink::new();
        sink.log(AuditRecord::new(
            "the moon is made of cheese",
            Verdict::False,
            0.9,
            VerificationMode::Reasoned,
            Some("gemini".to_string()),
            1200,
            "guest",
        ))
        .await;

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_hash.len(), 16);
        assert_eq!(records[0].backend_used.as_deref(), Some("gemini"));
    }

    #[test]
    fn record_serializes_with_uuid_and_timestamp() {
        let record = AuditRecord::new(
            "garlic cures covid",
            Verdict::False,
            0.82,
            VerificationMode::Reasoned,
            None,
            450,
            "guest",
        );

        let json = serde_json::to_value(&record).unwrap();
        let id = json["id"].as_str().unwrap();
        assert_eq!(id, record.id.to_string());
        assert!(json["timestamp"].is_string());
        assert!(json["backend_used"].is_null());
        assert_eq!(json["latency_ms"], 450);
    }
}
