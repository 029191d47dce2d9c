//! Multi-provider generation gateway with ordered failover.
//!
//! Backends are tried strictly in registration order (cloud providers
//! first, local Ollama last). Each backend gets a bounded retry budget
//! with exponential backoff; the first success wins and later backends
//! are never contacted. When every backend is exhausted the caller
//! receives [`GatewayError::Exhausted`] with per-backend summaries.

pub mod backends;
pub mod error;
pub mod prompt;


use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::gateway::backends::{BackendKind, GenerativeBackend};
use crate::gateway::error::{BackendError, GatewayError};

/// Whether the winning backend was a cloud provider or a local model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationalMode {
    Online,
    Offline,
}

/// Outcome of a successful gateway call.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub text: String,
    pub backend_id: String,
    pub mode: OperationalMode,
    pub latency: Duration,
}

/// Liveness of one backend, for the health report.
#[derive(Debug, Clone, Serialize)]
pub struct BackendStatus {
    pub id: String,
    pub available: bool,
}

/// Retry schedule applied per backend before falling through to the
/// next one.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per backend, including the first.
    pub max_attempts: u32,
    /// Backoff before attempt N is `base_backoff * 2^(N-1)` plus jitter.
    pub base_backoff: Duration,
    /// Wall-clock budget per backend; once spent, remaining attempts
    /// are skipped.
    pub per_backend_budget: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(500),
            per_backend_budget: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    fn backoff_before(&self, attempt: u32) -> Duration {
        let exp = self.base_backoff * 2u32.saturating_pow(attempt.saturating_sub(1));
        exp + jitter()
    }
}

/// Up to 250ms of jitter derived from the wall clock, enough to
/// de-synchronize concurrent retry loops.
fn jitter() -> Duration {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    Duration::from_millis(u64::from(nanos % 250))
}

/// Ordered collection of generative backends with failover.
pub struct ModelGateway {
    backends: Vec<Box<dyn GenerativeBackend>>,
    retry: RetryPolicy,
}

impl ModelGateway {
    pub fn new(backends: Vec<Box<dyn GenerativeBackend>>) -> Self {
        Self {
            backends,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn backend_count(&self) -> usize {
        self.backends.len()
    }

    /// Online when at least one cloud backend is registered, regardless
    /// of whether it is currently reachable.
    pub fn current_mode(&self) -> OperationalMode {
        if self.backends.iter().any(|b| b.kind() == BackendKind::Cloud) {
            OperationalMode::Online
        } else {
            OperationalMode::Offline
        }
    }

    /// Probes every backend concurrently and reports liveness in
    /// priority order.
    pub async fn availability(&self) -> Vec<BackendStatus> {
        let probes = self.backends.iter().map(|b| async {
            BackendStatus {
                id: b.id().to_string(),
                available: b.probe().await,
            }
        });
        futures_util::future::join_all(probes).await
    }

    /// Runs the prompt through the backend chain. Deterministic order,
    /// first success wins.
    pub async fn generate(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<GatewayResponse, GatewayError> {
        if self.backends.is_empty() {
            return Err(GatewayError::NoBackends);
        }

        let started = Instant::now();
        let mut errors = Vec::with_capacity(self.backends.len());

        for backend in &self.backends {
            match self.try_backend(backend.as_ref(), system, prompt).await {
                Ok(text) => {
                    let mode = match backend.kind() {
                        BackendKind::Cloud => OperationalMode::Online,
                        BackendKind::Local => OperationalMode::Offline,
                    };
                    debug!(
                        backend = backend.id(),
                        latency_ms = started.elapsed().as_millis() as u64,
                        "backend answered"
                    );
                    return Ok(GatewayResponse {
                        text,
                        backend_id: backend.id().to_string(),
                        mode,
                        latency: started.elapsed(),
                    });
                }
                Err(e) => {
                    warn!(backend = backend.id(), error = %e, "backend exhausted, falling over");
                    errors.push(format!("{}: {}", backend.id(), e));
                }
            }
        }

        Err(GatewayError::Exhausted { errors })
    }

    /// Retries one backend until success, attempt exhaustion, or the
    /// per-backend budget runs out.
    async fn try_backend(
        &self,
        backend: &dyn GenerativeBackend,
        system: &str,
        prompt: &str,
    ) -> Result<String, BackendError> {
        let budget_end = Instant::now() + self.retry.per_backend_budget;
        let mut last_error = BackendError::RequestFailed("no attempts made".to_string());

        for attempt in 1..=self.retry.max_attempts {
            if attempt > 1 {
                let backoff = self.retry.backoff_before(attempt);
                if Instant::now() + backoff >= budget_end {
                    break;
                }
                tokio::time::sleep(backoff).await;
            }

            let remaining = budget_end.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match tokio::time::timeout(remaining, backend.generate(system, prompt)).await {
                Ok(Ok(text)) => return Ok(text),
                Ok(Err(e)) => {
                    debug!(backend = backend.id(), attempt, error = %e, "attempt failed");
                    last_error = e;
                }
                Err(_) => {
                    last_error = BackendError::AttemptTimedOut(remaining);
                    break;
                }
            }
        }

        Err(last_error)
    }
}
