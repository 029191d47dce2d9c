use std::collections::BTreeMap;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::authority::AuthorityClient;
use crate::claim::{Category, Claim, VerificationMode};
use crate::gateway::OperationalMode;
use crate::ingest::IngestReport;
use crate::newsfeed::NewsFetcher;
use crate::vectordb::CorpusStore;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mode: OperationalMode,
    pub models: BTreeMap<String, &'static str>,
}

/// `POST /verify` — runs the full pipeline for one claim.
#[instrument(skip(state, headers, request))]
pub async fn verify_handler<C, A, N>(
    State(state): State<AppState<C, A, N>>,
    headers: HeaderMap,
    Json(request): Json<VerifyRequest>,
) -> Result<Response, ApiError>
where
    C: CorpusStore + 'static,
    A: AuthorityClient + 'static,
    N: NewsFetcher + 'static,
{
    let text = request.text.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::InvalidRequest("claim text is empty".to_string()));
    }

    // Pseudonymous fallback: callers without an id are tracked by the
    // hash of what they asked, never by who they are.
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| text.clone());

    let claim = Claim {
        language: request.language.unwrap_or_else(|| "en".to_string()),
        category: request.category,
        text,
    };

    let result = state.engine.check_claim(&claim, &user_id).await;

    let status = if result.mode == VerificationMode::Error {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    Ok((status, Json(result)).into_response())
}

/// `POST /admin/ingest` — triggers one ingestion cycle.
#[instrument(skip(state, headers))]
pub async fn ingest_handler<C, A, N>(
    State(state): State<AppState<C, A, N>>,
    headers: HeaderMap,
) -> Result<Json<IngestReport>, ApiError>
where
    C: CorpusStore + 'static,
    A: AuthorityClient + 'static,
    N: NewsFetcher + 'static,
{
    let presented = headers
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if presented != state.admin_token {
        return Err(ApiError::Unauthorized);
    }

    Ok(Json(state.ingestor.run().await))
}

/// `GET /health` — gateway mode plus per-backend liveness.
#[instrument(skip(state))]
pub async fn health_handler<C, A, N>(
    State(state): State<AppState<C, A, N>>,
) -> Json<HealthResponse>
where
    C: CorpusStore + 'static,
    A: AuthorityClient + 'static,
    N: NewsFetcher + 'static,
{
    let gateway = state.engine.gateway();
    let statuses = gateway.availability().await;

    let any_up = statuses.iter().any(|s| s.available);
    let models = statuses
        .into_iter()
        .map(|s| (s.id, if s.available { "ok" } else { "down" }))
        .collect();

    Json(HealthResponse {
        status: if any_up { "ok" } else { "degraded" },
        mode: gateway.current_mode(),
        models,
    })
}
