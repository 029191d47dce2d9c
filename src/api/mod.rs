//! HTTP surface (Axum).

pub mod error;
pub mod handlers;
pub mod state;


use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

use crate::authority::AuthorityClient;
use crate::newsfeed::NewsFetcher;
use crate::vectordb::CorpusStore;

pub fn create_router_with_state<C, A, N>(state: AppState<C, A, N>) -> Router
where
    C: CorpusStore + 'static,
    A: AuthorityClient + 'static,
    N: NewsFetcher + 'static,
{
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/verify", post(handlers::verify_handler))
        .route("/admin/ingest", post(handlers::ingest_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
