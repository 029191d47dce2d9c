//! Verity HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use verity::api::{AppState, create_router_with_state};
use verity::auditlog::{AuditSink, HttpAuditSink, NullAuditSink};
use verity::authority::{DEFAULT_FACTCHECK_ENDPOINT, GoogleFactCheckClient};
use verity::config::Config;
use verity::embedding::{Embedder, HttpEmbedder, StubEmbedder};
use verity::engine::{EngineConfig, VerificationEngine};
use verity::evidence::AggregatorConfig;
use verity::gateway::backends::{GenAiBackend, GenerativeBackend, OllamaBackend};
use verity::gateway::{ModelGateway, RetryPolicy};
use verity::ingest::Ingestor;
use verity::newsfeed::FeedNewsClient;
use verity::vectordb::QdrantStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
██╗   ██╗███████╗██████╗ ██╗████████╗██╗   ██╗
██║   ██║██╔════╝██╔══██╗██║╚══██╔══╝╚██╗ ██╔╝
██║   ██║█████╗  ██████╔╝██║   ██║    ╚████╔╝
╚██╗ ██╔╝██╔══╝  ██╔══██╗██║   ██║     ╚██╔╝
 ╚████╔╝ ███████╗██║  ██║██║   ██║      ██║
  ╚═══╝  ╚══════╝╚═╝  ╚═╝╚═╝   ╚═╝      ╚═╝

        CLAIM IN. VERDICT OUT.
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Verity starting"
    );

    match &config.embedder_url {
        Some(url) => {
            let embedder = HttpEmbedder::new(url.clone(), Duration::from_secs(10));
            run_server(config, embedder).await
        }
        None => {
            tracing::warn!("No VERITY_EMBEDDER_URL configured, running embedder in stub mode");
            run_server(config, StubEmbedder).await
        }
    }
}

async fn run_server<E>(config: Config, embedder: E) -> anyhow::Result<()>
where
    E: Embedder + Send + Sync + 'static,
{
    let addr: SocketAddr = config.socket_addr().parse()?;

    let corpus = Arc::new(QdrantStore::new(&config.qdrant_url, embedder)?);
    corpus.ensure_collections().await?;
    tracing::info!(url = %config.qdrant_url, "Corpus collections ready");

    let authority = GoogleFactCheckClient::new(
        config
            .factcheck_endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_FACTCHECK_ENDPOINT.to_string()),
        config.factcheck_api_key.clone(),
        Duration::from_secs(10),
    );
    if config.factcheck_api_key.is_none() {
        tracing::warn!("No VERITY_FACTCHECK_API_KEY configured, authority stage disabled");
    }

    let news = FeedNewsClient::new(config.feed_base_url.clone(), config.live_fetch_timeout);

    let mut backends: Vec<Box<dyn GenerativeBackend>> = Vec::new();
    backends.push(Box::new(GenAiBackend::new(
        "gemini",
        config.gemini_model.clone(),
    )));
    if let Some(model) = &config.openrouter_model {
        backends.push(Box::new(GenAiBackend::new("openrouter", model.clone())));
    }
    backends.push(Box::new(OllamaBackend::new(
        config.ollama_endpoint.clone(),
        config.ollama_model.clone(),
    )));

    let gateway = Arc::new(
        ModelGateway::new(backends).with_retry_policy(RetryPolicy {
            max_attempts: config.retry_attempts,
            base_backoff: Duration::from_millis(500),
            per_backend_budget: config.model_timeout,
        }),
    );

    let audit: Arc<dyn AuditSink> = match &config.audit_sink_url {
        Some(url) => Arc::new(HttpAuditSink::new(url.clone())),
        None => Arc::new(NullAuditSink),
    };

    let engine_config = EngineConfig {
        similarity_threshold: config.similarity_threshold,
        top_k_verified: config.top_k_verified,
        authority_page_size: 5,
        aggregator: AggregatorConfig {
            top_k_news: config.top_k_news,
            top_k_gov: config.top_k_gov,
            top_k_social: config.top_k_social,
            live_news_limit: config.live_news_limit,
            live_fetch_timeout: config.live_fetch_timeout,
            corpus_query_timeout: config.corpus_query_timeout,
        },
        overall_deadline: config.overall_deadline,
    };

    let engine = Arc::new(VerificationEngine::new(
        Arc::clone(&corpus),
        authority,
        news,
        gateway,
        audit,
        engine_config,
    ));
    let ingestor = Arc::new(Ingestor::new(
        Arc::clone(&corpus),
        config.feed_base_url.clone(),
    ));

    let app = create_router_with_state(AppState::new(engine, ingestor, config.admin_token.clone()));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Verity shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("VERITY_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/health", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
