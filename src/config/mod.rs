//! Environment-backed configuration.
//!
//! Every setting has a default suitable for local development. Override
//! with `VERITY_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_LIVE_NEWS_LIMIT, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K_GOV, DEFAULT_TOP_K_NEWS,
    DEFAULT_TOP_K_SOCIAL, DEFAULT_TOP_K_VERIFIED,
};

/// Default Qdrant URL used when `VERITY_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default feed server base URL.
pub const DEFAULT_FEED_BASE_URL: &str = "http://localhost:3333";

/// Default local Ollama generate endpoint.
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Admin token accepted when none is configured. Fine for local
/// development, replace in any shared deployment.
pub const DEV_ADMIN_TOKEN: &str = "verity-dev-admin";

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `VERITY_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Embedding service URL. When absent the deterministic stub
    /// embedder is used instead.
    pub embedder_url: Option<String>,

    /// Feed server base URL. Default: `http://localhost:3333`.
    pub feed_base_url: String,

    /// Google Fact Check Tools API key; the authority stage is skipped
    /// when absent.
    pub factcheck_api_key: Option<String>,

    /// Fact-check API endpoint override, mainly for tests.
    pub factcheck_endpoint: Option<String>,

    /// Primary cloud model. Default: `gemini-2.0-flash`.
    pub gemini_model: String,

    /// Secondary cloud model routed through OpenRouter; disabled when
    /// absent.
    pub openrouter_model: Option<String>,

    /// Ollama generate endpoint. Default: `http://localhost:11434/api/generate`.
    pub ollama_endpoint: String,

    /// Ollama model name. Default: `mistral`.
    pub ollama_model: String,

    /// Semantic cache similarity gate. Default: `0.65`.
    pub similarity_threshold: f64,

    /// Top-k for the verified-claims cache query. Default: `5`.
    pub top_k_verified: u64,

    /// Top-k for the news corpus. Default: `50`.
    pub top_k_news: u64,

    /// Top-k for the government corpus. Default: `20`.
    pub top_k_gov: u64,

    /// Top-k for the social corpus. Default: `15`.
    pub top_k_social: u64,

    /// Live news articles fetched per claim. Default: `5`.
    pub live_news_limit: u64,

    /// Retry attempts per generative backend. Default: `3`.
    pub retry_attempts: u32,

    /// Wall-clock budget per generative backend. Default: `30s`.
    pub model_timeout: Duration,

    /// Budget for the live news fetch. Default: `5s`.
    pub live_fetch_timeout: Duration,

    /// Budget per corpus similarity query. Default: `10s`.
    pub corpus_query_timeout: Duration,

    /// Budget for one whole verification. Default: `60s`.
    pub overall_deadline: Duration,

    /// Token required by `/admin/ingest`.
    pub admin_token: String,

    /// Audit collector URL; records are dropped when absent.
    pub audit_sink_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            embedder_url: None,
            feed_base_url: DEFAULT_FEED_BASE_URL.to_string(),
            factcheck_api_key: None,
            factcheck_endpoint: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            openrouter_model: None,
            ollama_endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            ollama_model: "mistral".to_string(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            top_k_verified: DEFAULT_TOP_K_VERIFIED,
            top_k_news: DEFAULT_TOP_K_NEWS,
            top_k_gov: DEFAULT_TOP_K_GOV,
            top_k_social: DEFAULT_TOP_K_SOCIAL,
            live_news_limit: DEFAULT_LIVE_NEWS_LIMIT,
            retry_attempts: 3,
            model_timeout: Duration::from_secs(30),
            live_fetch_timeout: Duration::from_secs(5),
            corpus_query_timeout: Duration::from_secs(10),
            overall_deadline: Duration::from_secs(60),
            admin_token: DEV_ADMIN_TOKEN.to_string(),
            audit_sink_url: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "VERITY_PORT";
    const ENV_BIND_ADDR: &'static str = "VERITY_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "VERITY_QDRANT_URL";
    const ENV_EMBEDDER_URL: &'static str = "VERITY_EMBEDDER_URL";
    const ENV_FEED_BASE_URL: &'static str = "VERITY_FEED_BASE_URL";
    const ENV_FACTCHECK_API_KEY: &'static str = "VERITY_FACTCHECK_API_KEY";
    const ENV_FACTCHECK_ENDPOINT: &'static str = "VERITY_FACTCHECK_ENDPOINT";
    const ENV_GEMINI_MODEL: &'static str = "VERITY_GEMINI_MODEL";
    const ENV_OPENROUTER_MODEL: &'static str = "VERITY_OPENROUTER_MODEL";
    const ENV_OLLAMA_ENDPOINT: &'static str = "VERITY_OLLAMA_ENDPOINT";
    const ENV_OLLAMA_MODEL: &'static str = "VERITY_OLLAMA_MODEL";
    const ENV_SIMILARITY_THRESHOLD: &'static str = "VERITY_SIMILARITY_THRESHOLD";
    const ENV_TOP_K_VERIFIED: &'static str = "VERITY_TOP_K_VERIFIED";
    const ENV_TOP_K_NEWS: &'static str = "VERITY_TOP_K_NEWS";
    const ENV_TOP_K_GOV: &'static str = "VERITY_TOP_K_GOV";
    const ENV_TOP_K_SOCIAL: &'static str = "VERITY_TOP_K_SOCIAL";
    const ENV_LIVE_NEWS_LIMIT: &'static str = "VERITY_LIVE_NEWS_LIMIT";
    const ENV_RETRY_ATTEMPTS: &'static str = "VERITY_RETRY_ATTEMPTS";
    const ENV_MODEL_TIMEOUT_SECS: &'static str = "VERITY_MODEL_TIMEOUT_SECS";
    const ENV_LIVE_FETCH_TIMEOUT_SECS: &'static str = "VERITY_LIVE_FETCH_TIMEOUT_SECS";
    const ENV_CORPUS_QUERY_TIMEOUT_SECS: &'static str = "VERITY_CORPUS_QUERY_TIMEOUT_SECS";
    const ENV_OVERALL_DEADLINE_SECS: &'static str = "VERITY_OVERALL_DEADLINE_SECS";
    const ENV_ADMIN_TOKEN: &'static str = "VERITY_ADMIN_TOKEN";
    const ENV_AUDIT_SINK_URL: &'static str = "VERITY_AUDIT_SINK_URL";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            port: Self::parse_port_from_env(defaults.port)?,
            bind_addr: Self::parse_bind_addr_from_env(defaults.bind_addr)?,
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            embedder_url: Self::parse_optional_string_from_env(Self::ENV_EMBEDDER_URL),
            feed_base_url: Self::parse_string_from_env(
                Self::ENV_FEED_BASE_URL,
                defaults.feed_base_url,
            ),
            factcheck_api_key: Self::parse_optional_string_from_env(Self::ENV_FACTCHECK_API_KEY),
            factcheck_endpoint: Self::parse_optional_string_from_env(Self::ENV_FACTCHECK_ENDPOINT),
            gemini_model: Self::parse_string_from_env(
                Self::ENV_GEMINI_MODEL,
                defaults.gemini_model,
            ),
            openrouter_model: Self::parse_optional_string_from_env(Self::ENV_OPENROUTER_MODEL),
            ollama_endpoint: Self::parse_string_from_env(
                Self::ENV_OLLAMA_ENDPOINT,
                defaults.ollama_endpoint,
            ),
            ollama_model: Self::parse_string_from_env(
                Self::ENV_OLLAMA_MODEL,
                defaults.ollama_model,
            ),
            similarity_threshold: Self::parse_f64_from_env(
                Self::ENV_SIMILARITY_THRESHOLD,
                defaults.similarity_threshold,
            ),
            top_k_verified: Self::parse_u64_from_env(
                Self::ENV_TOP_K_VERIFIED,
                defaults.top_k_verified,
            ),
            top_k_news: Self::parse_u64_from_env(Self::ENV_TOP_K_NEWS, defaults.top_k_news),
            top_k_gov: Self::parse_u64_from_env(Self::ENV_TOP_K_GOV, defaults.top_k_gov),
            top_k_social: Self::parse_u64_from_env(Self::ENV_TOP_K_SOCIAL, defaults.top_k_social),
            live_news_limit: Self::parse_u64_from_env(
                Self::ENV_LIVE_NEWS_LIMIT,
                defaults.live_news_limit,
            ),
            retry_attempts: Self::parse_u64_from_env(
                Self::ENV_RETRY_ATTEMPTS,
                u64::from(defaults.retry_attempts),
            ) as u32,
            model_timeout: Self::parse_secs_from_env(
                Self::ENV_MODEL_TIMEOUT_SECS,
                defaults.model_timeout,
            )?,
            live_fetch_timeout: Self::parse_secs_from_env(
                Self::ENV_LIVE_FETCH_TIMEOUT_SECS,
                defaults.live_fetch_timeout,
            )?,
            corpus_query_timeout: Self::parse_secs_from_env(
                Self::ENV_CORPUS_QUERY_TIMEOUT_SECS,
                defaults.corpus_query_timeout,
            )?,
            overall_deadline: Self::parse_secs_from_env(
                Self::ENV_OVERALL_DEADLINE_SECS,
                defaults.overall_deadline,
            )?,
            admin_token: Self::parse_string_from_env(Self::ENV_ADMIN_TOKEN, defaults.admin_token),
            audit_sink_url: Self::parse_optional_string_from_env(Self::ENV_AUDIT_SINK_URL),
        })
    }

    /// Validates ranges and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.similarity_threshold,
            });
        }
        if self.top_k_verified == 0 {
            return Err(ConfigError::InvalidLimit {
                name: "top_k_verified",
            });
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::InvalidLimit {
                name: "retry_attempts",
            });
        }
        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_f64_from_env(var_name: &str, default: f64) -> f64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_secs_from_env(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidDuration {
                    name: var_name,
                    value,
                }),
            Err(_) => Ok(default),
        }
    }
}
