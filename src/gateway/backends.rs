//! Generative backend implementations behind the failover gateway.

use async_trait::async_trait;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};

use crate::gateway::error::BackendError;

/// Where a backend runs. Cloud backends put the gateway in online mode,
/// local ones keep it usable when the network is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Cloud,
    Local,
}

/// A single text-generation provider. Backends are tried in the order
/// they were registered with the gateway.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Stable identifier used in logs and responses, e.g. `"gemini"`.
    fn id(&self) -> &str;

    fn kind(&self) -> BackendKind;

    /// Runs one generation attempt. Implementations should not retry
    /// internally; the gateway owns the retry policy.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, BackendError>;

    /// Cheap liveness probe for the availability report.
    async fn probe(&self) -> bool {
        self.generate("", "Reply with the single word: pong")
            .await
            .is_ok()
    }
}

/// Cloud backend driven through the `genai` multi-provider client.
/// One instance per provider/model pair (Gemini, OpenRouter, ...).
pub struct GenAiBackend {
    id: String,
    model: String,
    client: genai::Client,
    options: ChatOptions,
}

impl GenAiBackend {
    pub fn new(id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            client: genai::Client::default(),
            options: ChatOptions::default()
                .with_temperature(0.2)
                .with_max_tokens(1024),
        }
    }
}

#[async_trait]
impl GenerativeBackend for GenAiBackend {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Cloud
    }

    async fn generate(&self, system: &str, prompt: &str) -> Result<String, BackendError> {
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        let response = self
            .client
            .exec_chat(&self.model, ChatRequest::new(messages), Some(&self.options))
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(text)
    }
}

#[derive(serde::Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(serde::Serialize)]
struct OllamaOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(serde::Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Local Ollama backend, the last resort when every cloud provider is
/// unreachable.
pub struct OllamaBackend {
    id: String,
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaBackend {
    /// Accepts either the server base URL or the full `/api/generate` URL.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let base = endpoint
            .strip_suffix("/api/generate")
            .unwrap_or(&endpoint)
            .to_string();
        Self {
            id: "ollama".to_string(),
            endpoint: base,
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl GenerativeBackend for OllamaBackend {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn generate(&self, system: &str, prompt: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            options: OllamaOptions {
                temperature: 0.2,
                num_predict: 1024,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackendError::RequestFailed(format!(
                "ollama returned {}",
                response.status()
            )));
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        let text = parsed.response.trim().to_string();
        if text.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(text)
    }

    async fn probe(&self) -> bool {
        let url = format!("{}/api/tags", self.endpoint);
        matches!(self.client.get(&url).send().await, Ok(r) if r.status().is_success())
    }
}

/// Scripted backend for tests: replays a queue of canned outcomes and
/// records how many calls it received.
#[cfg(any(test, feature = "mock"))]
pub struct ScriptedBackend {
    id: String,
    kind: BackendKind,
    outcomes: parking_lot::Mutex<std::collections::VecDeque<Result<String, String>>>,
    calls: std::sync::atomic::AtomicUsize,
    delay: Option<std::time::Duration>,
}

#[cfg(any(test, feature = "mock"))]
impl ScriptedBackend {
    pub fn new(id: impl Into<String>, kind: BackendKind) -> Self {
        Self {
            id: id.into(),
            kind,
            outcomes: parking_lot::Mutex::new(std::collections::VecDeque::new()),
            calls: std::sync::atomic::AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Makes every generation stall for `delay` before answering.
    pub fn delayed(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a successful generation result.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.outcomes.lock().push_back(Ok(text.into()));
        self
    }

    /// Queues a failed attempt.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.outcomes.lock().push_back(Err(message.into()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.outcomes.lock().pop_front();
        match outcome {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(BackendError::RequestFailed(message)),
            // Queue drained: keep failing rather than panic.
            None => Err(BackendError::RequestFailed("script exhausted".to_string())),
        }
    }
}
