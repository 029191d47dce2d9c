use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from a single generative backend.
pub enum BackendError {
    /// Transport or provider failure.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The backend answered with no usable text.
    #[error("empty response")]
    EmptyResponse,

    /// The backend returned a malformed body.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// One attempt exceeded its time slice.
    #[error("attempt timed out after {0:?}")]
    AttemptTimedOut(std::time::Duration),
}

#[derive(Debug, Error)]
/// Errors from the failover gateway as a whole.
pub enum GatewayError {
    /// Every configured backend exhausted its retry budget.
    #[error("all generative backends failed: {}", errors.join("; "))]
    Exhausted {
        /// Per-backend failure summaries, in priority order.
        errors: Vec<String>,
    },

    /// No backends are configured at all.
    #[error("no generative backends configured")]
    NoBackends,
}
