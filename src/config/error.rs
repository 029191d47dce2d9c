//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Similarity threshold must stay inside `[0, 1]`.
    #[error("invalid similarity threshold '{value}': must be between 0.0 and 1.0")]
    InvalidThreshold { value: f64 },

    /// A duration override could not be parsed as whole seconds.
    #[error("failed to parse duration '{value}' for {name}: expected whole seconds")]
    InvalidDuration { name: &'static str, value: String },

    /// A numeric limit was zero where at least one is required.
    #[error("invalid value for {name}: must be at least 1")]
    InvalidLimit { name: &'static str },
}
