//! # Error Types Module
//!
//! Typed errors for broken startup configuration, failed deliveries through
//! the chat transport and conversation state storage.

/// Startup configuration errors. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while delivering a message through the transport
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The Telegram Bot API rejected or failed the request
    #[error("Telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),

    /// Delivery failed for a reason outside the Bot API client
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Errors from the conversation state store
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("In-memory dialogue storage failed: {0}")]
    InMemory(#[from] teloxide::dispatching::dialogue::InMemStorageError),
}
