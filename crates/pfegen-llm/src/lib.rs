//! pfegen LLM Provider Layer
//!
//! Conversational text-generation backends behind a common interface.
//!
//! # Architecture
//!
//! A [`ChatProvider`] opens [`ChatSession`]s. A session is configured once
//! (model, temperature, system instruction) and then accepts any number of
//! sequential turns, keeping prior turns as context. Callers never see the
//! history itself.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted mock for testing
//! - `GeminiProvider`: Google Gemini REST API
//!
//! # Examples
//!
//! ```
//! use pfegen_llm::{ChatProvider, ChatSession, MockProvider, SessionConfig};
//!
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let session = provider.open_session(&SessionConfig::new("mock", 0.5, "Be brief."));
//! let reply = session.send_message("hi").await.unwrap();
//! assert_eq!(reply.as_deref(), Some("Hello from LLM!"));
//! # });
//! ```

#![warn(missing_docs)]

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiProvider;
pub use mock::MockProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// API key missing, invalid or not allowed
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Quota or rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Any other error reported by the service
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
    },
}

/// Session-level settings, fixed when the session is opened
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Model identifier understood by the provider
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// System instruction applied to every turn
    pub system_instruction: String,
}

impl SessionConfig {
    /// Create a session configuration
    pub fn new(
        model: impl Into<String>,
        temperature: f32,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            temperature,
            system_instruction: system_instruction.into(),
        }
    }
}

/// A stateful conversation with a model.
///
/// Turns must be sent one at a time; the session keeps the order in which
/// they completed. A turn that fails leaves the history as it was.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Send one user turn and return the model's text, if it produced any
    async fn send_message(&self, message: &str) -> Result<Option<String>, LlmError>;
}

/// Factory for conversation sessions
pub trait ChatProvider: Send + Sync {
    /// Session type produced by this provider
    type Session: ChatSession + 'static;

    /// Open a new session. Creation is local; no request is sent until the first turn.
    fn open_session(&self, config: &SessionConfig) -> Self::Session;
}
