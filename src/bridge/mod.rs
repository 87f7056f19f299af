//! Bridge to the language-model provider
//!
//! The engine only sees the [`ModelCaller`] trait; `chat` provides the HTTP
//! implementation for OpenAI-compatible chat-completions endpoints.

use std::fmt;

use async_trait::async_trait;

pub mod chat;

pub use chat::ChatBridge;

/// Failures a model call can report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid credential")]
    AuthFailure,

    #[error("Model provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Model call timed out")]
    Timeout,
}

/// Opaque provider credential, scoped to a single run.
///
/// Not `Clone` and never printed.
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// A request/response call into a language model
#[async_trait]
pub trait ModelCaller: Send + Sync {
    /// Send one prompt and return the model's raw text
    async fn invoke(&self, prompt: &str, credential: &Credential) -> Result<String, ModelError>;
}

#[async_trait]
impl<T: ModelCaller + ?Sized> ModelCaller for std::sync::Arc<T> {
    async fn invoke(&self, prompt: &str, credential: &Credential) -> Result<String, ModelError> {
        (**self).invoke(prompt, credential).await
    }
}
