//! Generative AI backend abstraction.
//!
//! The weather service only needs "send a prompt, get text and citations
//! back", so the backend sits behind a small trait and tests can swap in a
//! fake.

pub mod gemini;

pub use gemini::GeminiBackend;

use orientall_core::NetworkError;
use thiserror::Error;

use crate::types::Source;

/// Per-call generation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Let the model ground its answer with a web search.
    pub enable_search: bool,
}

impl GenerateOptions {
    pub fn with_search() -> Self {
        Self {
            enable_search: true,
        }
    }
}

/// Text produced by the backend plus any pages it cited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub citations: Vec<Source>,
}

/// Raw backend failure, before it is mapped to an error kind.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The provider answered with a non-success status.
    #[error("Provider rejected request ({status}): {message}")]
    Rejected {
        status: u16,
        /// Provider status string, e.g. `PERMISSION_DENIED`
        provider_status: Option<String>,
        /// First `details[].reason`, e.g. `API_KEY_INVALID`
        reason: Option<String>,
        message: String,
    },

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// A text generation capability.
#[async_trait::async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Run a single generation request.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the request fails or the provider rejects it.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<Generation, BackendError>;
}
