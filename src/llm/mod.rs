//! Question answering over a document with a remote language model.
//!
//! Supports OpenAI-compatible chat completions APIs and Ollama.

mod client;
mod config;
mod prompt;

pub use client::{Answerer, LlmClient};
pub use config::{LlmConfig, LlmProvider};
pub use prompt::{build_prompt, prepare_context, DEFAULT_QA_PROMPT, ELISION};

/// Errors that can occur during LLM operations.
#[derive(Debug)]
pub enum LlmError {
    /// Failed to connect to LLM service
    Connection(String),
    /// API returned an error
    Api(String),
    /// Failed to parse response
    Parse(String),
    /// Provider needs an API key and none was configured
    MissingApiKey,
    /// LLM is disabled
    Disabled,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::Connection(msg) => write!(f, "Connection error: {}", msg),
            LlmError::Api(msg) => write!(f, "API error: {}", msg),
            LlmError::Parse(msg) => write!(f, "Parse error: {}", msg),
            LlmError::MissingApiKey => write!(
                f,
                "No API key configured (run `doclens key set` or set LLM_API_KEY)"
            ),
            LlmError::Disabled => write!(f, "LLM is disabled"),
        }
    }
}

impl std::error::Error for LlmError {}
