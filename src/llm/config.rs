//! Language-model configuration.
//!
//! File settings are merged with device settings from the environment:
//! - `LLM_ENABLED`: "true" or "false"
//! - `LLM_PROVIDER`: "openai" (default), "groq", "together" or "ollama"
//! - `LLM_ENDPOINT`: API base URL (provider default otherwise)
//! - `LLM_MODEL`: model name
//! - `LLM_MAX_TOKENS`, `LLM_TEMPERATURE`
//! - `OLLAMA_HOST`: Ollama base URL when no endpoint is set
//!
//! API keys are never stored here; see [`crate::credentials`].

use serde::{Deserialize, Serialize};

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI-compatible chat completions API (OpenAI, Groq, Together.ai, etc.)
    #[default]
    OpenAI,
    /// Ollama API (local)
    Ollama,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com",
            Self::Ollama => "http://localhost:11434",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-3.5-turbo",
            Self::Ollama => "llama3.2",
        }
    }

    /// Whether requests need an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI)
    }
}

/// Configuration for the question-answering client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether AI mode is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub provider: LlmProvider,
    /// API base URL (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Model name (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Documents longer than this many characters are cut down before sending
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
    /// Characters kept from each end of a cut-down document
    #[serde(default = "default_context_edge_chars")]
    pub context_edge_chars: usize,
    /// Custom prompt (uses {document} and {question} placeholders)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    800
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_context_chars() -> usize {
    4000
}

fn default_context_edge_chars() -> usize {
    2000
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: LlmProvider::default(),
            endpoint: None,
            model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_context_chars: default_max_context_chars(),
            context_edge_chars: default_context_edge_chars(),
            prompt: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Apply environment variable overrides.
    ///
    /// An explicit `LLM_PROVIDER` switches provider defaults; `LLM_ENDPOINT`
    /// always wins over both the file and `OLLAMA_HOST`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        if let Ok(val) = std::env::var("LLM_PROVIDER") {
            if let Some(provider) = LlmProvider::from_str(&val) {
                self.provider = provider;
                match val.trim().to_lowercase().as_str() {
                    "groq" => self.endpoint = Some("https://api.groq.com/openai".to_string()),
                    "together" => self.endpoint = Some("https://api.together.xyz".to_string()),
                    _ => {}
                }
            }
        }

        if let Ok(endpoint) = std::env::var("LLM_ENDPOINT") {
            self.endpoint = Some(endpoint);
        } else if self.provider == LlmProvider::Ollama && self.endpoint.is_none() {
            if let Ok(host) = std::env::var("OLLAMA_HOST") {
                self.endpoint = Some(normalize_ollama_host(&host));
            }
        }

        if let Ok(val) = std::env::var("LLM_MODEL") {
            self.model = Some(val);
        }
        if let Ok(val) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(n) = val.parse() {
                self.max_tokens = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(t) = val.parse() {
                self.temperature = t;
            }
        }
        self
    }

    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    /// Endpoint in effect, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
            .trim_end_matches('/')
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Human-readable provider name, derived from the endpoint.
    pub fn provider_name(&self) -> &'static str {
        match self.provider {
            LlmProvider::Ollama => "Ollama",
            LlmProvider::OpenAI => {
                let endpoint = self.endpoint();
                if endpoint.contains("groq.com") {
                    "Groq"
                } else if endpoint.contains("together.xyz") {
                    "Together.ai"
                } else {
                    "OpenAI"
                }
            }
        }
    }
}

/// `OLLAMA_HOST` may be a bare `host:port`.
fn normalize_ollama_host(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}
