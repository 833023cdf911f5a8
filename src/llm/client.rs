//! HTTP client for the configured provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{LlmConfig, LlmProvider};
use super::prompt::{build_prompt, prepare_context, DEFAULT_QA_PROMPT};
use super::LlmError;

/// Answers free-form questions about a document's text.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, document_text: &str, question: &str) -> Result<String, LlmError>;

    /// Short description for display, e.g. `OpenAI (gpt-3.5-turbo)`.
    fn describe(&self) -> String;
}

/// OpenAI chat completions request format.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: String,
}

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// LLM client for document question answering.
pub struct LlmClient {
    config: LlmConfig,
    api_key: Option<String>,
    client: Client,
}

impl LlmClient {
    /// Create a client. `api_key` is only required by OpenAI-compatible providers.
    pub fn new(config: LlmConfig, api_key: Option<String>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Whether a request could be attempted at all.
    pub fn is_configured(&self) -> bool {
        self.config.enabled && (!self.config.provider.requires_api_key() || self.api_key.is_some())
    }

    /// Check if the LLM service is reachable.
    pub async fn is_available(&self) -> bool {
        if !self.is_configured() {
            return false;
        }
        let url = match self.config.provider {
            LlmProvider::Ollama => format!("{}/api/tags", self.config.endpoint()),
            LlmProvider::OpenAI => format!("{}/v1/models", self.config.endpoint()),
        };
        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        match request.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Send a prompt and return the trimmed completion.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }

        let response = match self.config.provider {
            LlmProvider::OpenAI => self.call_openai(prompt).await?,
            LlmProvider::Ollama => self.call_ollama(prompt).await?,
        };

        let response = response.trim().to_string();
        if response.is_empty() {
            return Err(LlmError::Parse("Empty response".to_string()));
        }
        Ok(response)
    }

    /// Call an OpenAI-compatible chat completions API.
    async fn call_openai(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_ref().ok_or(LlmError::MissingApiKey)?;

        let request = ChatRequest {
            model: self.config.model().to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = format!("{}/v1/chat/completions", self.config.endpoint());
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;
        let parsed: Result<ChatResponse, _> = serde_json::from_str(&body);

        if !status.is_success() {
            let detail = parsed
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(LlmError::Api(format!("HTTP {}: {}", status, detail)));
        }

        let chat = parsed.map_err(|e| LlmError::Parse(e.to_string()))?;
        if let Some(error) = chat.error {
            return Err(LlmError::Api(error.message));
        }

        chat.choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Parse("No choices in response".to_string()))
    }

    /// Call Ollama API with a prompt.
    async fn call_ollama(&self, prompt: &str) -> Result<String, LlmError> {
        let request = OllamaRequest {
            model: self.config.model().to_string(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.config.endpoint());
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let ollama_resp: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(ollama_resp.response)
    }
}

#[async_trait]
impl Answerer for LlmClient {
    async fn answer(&self, document_text: &str, question: &str) -> Result<String, LlmError> {
        let context = prepare_context(
            document_text,
            self.config.max_context_chars,
            self.config.context_edge_chars,
        );
        let template = self.config.prompt.as_deref().unwrap_or(DEFAULT_QA_PROMPT);
        let prompt = build_prompt(template, &context, question);

        debug!(
            "Asking {} ({} prompt chars)",
            self.describe(),
            prompt.chars().count()
        );
        self.complete(&prompt).await
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.config.provider_name(), self.config.model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_openai_requires_key() {
        let client = LlmClient::new(LlmConfig::default(), None).unwrap();
        assert!(!client.is_configured());
        let result = client.answer("text", "question").await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let client = LlmClient::new(LlmConfig::default(), Some("  ".to_string())).unwrap();
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn test_disabled() {
        let config = LlmConfig {
            enabled: false,
            ..LlmConfig::default()
        };
        let client = LlmClient::new(config, Some("sk-test".to_string())).unwrap();
        assert!(!client.is_available().await);
        let result = client.complete("prompt").await;
        assert!(matches!(result, Err(LlmError::Disabled)));
    }

    #[test]
    fn test_describe() {
        let config = LlmConfig::default()
            .with_provider(LlmProvider::Ollama)
            .with_model("mistral");
        let client = LlmClient::new(config, None).unwrap();
        assert!(client.is_configured());
        assert_eq!(client.describe(), "Ollama (mistral)");
    }

    #[test]
    fn test_chat_response_parsing() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":" The cat ran. "}}]}"#;
        let chat: ChatResponse = serde_json::from_str(body).unwrap();
        let content = chat.choices.unwrap().remove(0).message.content.unwrap();
        assert_eq!(content.trim(), "The cat ran.");

        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        let chat: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(chat.error.unwrap().message, "Incorrect API key provided");
    }
}
