//! LLM Client Abstraction
//!
//! Generic interface for sending a diagnostic prompt to a language model.
//! Real implementation talks to any OpenAI-compatible chat completions API;
//! the fake client lets the pipeline be tested without network access.

use std::time::Duration;

/// LLM configuration
#[derive(Clone)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// LLM errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("API key is missing")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("LLM returned empty response")]
    EmptyResponse,
}

/// Generic LLM client trait
pub trait LlmClient {
    /// Send one system + user prompt pair and return the model's text
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;

    /// Model name used for the report header
    fn model(&self) -> &str;
}

/// Real LLM client implementation using HTTP
pub struct HttpLlmClient {
    config: LlmConfig,
    client: reqwest::blocking::Client,
}

impl HttpLlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => return Err(LlmError::MissingApiKey),
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }
}

impl LlmClient for HttpLlmClient {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
        });

        let mut request = self.client.post(self.completions_url()).json(&request_body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key.trim());
        }

        tracing::debug!("Sending {} prompt chars to {}", user_prompt.len(), self.config.model);
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.config.timeout_secs)
            } else {
                LlmError::Http(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| LlmError::Http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let response_json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| LlmError::InvalidJson(format!("Failed to parse response: {}", e)))?;

        extract_content(&response_json)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Pull `choices[0].message.content` out of a chat completions response
pub fn extract_content(response_json: &serde_json::Value) -> Result<String, LlmError> {
    let text = response_json
        .get("choices")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("message"))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.as_str())
        .ok_or(LlmError::EmptyResponse)?;

    let text = text.trim();
    if text.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Best-effort error message from an API error body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let snippet: String = body.chars().take(200).collect();
            if snippet.is_empty() {
                "no response body".to_string()
            } else {
                snippet
            }
        })
}

/// Fake LLM client for testing
pub struct FakeLlmClient {
    responses: std::sync::Mutex<Vec<Result<String, LlmError>>>,
    prompts: std::sync::Mutex<Vec<(String, String)>>,
}

impl FakeLlmClient {
    /// Create a fake client with pre-defined responses
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Create a fake client that always returns the same report
    pub fn always(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// Create a fake client that always returns an error
    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Get the number of calls made
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Prompts received so far, as (system, user) pairs
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl LlmClient for FakeLlmClient {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((system_prompt.to_string(), user_prompt.to_string()));
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| LlmError::Http("fake client poisoned".to_string()))?;
        match responses.len() {
            0 => Err(LlmError::EmptyResponse),
            // Keep returning the last response
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_config_default() {
        let config = LlmConfig::default();
        assert_eq!(config.endpoint, "https://api.openai.com");
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = LlmConfig {
            api_key: Some("sk-live-123456".to_string()),
            ..LlmConfig::default()
        };
        let dbg = format!("{:?}", config);
        assert!(!dbg.contains("sk-live-123456"));
        assert!(dbg.contains("***"));
    }

    #[test]
    fn test_http_client_requires_key() {
        let result = HttpLlmClient::new(LlmConfig::default());
        assert!(matches!(result, Err(LlmError::MissingApiKey)));

        let blank = LlmConfig {
            api_key: Some("   ".to_string()),
            ..LlmConfig::default()
        };
        assert!(matches!(HttpLlmClient::new(blank), Err(LlmError::MissingApiKey)));
    }

    #[test]
    fn test_completions_url_trims_slash() {
        let client = HttpLlmClient::new(LlmConfig {
            endpoint: "http://localhost:8080/".to_string(),
            api_key: Some("k".to_string()),
            ..LlmConfig::default()
        })
        .unwrap();
        assert_eq!(client.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_extract_content() {
        let json = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "  1. Analysis\n"}}]
        });
        assert_eq!(extract_content(&json).unwrap(), "1. Analysis");

        let empty = serde_json::json!({"choices": [{"message": {"content": "   "}}]});
        assert!(matches!(extract_content(&empty), Err(LlmError::EmptyResponse)));

        let missing = serde_json::json!({"choices": []});
        assert!(matches!(extract_content(&missing), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Incorrect API key provided");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(api_error_message(""), "no response body");
    }

    #[test]
    fn test_fake_client_multiple_responses() {
        let client = FakeLlmClient::new(vec![
            Ok("first".to_string()),
            Err(LlmError::Timeout(30)),
            Ok("last".to_string()),
        ]);

        assert_eq!(client.complete("s", "u1").unwrap(), "first");
        assert!(matches!(client.complete("s", "u2"), Err(LlmError::Timeout(30))));
        assert_eq!(client.complete("s", "u3").unwrap(), "last");
        assert_eq!(client.complete("s", "u4").unwrap(), "last");
        assert_eq!(client.call_count(), 4);
        assert_eq!(client.prompts()[1].1, "u2");
    }
}
