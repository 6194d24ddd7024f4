//! HTTP oracle adapter speaking the OpenAI chat-completions wire format.
//!
//! One request per call, no streaming: every oracle use in the collection
//! flow wants the full reply before parsing it.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::ports::{Oracle, OracleError};

/// Configuration for the HTTP oracle.
#[derive(Debug, Clone)]
pub struct HttpOracleConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl HttpOracleConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Oracle implementation backed by an OpenAI-compatible HTTP API.
pub struct HttpOracle {
    config: HttpOracleConfig,
    client: Client,
}

impl HttpOracle {
    /// Creates a new HTTP oracle with the given configuration.
    pub fn new(config: HttpOracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::network(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    async fn send_request(&self, prompt: &str, persona: &str) -> Result<Response, OracleError> {
        let request = WireRequest {
            model: self.config.model.clone(),
            messages: vec![
                WireMessage {
                    role: "system".to_string(),
                    content: persona.to_string(),
                },
                WireMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.0,
        };

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    OracleError::network(format!("connection failed: {}", e))
                } else {
                    OracleError::network(e.to_string())
                }
            })
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, OracleError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => Err(OracleError::AuthenticationFailed),
            500..=599 => Err(OracleError::unavailable(format!(
                "server error {}: {}",
                status, error_body
            ))),
            _ => Err(OracleError::network(format!(
                "unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    async fn call_once(&self, prompt: &str, persona: &str) -> Result<String, OracleError> {
        let response = self.send_request(prompt, persona).await?;
        let response = self.handle_response_status(response).await?;
        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Parse(e.to_string()))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(OracleError::Empty);
        }
        Ok(content)
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn call(&self, prompt: &str, persona: &str) -> Result<String, OracleError> {
        let mut attempt = 0;
        loop {
            match self.call_once(prompt, persona).await {
                Ok(content) => return Ok(content),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %err, "oracle call failed, retrying");
                    sleep(Duration::from_millis(250 * u64::from(attempt))).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_applies_overrides() {
        let config = HttpOracleConfig::new("sk-test")
            .with_model("gpt-4o-mini")
            .with_base_url("http://localhost:8080/v1")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn completions_url_joins_base() {
        let oracle = HttpOracle::new(HttpOracleConfig::new("sk-test")).unwrap();
        assert_eq!(
            oracle.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn api_key_does_not_leak_in_debug() {
        let config = HttpOracleConfig::new("sk-secret-value");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret-value"));
    }

    #[test]
    fn wire_response_parses_first_choice() {
        let body = r#"{"choices":[{"message":{"content":"{\"x\":1}"}}]}"#;
        let parsed: WireResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "{\"x\":1}");
    }
}
