//! Generation client
//!
//! Wraps one call to the external text-generation service per article. The
//! client never fails outward: transport errors, timeouts, error statuses and
//! unusable payloads are logged and replaced by a locally synthesized fallback
//! article, so the job runner always has something to persist.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

pub mod fallback;
pub mod parser;
pub mod prompt;
pub mod topics;

pub use fallback::fallback_article;
pub use parser::{extract_text, parse_generated_text};
pub use prompt::build_prompt;

use crate::config::GenerationConfig;
use crate::errors::{GenerationError, GenerationResult};
use crate::models::GeneratedArticle;

/// Source of generated articles
#[async_trait]
pub trait ArticleGenerator: Send + Sync {
    /// Produce one article. Implementations must not fail.
    async fn generate(&self) -> GeneratedArticle;
}

/// Request body shape sent upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestFormat {
    /// `{"inputs": .., "parameters": {..}}` as used by hosted inference APIs
    #[default]
    TextGeneration,
    /// OpenAI-style `{"model": .., "messages": [..]}`
    ChatCompletion,
}

/// HTTP client for the generation service
#[derive(Clone)]
pub struct GenerationClient {
    http_client: Client,
    config: GenerationConfig,
}

impl GenerationClient {
    /// Build a client whose requests are bounded by `config.timeout`
    pub fn new(config: GenerationConfig) -> GenerationResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate an article for a specific topic label, falling back on error
    pub async fn generate_for_topic(&self, topic: &str) -> GeneratedArticle {
        info!("Generating article about: {}", topic);

        match self.try_generate(topic).await {
            Ok(article) => {
                debug!(
                    "Generated article '{}' ({} characters)",
                    article.title,
                    article.content.chars().count()
                );
                article
            }
            Err(e) => {
                match &e {
                    GenerationError::Timeout { .. } | GenerationError::Transport(_) => {
                        error!("Error generating article: {}", e);
                    }
                    _ => warn!("Unusable response from generation service: {}", e),
                }
                info!("Using fallback article for topic '{}'", topic);
                fallback_article(topic)
            }
        }
    }

    /// One upstream attempt, parsed. Every failure is returned, none are absorbed.
    pub async fn try_generate(&self, topic: &str) -> GenerationResult<GeneratedArticle> {
        let prompt = build_prompt(topic);
        let text = self.request_text(&prompt).await?;
        parse_generated_text(&text, topic, self.config.min_content_length)
    }

    async fn request_text(&self, prompt: &str) -> GenerationResult<String> {
        let mut request = self
            .http_client
            .post(&self.config.api_url)
            .json(&self.request_body(prompt));

        if let Some(api_key) = self.config.api_key.as_deref() {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message: summarize_body(&body),
            });
        }

        let body = response.text().await.map_err(|e| self.map_transport(e))?;
        if body.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| GenerationError::malformed(format!("invalid JSON: {e}")))?;

        extract_text(&payload)
    }

    fn request_body(&self, prompt: &str) -> Value {
        match self.config.request_format {
            RequestFormat::TextGeneration => json!({
                "inputs": prompt,
                "parameters": {
                    "max_new_tokens": self.config.max_new_tokens,
                    "temperature": self.config.temperature,
                    "top_p": self.config.top_p,
                    "return_full_text": false,
                }
            }),
            RequestFormat::ChatCompletion => json!({
                "model": self.config.model,
                "messages": [{ "role": "user", "content": prompt }],
                "max_tokens": self.config.max_new_tokens,
                "temperature": self.config.temperature,
                "top_p": self.config.top_p,
            }),
        }
    }

    fn map_transport(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                url: self.config.api_url.clone(),
            }
        } else {
            GenerationError::Transport(e)
        }
    }
}

#[async_trait]
impl ArticleGenerator for GenerationClient {
    async fn generate(&self) -> GeneratedArticle {
        self.generate_for_topic(topics::random_topic()).await
    }
}

/// First line of an error body, capped for log output
fn summarize_body(body: &str) -> String {
    let first_line = body.lines().next().unwrap_or("").trim();
    if first_line.chars().count() > 200 {
        let capped: String = first_line.chars().take(200).collect();
        format!("{capped}...")
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(format: RequestFormat) -> GenerationClient {
        GenerationClient::new(GenerationConfig {
            request_format: format,
            model: Some("mistral-small".to_string()),
            ..GenerationConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_text_generation_body() {
        let body = client(RequestFormat::TextGeneration).request_body("hello");
        assert_eq!(body["inputs"], "hello");
        assert_eq!(body["parameters"]["max_new_tokens"], 800);
        assert_eq!(body["parameters"]["return_full_text"], false);
        assert!(body.get("messages").is_none());
    }

    #[test]
    fn test_chat_completion_body() {
        let body = client(RequestFormat::ChatCompletion).request_body("hello");
        assert_eq!(body["model"], "mistral-small");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 800);
    }

    #[test]
    fn test_request_format_serde() {
        let format: RequestFormat = serde_json::from_str("\"chat-completion\"").unwrap();
        assert_eq!(format, RequestFormat::ChatCompletion);
        assert_eq!(
            serde_json::to_string(&RequestFormat::TextGeneration).unwrap(),
            "\"text-generation\""
        );
    }

    #[test]
    fn test_summarize_body() {
        assert_eq!(summarize_body("Bad gateway\nmore"), "Bad gateway");
        assert_eq!(summarize_body(&"x".repeat(300)).chars().count(), 203);
    }
}
