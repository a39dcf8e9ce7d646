use serde::{Serialize, Deserialize};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMModelConfig {
  pub model_name: String,
  pub temperature: Option<f32>,
  pub max_tokens: Option<u32>,
  pub stop: Option<Vec<String>>, // Groq accepts up to four stop sequences
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: String, // e.g., "user", "assistant", "system"
  pub content: String,
}

impl ChatMessage {
  pub fn user(content: impl Into<String>) -> Self {
    ChatMessage { role: "user".to_string(), content: content.into() }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
  pub content: String,
}

/// Failures talking to the completion service. None of these are retried.
#[derive(Error, Debug)]
pub enum ServiceError {
  #[error("Completion request failed: {0}")]
  Transport(String),

  #[error("Completion service returned {status}: {message}")]
  Status { status: u16, message: String },

  #[error("Completion service returned no content")]
  EmptyResponse,
}

impl From<reqwest::Error> for ServiceError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      return ServiceError::Transport(format!("request timed out: {}", err));
    }
    ServiceError::Transport(err.to_string())
  }
}

#[async_trait]
pub trait LLMChatter : Send + Sync {
  async fn chat(&self, messages: Vec<ChatMessage>, config: &LLMModelConfig) -> Result<LLMResponse, ServiceError>;
}
