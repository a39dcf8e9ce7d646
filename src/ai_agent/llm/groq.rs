use crate::ai_agent::llm::model_provider::{ChatMessage, LLMChatter, LLMModelConfig, LLMResponse, ServiceError};

use reqwest::{header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE}, Client, Response};
use serde::{Deserialize, Serialize};
use async_trait::async_trait;
use std::time::Duration;


#[derive(Serialize, Debug)]
struct GroqChatRequest<'a> {
  messages: &'a [ChatMessage],
  model: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  temperature: Option<f32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  stop: Option<&'a [String]>,
}

#[derive(Deserialize, Debug)]
struct GroqResponseMessage {
  content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GroqChoice {
  message: GroqResponseMessage,
}

#[derive(Deserialize, Debug)]
struct GroqChatResponse {
  choices: Vec<GroqChoice>,
}

#[derive(Deserialize, Debug)]
struct GroqErrorDetail {
  message: String,
}

#[derive(Deserialize, Debug)]
struct GroqErrorBody {
  error: GroqErrorDetail,
}

pub struct GroqProvider {
  groq_url : String,
  api_key : String,
  client : Client
}

impl GroqProvider {

  pub fn new(groq_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ServiceError> {
    let client: Client = Client::builder().timeout(timeout).build()?;
    Ok(GroqProvider { groq_url: groq_url.to_string(), api_key: api_key.to_string(), client })
  }

  fn headers(&self) -> Result<HeaderMap, ServiceError> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
      .map_err(|_| ServiceError::Transport("API key contains characters not allowed in a header".to_string()))?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    return Ok(headers);
  }
}

/// Pulls the provider's `error.message` out of a failure body, falling back to the body itself.
fn error_message(body: &str) -> String {
  match serde_json::from_str::<GroqErrorBody>(body) {
    Ok(parsed) => parsed.error.message,
    Err(_) if body.trim().is_empty() => "empty response body".to_string(),
    Err(_) => body.trim().to_string(),
  }
}

fn first_content(response: GroqChatResponse) -> Result<LLMResponse, ServiceError> {
  let first : GroqChoice = response.choices.into_iter().next().ok_or(ServiceError::EmptyResponse)?;
  match first.message.content {
    Some(content) => Ok(LLMResponse { content }),
    None => Err(ServiceError::EmptyResponse),
  }
}

#[async_trait]
impl LLMChatter for GroqProvider {
  async fn chat(&self, messages: Vec<ChatMessage>, config: &LLMModelConfig) -> Result<LLMResponse, ServiceError> {
    let request = GroqChatRequest {
      messages: &messages,
      model: &config.model_name,
      temperature: config.temperature,
      max_tokens: config.max_tokens,
      stop: config.stop.as_deref(),
    };

    let response: Response = self.client.post(&self.groq_url).headers(self.headers()?).json(&request).send().await?;
    let status = response.status();

    if status.is_success() {
      let groq_response : GroqChatResponse = response.json().await?;
      return first_content(groq_response);
    }

    let body: String = response.text().await.unwrap_or_default();
    log::error!("Error getting response from Groq: {}", status);
    Err(ServiceError::Status { status: status.as_u16(), message: error_message(&body) })
  }
}
