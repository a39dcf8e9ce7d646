use std::sync::Arc;

use crate::ai_agent::llm::groq::GroqProvider;
use crate::ai_agent::llm::model_provider::{LLMChatter, ServiceError};
use crate::app::config::Config;

pub const DEFAULT_MODEL_NAME: &str = "llama3-70b-8192";
pub const DEFAULT_GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

pub fn get_model(config: &Config) -> Result<Arc<dyn LLMChatter>, ServiceError> {
  log::info!("Initializing Groq client for model: {} (timeout {:?})", config.model_name, config.request_timeout);
  let client = GroqProvider::new(&config.groq_url, &config.groq_api_key, config.request_timeout)?;
  return Ok(Arc::new(client));
}
