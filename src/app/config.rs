use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::ai_agent::llm::models::{DEFAULT_GROQ_URL, DEFAULT_MODEL_NAME};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
  #[error("{0} is not set. Add it to the environment or a .env file.")]
  MissingCredential(&'static str),

  #[error("{name} has an invalid value '{value}'")]
  Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
  pub groq_api_key : String,
  pub groq_url : String,
  pub model_name : String,
  pub request_timeout : Duration,
  pub bind_address : String,
  pub port : u16,
}

impl Config {

  /// Reads `.env` and the process environment. Fails fast when the Groq
  /// credential is absent rather than letting the first request fail on auth.
  pub fn load() -> Result<Self, ConfigError> {
    match dotenv::dotenv() {
      Ok(path) => log::info!("Loaded .env file from {}", path.display()),
      Err(_) => log::info!("No .env file found, using process environment"),
    }
    Config::from_lookup(|name| env::var(name).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError> where F: Fn(&str) -> Option<String> {
    let non_blank = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let groq_api_key : String = non_blank("GROQ_API_KEY").ok_or(ConfigError::MissingCredential("GROQ_API_KEY"))?;
    let groq_url : String = non_blank("GROQ_API_URL").unwrap_or_else(|| DEFAULT_GROQ_URL.to_string());
    let model_name : String = non_blank("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());
    let bind_address : String = non_blank("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

    let timeout_secs : u64 = match non_blank("GROQ_TIMEOUT_SECS") {
      Some(value) => value.parse().ok().filter(|secs| *secs > 0).ok_or(ConfigError::Invalid { name: "GROQ_TIMEOUT_SECS", value })?,
      None => DEFAULT_TIMEOUT_SECS,
    };

    let port : u16 = match non_blank("PORT") {
      Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
      None => DEFAULT_PORT,
    };

    return Ok(Config {
      groq_api_key, groq_url, model_name, request_timeout: Duration::from_secs(timeout_secs), bind_address, port
    });
  }
}
