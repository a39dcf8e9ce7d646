use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::ai_agent::llm::model_provider::ServiceError;
use crate::ai_agent::parsing::extract::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
  Input,
  Service,
  Parse,
}

/// Request-level failures. Any of these ends the pipeline for that request.
#[derive(Error, Debug)]
pub enum AnalysisError {
  #[error("{0}")]
  Input(String),

  #[error("{0}")]
  Service(#[from] ServiceError),

  /// The raw completion is kept so the page can still show what the model said.
  #[error("Failed to parse response into dictionary: {error}")]
  Parse { raw: String, error: ParseError },
}

impl AnalysisError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      AnalysisError::Input(_) => ErrorKind::Input,
      AnalysisError::Service(_) => ErrorKind::Service,
      AnalysisError::Parse { .. } => ErrorKind::Parse,
    }
  }
}

impl ResponseError for AnalysisError {
  fn status_code(&self) -> StatusCode {
    match self.kind() {
      ErrorKind::Input => StatusCode::BAD_REQUEST,
      ErrorKind::Service => StatusCode::BAD_GATEWAY,
      ErrorKind::Parse => StatusCode::UNPROCESSABLE_ENTITY,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let mut error = serde_json::json!({ "kind": self.kind(), "message": self.to_string() });
    if let AnalysisError::Parse { raw, .. } = self {
      error["raw"] = serde_json::Value::String(raw.clone());
    }
    HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": error }))
  }
}
