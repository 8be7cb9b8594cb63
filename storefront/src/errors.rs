// storefront/src/errors.rs

use crate::store::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront_flow::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Username already exists")]
  DuplicateUsername,

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  /// Store unreachable or a failed write. The detail is logged, never sent to clients.
  #[error("Persistence Error: {0}")]
  Persistence(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Token Error: {0}")]
  Token(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<StoreError> for AppError {
  fn from(err: StoreError) -> Self {
    AppError::Persistence(err.to_string())
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<StoreError>() {
      Ok(store_err) => store_err.into(),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::DuplicateUsername => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Persistence(_)
      | AppError::Config(_)
      | AppError::Token(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let message = match self {
      AppError::Validation(m) | AppError::Auth(m) | AppError::NotFound(m) => m.clone(),
      AppError::DuplicateUsername => self.to_string(),
      AppError::Persistence(detail) => {
        tracing::error!(%detail, "Persistence failure.");
        "Server error".to_string()
      }
      AppError::Workflow { source } => {
        tracing::error!(flow_error = ?source, "Workflow failure.");
        "Internal Server Error".to_string()
      }
      AppError::Config(_) | AppError::Token(_) | AppError::Internal(_) => {
        tracing::error!(application_error = %self, "Responding with internal error.");
        "Internal Server Error".to_string()
      }
    };
    HttpResponse::build(self.status_code()).json(json!({ "error": message }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
