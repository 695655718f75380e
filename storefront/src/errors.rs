// storefront/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use paygate::PaygateError;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  /// The gateway declined or could not be reached. Carries the gateway's message.
  #[error("Payment Gateway Error: {0}")]
  Gateway(String),

  #[error("Order Store Error: {0}")]
  Store(#[from] StoreError),
}

impl From<PaygateError> for AppError {
  fn from(err: PaygateError) -> Self {
    match err {
      PaygateError::Configuration { field } => AppError::Config(format!("Gateway setting '{}' is missing", field)),
      PaygateError::InvalidAmount { reason } => AppError::Validation(reason),
      other => AppError::Gateway(other.to_string()),
    }
  }
}

impl AppError {
  /// Message shown to the caller. Store details stay in the logs.
  fn public_message(&self) -> String {
    match self {
      AppError::Validation(m) | AppError::Auth(m) | AppError::NotFound(m) | AppError::Gateway(m) => m.clone(),
      AppError::Config(_) => "Payment configuration missing".to_string(),
      AppError::Store(_) => "Failed to create order".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
      // Everything else shares the initiation contract's single failure status.
      AppError::Validation(_) | AppError::Gateway(_) | AppError::Store(_) => StatusCode::BAD_REQUEST,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    HttpResponse::build(self.status_code()).json(json!({
      "success": false,
      "error": self.public_message(),
    }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
