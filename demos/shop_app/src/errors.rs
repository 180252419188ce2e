// demos/shop_app/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use shopsync::presentation::GENERIC_ERROR_MESSAGE;
use shopsync::ShopError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Shop Error: {source}")]
  Shop {
    #[from] // Allows conversion from shopsync::ShopError
    source: ShopError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience in handlers
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<ShopError>() {
      Ok(source) => AppError::Shop { source },
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Shop { source } => match source {
        ShopError::NotFound { product_id } => {
          HttpResponse::NotFound().json(json!({"error": format!("Product {} is not cached.", product_id)}))
        }
        // Network detail stays in the logs; callers get the same message the UI shows.
        ShopError::Network { .. } => HttpResponse::BadGateway().json(json!({"error": GENERIC_ERROR_MESSAGE})),
        ShopError::Storage(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
        ShopError::SubscriptionClosed => {
          HttpResponse::ServiceUnavailable().json(json!({"error": "Subscription closed"}))
        }
      },
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
