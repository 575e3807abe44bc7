//! Error taxonomy for the assessment core, the mailer, and the HTTP surface.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Raw answers the scoring engine refuses to score.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
  #[error("expected {expected} answers, got {actual}")]
  WrongLength { expected: usize, actual: usize },
  #[error("answer {index} is not a finite number")]
  NonFinite { index: usize },
  #[error("answer {index} is {value}, outside the {min}..={max} scale")]
  OutOfScale { index: usize, value: f64, min: u8, max: u8 },
  #[error("answer {index} is {value}, not a whole scale point")]
  NotWholeNumber { index: usize, value: f64 },
}

/// Static assessment configuration that cannot be served.
#[derive(Debug, Error)]
pub enum ConfigurationError {
  #[error("failed to read config file {path}: {source}")]
  Read { path: String, source: std::io::Error },
  #[error("failed to parse config file {path}: {source}")]
  Parse { path: String, source: toml::de::Error },
  #[error("question catalog is empty")]
  EmptyCatalog,
  #[error("question {index} has empty text")]
  EmptyQuestion { index: usize },
  #[error("category names must be non-empty")]
  UnnamedCategory,
  #[error("category '{0}' is defined more than once")]
  DuplicateCategory(String),
  #[error("category '{0}' references no questions")]
  EmptyCategory(String),
  #[error("category '{category}' references question {index}, but the catalog has {len} questions")]
  IndexOutOfBounds { category: String, index: usize, len: usize },
  #[error("failed to build HTTP client: {0}")]
  HttpClient(String),
  #[error("{name} must be {expected}, got '{value}'")]
  InvalidEnv { name: &'static str, expected: &'static str, value: String },
}

/// Failures while handing a report to the email provider.
#[derive(Debug, Error)]
pub enum MailError {
  #[error("email delivery is not configured")]
  Disabled,
  #[error("invalid recipient address")]
  InvalidRecipient,
  #[error("email provider unreachable: {0}")]
  Transport(String),
  #[error("email provider returned HTTP {status}: {message}")]
  Upstream { status: u16, message: String },
  #[error("unexpected email provider response: {0}")]
  Decode(String),
}

impl MailError {
  /// Transport failures and provider-side 5xx are worth one more attempt.
  pub fn is_retryable(&self) -> bool {
    match self {
      MailError::Transport(_) => true,
      MailError::Upstream { status, .. } => *status >= 500,
      _ => false,
    }
  }
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Body that does not deserialize, e.g. a `null` or non-numeric answer.
  #[error("malformed request: {}", .0.body_text())]
  Malformed(#[from] JsonRejection),
  #[error("invalid answers: {0}")]
  InvalidInput(#[from] InvalidInput),
  #[error(transparent)]
  Mail(#[from] MailError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Malformed(rejection) => rejection.status(),
      ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Mail(MailError::InvalidRecipient) => StatusCode::BAD_REQUEST,
      ApiError::Mail(MailError::Disabled) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Mail(_) => StatusCode::BAD_GATEWAY,
    };

    let body = Json(json!({ "error": self.to_string() }));
    (status, body).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn retry_policy_covers_transport_and_server_errors_only() {
    assert!(MailError::Transport("reset".into()).is_retryable());
    assert!(MailError::Upstream { status: 503, message: String::new() }.is_retryable());
    assert!(!MailError::Upstream { status: 422, message: String::new() }.is_retryable());
    assert!(!MailError::InvalidRecipient.is_retryable());
    assert!(!MailError::Decode("bad json".into()).is_retryable());
  }

  #[test]
  fn api_errors_map_to_status_codes() {
    let cases = [
      (ApiError::from(InvalidInput::WrongLength { expected: 16, actual: 15 }), StatusCode::UNPROCESSABLE_ENTITY),
      (ApiError::from(MailError::InvalidRecipient), StatusCode::BAD_REQUEST),
      (ApiError::from(MailError::Disabled), StatusCode::SERVICE_UNAVAILABLE),
      (ApiError::from(MailError::Upstream { status: 500, message: "down".into() }), StatusCode::BAD_GATEWAY),
    ];
    for (err, expected) in cases {
      assert_eq!(err.into_response().status(), expected);
    }
  }

  #[test]
  fn messages_name_the_offending_answer() {
    let err = InvalidInput::OutOfScale { index: 3, value: 7.0, min: 1, max: 5 };
    assert_eq!(err.to_string(), "answer 3 is 7, outside the 1..=5 scale");
  }
}
