//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// A domain error crossing the HTTP boundary. The taxonomy maps straight
/// onto status codes; the retryable variants (`Conflict`, `Unavailable`)
/// are the ones a client may reasonably attempt again.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] beacon_core::Error);

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    use beacon_core::Error::*;

    let status = match &self.0 {
      AlreadyExists(_) | Conflict => StatusCode::CONFLICT,
      NotFound(_) => StatusCode::NOT_FOUND,
      Denied => StatusCode::FORBIDDEN,
      InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
      Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(json!({ "error": self.0.to_string() }))).into_response()
  }
}
