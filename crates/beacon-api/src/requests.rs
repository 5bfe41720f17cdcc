//! Handlers for `/requests` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/requests` | Body: `{submitter_id, text, urgency?, type?, location?}` |
//! | `GET`  | `/requests` | Filters: `?status=`, `?type=`, `?urgency=` |
//! | `GET`  | `/requests/:id` | 404 if not found |
//! | `POST` | `/requests/:id/transition` | Body: `{actor_id, status}` |
//! | `GET`  | `/requests/:id/candidates` | Ranked responder ids, best first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use beacon_core::{
  request::{NewRequest, Request, RequestFilter, RequestStatus},
  service::RequestService,
  store::DocumentStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub submitter_id: Uuid,
  #[serde(flatten)]
  pub request:      NewRequest,
}

/// `POST /requests`
pub async fn create<S>(
  State(service): State<Arc<RequestService<S>>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore,
{
  let request =
    service.create_request(body.submitter_id, body.request).await?;
  Ok((StatusCode::CREATED, Json(request)))
}

// ─── List / get ──────────────────────────────────────────────────────────────

/// `GET /requests[?status=&type=&urgency=]`
pub async fn list<S>(
  State(service): State<Arc<RequestService<S>>>,
  Query(filter): Query<RequestFilter>,
) -> Result<Json<Vec<Request>>, ApiError>
where
  S: DocumentStore,
{
  let requests = service.list_requests(filter).await?;
  Ok(Json(requests))
}

/// `GET /requests/:id`
pub async fn get_one<S>(
  State(service): State<Arc<RequestService<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Request>, ApiError>
where
  S: DocumentStore,
{
  let request = service.get_request(id).await?;
  Ok(Json(request))
}

// ─── Transition ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TransitionBody {
  pub actor_id: Uuid,
  pub status:   RequestStatus,
}

/// `POST /requests/:id/transition`
pub async fn transition<S>(
  State(service): State<Arc<RequestService<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<TransitionBody>,
) -> Result<Json<Request>, ApiError>
where
  S: DocumentStore,
{
  let request =
    service.transition_request(id, body.actor_id, body.status).await?;
  Ok(Json(request))
}

// ─── Candidates ──────────────────────────────────────────────────────────────

/// `GET /requests/:id/candidates`
pub async fn candidates<S>(
  State(service): State<Arc<RequestService<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Uuid>>, ApiError>
where
  S: DocumentStore,
{
  let ranked = service.rank_candidates(id).await?;
  Ok(Json(ranked))
}
