//! Handlers for `/volunteers` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/volunteers` | Body: `{actor_id, user_id, specialties?, ...}` |
//! | `GET`  | `/volunteers` | The whole candidate pool |
//! | `GET`  | `/volunteers/:id` | 404 if not found |
//! | `PUT`  | `/volunteers/:id` | Body: `{actor_id, ...partial fields}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use beacon_core::{
  service::RequestService,
  store::DocumentStore,
  volunteer::{NewVolunteerProfile, ProfileUpdate, VolunteerProfile},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub actor_id: Uuid,
  #[serde(flatten)]
  pub profile:  NewVolunteerProfile,
}

/// `POST /volunteers`
pub async fn create<S>(
  State(service): State<Arc<RequestService<S>>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore,
{
  let profile =
    service.register_volunteer(body.actor_id, body.profile).await?;
  Ok((StatusCode::CREATED, Json(profile)))
}

// ─── List / get ──────────────────────────────────────────────────────────────

/// `GET /volunteers`
pub async fn list<S>(
  State(service): State<Arc<RequestService<S>>>,
) -> Result<Json<Vec<VolunteerProfile>>, ApiError>
where
  S: DocumentStore,
{
  let profiles = service.list_volunteers().await?;
  Ok(Json(profiles))
}

/// `GET /volunteers/:id`
pub async fn get_one<S>(
  State(service): State<Arc<RequestService<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<VolunteerProfile>, ApiError>
where
  S: DocumentStore,
{
  let profile = service.get_volunteer(id).await?;
  Ok(Json(profile))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub actor_id: Uuid,
  #[serde(flatten)]
  pub update:   ProfileUpdate,
}

/// `PUT /volunteers/:id`
pub async fn update<S>(
  State(service): State<Arc<RequestService<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<VolunteerProfile>, ApiError>
where
  S: DocumentStore,
{
  let profile =
    service.update_volunteer(body.actor_id, id, body.update).await?;
  Ok(Json(profile))
}
