//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: [`NewUser`]; 409 on duplicate email |
//! | `GET`  | `/users/:id` | `?actor_id=<uuid>`; 403 unless owner or first responder |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use beacon_core::{
  service::RequestService,
  store::DocumentStore,
  user::{NewUser, User},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// `POST /users`
pub async fn create<S>(
  State(service): State<Arc<RequestService<S>>>,
  Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore,
{
  let user = service.create_user(body).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct ActorParams {
  pub actor_id: Uuid,
}

/// `GET /users/:id?actor_id=<uuid>`
pub async fn get_one<S>(
  State(service): State<Arc<RequestService<S>>>,
  Path(id): Path<Uuid>,
  Query(params): Query<ActorParams>,
) -> Result<Json<User>, ApiError>
where
  S: DocumentStore,
{
  let user = service.get_user(params.actor_id, id).await?;
  Ok(Json(user))
}
