//! JSON REST API for Beacon.
//!
//! Exposes an axum [`Router`] backed by a
//! [`beacon_core::service::RequestService`] over any
//! [`beacon_core::store::DocumentStore`]. Authentication, TLS, and
//! transport concerns are the caller's responsibility: handlers receive an
//! already-authenticated actor id and never see credentials.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", beacon_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod requests;
pub mod users;
pub mod volunteers;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use beacon_core::{service::RequestService, store::DocumentStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(service: Arc<RequestService<S>>) -> Router<()>
where
  S: DocumentStore + 'static,
{
  Router::new()
    // Users
    .route("/users", post(users::create::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    // Requests
    .route(
      "/requests",
      get(requests::list::<S>).post(requests::create::<S>),
    )
    .route("/requests/{id}", get(requests::get_one::<S>))
    .route("/requests/{id}/transition", post(requests::transition::<S>))
    .route("/requests/{id}/candidates", get(requests::candidates::<S>))
    // Volunteers
    .route(
      "/volunteers",
      get(volunteers::list::<S>).post(volunteers::create::<S>),
    )
    .route(
      "/volunteers/{id}",
      get(volunteers::get_one::<S>).put(volunteers::update::<S>),
    )
    .with_state(service)
}
