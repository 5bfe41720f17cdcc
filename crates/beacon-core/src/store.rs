//! The [`DocumentStore`] trait — the persistence gateway.
//!
//! The only abstraction through which the rest of the system touches
//! storage. Implementations (e.g. `beacon-store-sqlite`) translate
//! backend-level failures into the domain error taxonomy before they cross
//! this boundary: a constraint violation becomes `AlreadyExists`, a stale
//! version becomes `Conflict`, a backend fault becomes `Unavailable`. No
//! storage-specific error type ever leaks upward.
//!
//! All methods return `Send` futures so the trait can be used from
//! multi-threaded async runtimes (tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  lifecycle::TransitionPatch,
  request::{Request, RequestFilter},
  user::User,
  volunteer::VolunteerProfile,
};

pub trait DocumentStore: Send + Sync {
  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails with `AlreadyExists` when the id or the
  /// email is already taken.
  fn create_user<'a>(
    &'a self,
    user: &'a User,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Retrieve a user by id. `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>>> + Send + '_;

  /// Look up a user by unique email. `None` if not found.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>>> + Send + 'a;

  // ── Requests ──────────────────────────────────────────────────────────

  /// Persist a new request exactly as given (the service sets defaults
  /// and the initial `pending` status before calling this).
  fn create_request<'a>(
    &'a self,
    request: &'a Request,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Retrieve a request by id. `None` if not found.
  fn get_request(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Request>>> + Send + '_;

  /// List requests matching `filter`; an empty filter returns everything.
  fn list_requests<'a>(
    &'a self,
    filter: &'a RequestFilter,
  ) -> impl Future<Output = Result<Vec<Request>>> + Send + 'a;

  /// Atomic compare-and-update: apply `patch` and bump the version
  /// counter only if the stored version equals `expected_version`.
  ///
  /// Returns the updated request on success, `Conflict` when the version
  /// is stale (a concurrent writer won), `NotFound` when the request does
  /// not exist. This is the single primitive through which all request
  /// mutation serializes; it is what makes racing transitions
  /// at-most-one-winner.
  fn update_request_if_match<'a>(
    &'a self,
    id: Uuid,
    expected_version: i64,
    patch: &'a TransitionPatch,
  ) -> impl Future<Output = Result<Request>> + Send + 'a;

  // ── Volunteer profiles ────────────────────────────────────────────────

  /// Persist a new profile. `AlreadyExists` when the user already has one.
  fn create_profile<'a>(
    &'a self,
    profile: &'a VolunteerProfile,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Retrieve a profile by the owning user's id. `None` if not found.
  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<VolunteerProfile>>> + Send + '_;

  /// List every profile (the candidate pool for ranking).
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<VolunteerProfile>>> + Send + '_;

  /// Overwrite an existing profile. `NotFound` when it does not exist.
  fn update_profile<'a>(
    &'a self,
    profile: &'a VolunteerProfile,
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}
