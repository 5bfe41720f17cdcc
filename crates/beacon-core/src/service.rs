//! [`RequestService`] — the orchestration layer behind every caller-facing
//! operation.
//!
//! Holds an injected [`DocumentStore`] (no process-wide singleton) and
//! composes the permission evaluator, the lifecycle planner, and the
//! ranker. Each operation is a short, stateless unit of work; the only
//! suspension points are gateway calls, and each of those is bounded by a
//! configurable timeout that surfaces as [`Error::Unavailable`]. The
//! service never retries: `Conflict` and `Unavailable` go back to the
//! caller, who re-reads and decides.

use std::{future::Future, sync::Arc, time::Duration};

use chrono::Utc;
use uuid::Uuid;

use crate::{
  Result,
  assignment::{Ranker, SpecialtyRanker},
  error::Error,
  lifecycle,
  permission::{Action, Decision, Resource, evaluate},
  request::{NewRequest, Request, RequestFilter, RequestStatus},
  store::DocumentStore,
  user::{NewUser, User},
  volunteer::{NewVolunteerProfile, ProfileUpdate, VolunteerProfile},
};

/// Per-gateway-call timeout applied when the caller does not configure one.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RequestService<S> {
  store:         S,
  ranker:        Arc<dyn Ranker>,
  store_timeout: Duration,
}

impl<S: DocumentStore> RequestService<S> {
  pub fn new(store: S) -> Self {
    Self {
      store,
      ranker: Arc::new(SpecialtyRanker),
      store_timeout: DEFAULT_STORE_TIMEOUT,
    }
  }

  /// Replace the default ranker. The substitution seam for any future
  /// urgency/matching classifier.
  pub fn with_ranker(mut self, ranker: Arc<dyn Ranker>) -> Self {
    self.ranker = ranker;
    self
  }

  pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
    self.store_timeout = timeout;
    self
  }

  /// Bound a gateway call; an elapsed timeout is reported as
  /// `Unavailable`, never retried here.
  async fn bounded<T>(
    &self,
    fut: impl Future<Output = Result<T>> + Send,
  ) -> Result<T> {
    match tokio::time::timeout(self.store_timeout, fut).await {
      Ok(result) => result,
      Err(_) => Err(Error::Unavailable("store call timed out".into())),
    }
  }

  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a user. One-time: a second create for the same email fails
  /// with `AlreadyExists`.
  pub async fn create_user(&self, new: NewUser) -> Result<User> {
    // Registration is always for one's own record.
    self.check(evaluate(new.role, Action::Create, Resource::User {
      is_owner: true,
    }))?;

    if let Some(existing) =
      self.bounded(self.store.find_user_by_email(&new.email)).await?
    {
      return Err(Error::AlreadyExists(existing.email));
    }

    let user = User {
      id:         Uuid::new_v4(),
      email:      new.email,
      full_name:  new.full_name,
      role:       new.role,
      location:   new.location,
      created_at: Utc::now(),
    };

    self.bounded(self.store.create_user(&user)).await?;
    tracing::info!(user = %user.id, role = ?user.role, "user registered");
    Ok(user)
  }

  /// Read a user record: its owner or any first responder.
  pub async fn get_user(&self, actor_id: Uuid, user_id: Uuid) -> Result<User> {
    let actor = self.require_user(actor_id).await?;
    self.check(evaluate(actor.role, Action::Read, Resource::User {
      is_owner: actor_id == user_id,
    }))?;

    if actor_id == user_id {
      return Ok(actor);
    }
    self.require_user(user_id).await
  }

  // ── Requests ──────────────────────────────────────────────────────────

  /// File a new request. Unset urgency/category default to
  /// `Unknown`/`Other` atomically with the initial `pending` status.
  pub async fn create_request(
    &self,
    submitter_id: Uuid,
    new: NewRequest,
  ) -> Result<Request> {
    let submitter = self.require_user(submitter_id).await?;
    self.check(evaluate(submitter.role, Action::Create, Resource::Request))?;

    let request = Request {
      id:                 Uuid::new_v4(),
      submitter_id,
      text:               new.text,
      urgency:            new.urgency.unwrap_or_default(),
      category:           new.category.unwrap_or_default(),
      location:           new.location,
      status:             RequestStatus::Pending,
      created_at:         Utc::now(),
      last_updated:       None,
      assigned_responder: None,
      version:            0,
    };

    self.bounded(self.store.create_request(&request)).await?;
    tracing::info!(
      request = %request.id,
      category = ?request.category,
      urgency = ?request.urgency,
      "request submitted"
    );
    Ok(request)
  }

  pub async fn get_request(&self, request_id: Uuid) -> Result<Request> {
    self
      .bounded(self.store.get_request(request_id))
      .await?
      .ok_or(Error::NotFound(request_id))
  }

  /// Requests are publicly visible; no actor is required to list them.
  pub async fn list_requests(
    &self,
    filter: RequestFilter,
  ) -> Result<Vec<Request>> {
    self.bounded(self.store.list_requests(&filter)).await
  }

  /// Move a request along its lifecycle on behalf of `actor_id`.
  ///
  /// At-most-one-winner: the patch is applied through the gateway's
  /// compare-and-update keyed on the version read here, so of two racing
  /// actors exactly one succeeds and the other gets `Conflict`.
  pub async fn transition_request(
    &self,
    request_id: Uuid,
    actor_id: Uuid,
    target: RequestStatus,
  ) -> Result<Request> {
    let actor = self.require_user(actor_id).await?;
    let request = self.get_request(request_id).await?;

    self.check(evaluate(actor.role, Action::Update, Resource::Request))?;

    let patch =
      lifecycle::plan_transition(&request, actor.id, actor.role, target, Utc::now())?;

    let updated = self
      .bounded(self.store.update_request_if_match(
        request.id,
        request.version,
        &patch,
      ))
      .await?;

    tracing::info!(
      request = %updated.id,
      actor = %actor.id,
      from = %request.status,
      to = %updated.status,
      "request transitioned"
    );
    Ok(updated)
  }

  /// Rank the full profile pool for a request, best candidate first.
  pub async fn rank_candidates(&self, request_id: Uuid) -> Result<Vec<Uuid>> {
    let request = self.get_request(request_id).await?;
    let pool = self.bounded(self.store.list_profiles()).await?;
    Ok(self.ranker.rank(&request, &pool))
  }

  // ── Volunteer profiles ────────────────────────────────────────────────

  /// Register a volunteer profile for a responder-role user. Name, role,
  /// and location are copied from the user record.
  pub async fn register_volunteer(
    &self,
    actor_id: Uuid,
    new: NewVolunteerProfile,
  ) -> Result<VolunteerProfile> {
    let actor = self.require_user(actor_id).await?;
    self.check(evaluate(actor.role, Action::Create, Resource::VolunteerProfile {
      is_owner: actor_id == new.user_id,
    }))?;

    let owner = self.require_user(new.user_id).await?;
    if !owner.role.is_responder() {
      // Profiles are tied 1:1 to responder-role users only.
      return Err(Error::Denied);
    }

    let profile = VolunteerProfile {
      id:           owner.id,
      name:         owner.full_name,
      role:         owner.role,
      location:     owner.location,
      specialties:  new.specialties,
      availability: new.availability,
      experience:   new.experience,
      created_at:   Utc::now(),
    };

    self.bounded(self.store.create_profile(&profile)).await?;
    tracing::info!(profile = %profile.id, "volunteer registered");
    Ok(profile)
  }

  pub async fn get_volunteer(
    &self,
    profile_id: Uuid,
  ) -> Result<VolunteerProfile> {
    self
      .bounded(self.store.get_profile(profile_id))
      .await?
      .ok_or(Error::NotFound(profile_id))
  }

  pub async fn list_volunteers(&self) -> Result<Vec<VolunteerProfile>> {
    self.bounded(self.store.list_profiles()).await
  }

  /// Update a profile: its owner or any first responder. `None` fields
  /// are left unchanged.
  pub async fn update_volunteer(
    &self,
    actor_id: Uuid,
    profile_id: Uuid,
    update: ProfileUpdate,
  ) -> Result<VolunteerProfile> {
    let actor = self.require_user(actor_id).await?;
    let mut profile = self.get_volunteer(profile_id).await?;

    self.check(evaluate(actor.role, Action::Update, Resource::VolunteerProfile {
      is_owner: actor_id == profile_id,
    }))?;

    if let Some(location) = update.location {
      profile.location = location;
    }
    if let Some(specialties) = update.specialties {
      profile.specialties = specialties;
    }
    if let Some(availability) = update.availability {
      profile.availability = availability;
    }
    if let Some(experience) = update.experience {
      profile.experience = experience;
    }

    self.bounded(self.store.update_profile(&profile)).await?;
    Ok(profile)
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  async fn require_user(&self, id: Uuid) -> Result<User> {
    self
      .bounded(self.store.get_user(id))
      .await?
      .ok_or(Error::NotFound(id))
  }

  fn check(&self, decision: Decision) -> Result<()> {
    if decision.is_allowed() { Ok(()) } else { Err(Error::Denied) }
  }
}
