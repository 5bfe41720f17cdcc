//! Integration tests for `SqliteStore` against an in-memory database,
//! including full service scenarios driven through `RequestService`.

use beacon_core::{
  Error,
  lifecycle::{AssignmentEffect, TransitionPatch},
  request::{Category, NewRequest, RequestFilter, RequestStatus, Urgency},
  service::RequestService,
  store::DocumentStore,
  user::{NewUser, Role, User},
  volunteer::{NewVolunteerProfile, ProfileUpdate},
};
use chrono::Utc;
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn service() -> (SqliteStore, RequestService<SqliteStore>) {
  let s = store().await;
  (s.clone(), RequestService::new(s))
}

fn new_user(role: Role) -> NewUser {
  NewUser {
    email:     format!("{}@example.com", Uuid::new_v4()),
    full_name: "Test User".into(),
    role,
    location:  "North District".into(),
  }
}

async fn register(svc: &RequestService<SqliteStore>, role: Role) -> User {
  svc.create_user(new_user(role)).await.unwrap()
}

fn water_request() -> NewRequest {
  NewRequest {
    text:     "need water".into(),
    urgency:  None,
    category: None,
    location: "North District".into(),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;

  let user = User {
    id:         Uuid::new_v4(),
    email:      "alice@example.com".into(),
    full_name:  "Alice".into(),
    role:       Role::Volunteer,
    location:   "harbor".into(),
    created_at: Utc::now(),
  };
  s.create_user(&user).await.unwrap();

  let fetched = s.get_user(user.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, user.id);
  assert_eq!(fetched.email, "alice@example.com");
  assert_eq!(fetched.role, Role::Volunteer);
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_already_exists() {
  let (_, svc) = service().await;

  let mut first = new_user(Role::AffectedIndividual);
  first.email = "dup@example.com".into();
  svc.create_user(first.clone()).await.unwrap();

  let err = svc.create_user(first).await.unwrap_err();
  assert!(matches!(err, Error::AlreadyExists(_)));
}

#[tokio::test]
async fn find_user_by_email() {
  let (s, svc) = service().await;
  let user = register(&svc, Role::FirstResponder).await;

  let found = s.find_user_by_email(&user.email).await.unwrap().unwrap();
  assert_eq!(found.id, user.id);

  assert!(
    s.find_user_by_email("nobody@example.com")
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn user_record_visibility() {
  let (_, svc) = service().await;
  let owner = register(&svc, Role::AffectedIndividual).await;
  let volunteer = register(&svc, Role::Volunteer).await;
  let responder = register(&svc, Role::FirstResponder).await;

  // Owner reads their own record.
  let own = svc.get_user(owner.id, owner.id).await.unwrap();
  assert_eq!(own.id, owner.id);

  // A volunteer cannot read someone else's record.
  let err = svc.get_user(volunteer.id, owner.id).await.unwrap_err();
  assert!(matches!(err, Error::Denied));

  // A first responder can.
  let seen = svc.get_user(responder.id, owner.id).await.unwrap();
  assert_eq!(seen.id, owner.id);
}

// ─── Request creation ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_request_applies_defaults() {
  let (_, svc) = service().await;
  let submitter = register(&svc, Role::AffectedIndividual).await;

  let request =
    svc.create_request(submitter.id, water_request()).await.unwrap();

  assert_eq!(request.urgency, Urgency::Unknown);
  assert_eq!(request.category, Category::Other);
  assert_eq!(request.status, RequestStatus::Pending);
  assert!(request.last_updated.is_none());
  assert!(request.assigned_responder.is_none());
  assert_eq!(request.version, 0);

  // And the stored copy matches.
  let stored = svc.get_request(request.id).await.unwrap();
  assert_eq!(stored.urgency, Urgency::Unknown);
  assert_eq!(stored.category, Category::Other);
  assert_eq!(stored.status, RequestStatus::Pending);
}

#[tokio::test]
async fn create_request_unknown_submitter_is_not_found() {
  let (_, svc) = service().await;
  let err = svc
    .create_request(Uuid::new_v4(), water_request())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn list_requests_with_filter() {
  let (_, svc) = service().await;
  let submitter = register(&svc, Role::AffectedIndividual).await;

  let mut medical = water_request();
  medical.category = Some(Category::Medical);
  medical.urgency = Some(Urgency::High);
  svc.create_request(submitter.id, medical).await.unwrap();
  svc.create_request(submitter.id, water_request()).await.unwrap();

  let all = svc.list_requests(RequestFilter::default()).await.unwrap();
  assert_eq!(all.len(), 2);

  let medical_only = svc
    .list_requests(RequestFilter {
      category: Some(Category::Medical),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(medical_only.len(), 1);
  assert_eq!(medical_only[0].urgency, Urgency::High);

  let pending = svc
    .list_requests(RequestFilter {
      status: Some(RequestStatus::Pending),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(pending.len(), 2);
}

// ─── Transitions ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn volunteer_accepts_a_pending_request() {
  let (_, svc) = service().await;
  let submitter = register(&svc, Role::AffectedIndividual).await;
  let volunteer = register(&svc, Role::Volunteer).await;

  let request =
    svc.create_request(submitter.id, water_request()).await.unwrap();

  let updated = svc
    .transition_request(request.id, volunteer.id, RequestStatus::Processing)
    .await
    .unwrap();

  assert_eq!(updated.status, RequestStatus::Processing);
  assert_eq!(updated.assigned_responder, Some(volunteer.id));
  assert!(updated.last_updated.is_some());
  assert_eq!(updated.version, request.version + 1);
}

#[tokio::test]
async fn submitter_cannot_transition_own_request() {
  let (_, svc) = service().await;
  let submitter = register(&svc, Role::AffectedIndividual).await;

  let request =
    svc.create_request(submitter.id, water_request()).await.unwrap();

  let err = svc
    .transition_request(request.id, submitter.id, RequestStatus::Processing)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Denied));
}

#[tokio::test]
async fn pending_cannot_skip_to_resolved() {
  let (_, svc) = service().await;
  let submitter = register(&svc, Role::AffectedIndividual).await;
  let responder = register(&svc, Role::FirstResponder).await;

  let request =
    svc.create_request(submitter.id, water_request()).await.unwrap();

  let err = svc
    .transition_request(request.id, responder.id, RequestStatus::Resolved)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidTransition { .. }));
}

#[tokio::test]
async fn assigned_volunteer_resolves() {
  let (_, svc) = service().await;
  let submitter = register(&svc, Role::AffectedIndividual).await;
  let volunteer = register(&svc, Role::Volunteer).await;

  let request =
    svc.create_request(submitter.id, water_request()).await.unwrap();
  svc
    .transition_request(request.id, volunteer.id, RequestStatus::Processing)
    .await
    .unwrap();

  let resolved = svc
    .transition_request(request.id, volunteer.id, RequestStatus::Resolved)
    .await
    .unwrap();

  assert_eq!(resolved.status, RequestStatus::Resolved);
  // Responder retained for audit.
  assert_eq!(resolved.assigned_responder, Some(volunteer.id));
}

#[tokio::test]
async fn unassigned_volunteer_cannot_resolve_but_first_responder_can() {
  let (_, svc) = service().await;
  let submitter = register(&svc, Role::AffectedIndividual).await;
  let assigned = register(&svc, Role::Volunteer).await;
  let other = register(&svc, Role::Volunteer).await;
  let responder = register(&svc, Role::FirstResponder).await;

  let request =
    svc.create_request(submitter.id, water_request()).await.unwrap();
  svc
    .transition_request(request.id, assigned.id, RequestStatus::Processing)
    .await
    .unwrap();

  let err = svc
    .transition_request(request.id, other.id, RequestStatus::Resolved)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Denied));

  // First-responder override.
  let resolved = svc
    .transition_request(request.id, responder.id, RequestStatus::Resolved)
    .await
    .unwrap();
  assert_eq!(resolved.status, RequestStatus::Resolved);
}

#[tokio::test]
async fn hand_back_clears_assignment() {
  let (_, svc) = service().await;
  let submitter = register(&svc, Role::AffectedIndividual).await;
  let volunteer = register(&svc, Role::Volunteer).await;

  let request =
    svc.create_request(submitter.id, water_request()).await.unwrap();
  svc
    .transition_request(request.id, volunteer.id, RequestStatus::Processing)
    .await
    .unwrap();

  let back = svc
    .transition_request(request.id, volunteer.id, RequestStatus::Pending)
    .await
    .unwrap();

  assert_eq!(back.status, RequestStatus::Pending);
  assert!(back.assigned_responder.is_none());
  assert!(back.last_updated.is_some());
}

#[tokio::test]
async fn resolved_is_terminal_repeatedly() {
  let (_, svc) = service().await;
  let submitter = register(&svc, Role::AffectedIndividual).await;
  let volunteer = register(&svc, Role::Volunteer).await;

  let request =
    svc.create_request(submitter.id, water_request()).await.unwrap();
  svc
    .transition_request(request.id, volunteer.id, RequestStatus::Processing)
    .await
    .unwrap();
  svc
    .transition_request(request.id, volunteer.id, RequestStatus::Resolved)
    .await
    .unwrap();

  for target in
    [RequestStatus::Pending, RequestStatus::Processing, RequestStatus::Resolved]
  {
    let err = svc
      .transition_request(request.id, volunteer.id, target)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { .. }));
  }
}

// ─── Compare-and-update ──────────────────────────────────────────────────────

#[tokio::test]
async fn stale_version_loses_with_conflict() {
  let (s, svc) = service().await;
  let submitter = register(&svc, Role::AffectedIndividual).await;
  let racer_a = register(&svc, Role::Volunteer).await;
  let racer_b = register(&svc, Role::Volunteer).await;

  let request =
    svc.create_request(submitter.id, water_request()).await.unwrap();

  // Both racers read version 0; racer A's update lands first.
  svc
    .transition_request(request.id, racer_a.id, RequestStatus::Processing)
    .await
    .unwrap();

  // Racer B's compare-and-update against the stale version must lose.
  let patch = TransitionPatch {
    status:       RequestStatus::Processing,
    assignment:   AssignmentEffect::Assign(racer_b.id),
    last_updated: Utc::now(),
  };
  let err = s
    .update_request_if_match(request.id, request.version, &patch)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict));

  // The winner's assignment is untouched.
  let current = svc.get_request(request.id).await.unwrap();
  assert_eq!(current.assigned_responder, Some(racer_a.id));
  assert_eq!(current.version, 1);
}

#[tokio::test]
async fn compare_and_update_missing_row_is_not_found() {
  let s = store().await;

  let patch = TransitionPatch {
    status:       RequestStatus::Processing,
    assignment:   AssignmentEffect::Keep,
    last_updated: Utc::now(),
  };
  let err = s
    .update_request_if_match(Uuid::new_v4(), 0, &patch)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

// ─── Volunteer profiles ──────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_fetch_profile() {
  let (_, svc) = service().await;
  let volunteer = register(&svc, Role::Volunteer).await;

  let profile = svc
    .register_volunteer(volunteer.id, NewVolunteerProfile {
      user_id:      volunteer.id,
      specialties:  vec!["Medical".into()],
      availability: "weekends".into(),
      experience:   "EMT certified".into(),
    })
    .await
    .unwrap();

  assert_eq!(profile.id, volunteer.id);
  assert_eq!(profile.name, volunteer.full_name);
  assert_eq!(profile.role, Role::Volunteer);

  let fetched = svc.get_volunteer(volunteer.id).await.unwrap();
  assert_eq!(fetched.specialties, vec!["Medical".to_string()]);
  assert_eq!(fetched.availability, "weekends");
}

#[tokio::test]
async fn profile_requires_responder_role() {
  let (_, svc) = service().await;
  let affected = register(&svc, Role::AffectedIndividual).await;

  let err = svc
    .register_volunteer(affected.id, NewVolunteerProfile {
      user_id:      affected.id,
      specialties:  vec![],
      availability: String::new(),
      experience:   String::new(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Denied));
}

#[tokio::test]
async fn duplicate_profile_is_already_exists() {
  let (_, svc) = service().await;
  let volunteer = register(&svc, Role::Volunteer).await;

  let input = NewVolunteerProfile {
    user_id:      volunteer.id,
    specialties:  vec![],
    availability: String::new(),
    experience:   String::new(),
  };
  svc.register_volunteer(volunteer.id, input.clone()).await.unwrap();

  let err = svc.register_volunteer(volunteer.id, input).await.unwrap_err();
  assert!(matches!(err, Error::AlreadyExists(_)));
}

#[tokio::test]
async fn profile_update_permissions() {
  let (_, svc) = service().await;
  let owner = register(&svc, Role::Volunteer).await;
  let other = register(&svc, Role::Volunteer).await;
  let responder = register(&svc, Role::FirstResponder).await;

  svc
    .register_volunteer(owner.id, NewVolunteerProfile {
      user_id:      owner.id,
      specialties:  vec![],
      availability: String::new(),
      experience:   String::new(),
    })
    .await
    .unwrap();

  // Another volunteer may not touch it.
  let err = svc
    .update_volunteer(other.id, owner.id, ProfileUpdate {
      availability: Some("never".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Denied));

  // The owner may.
  let updated = svc
    .update_volunteer(owner.id, owner.id, ProfileUpdate {
      availability: Some("weekdays".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.availability, "weekdays");

  // So may a first responder, and unset fields stay put.
  let updated = svc
    .update_volunteer(responder.id, owner.id, ProfileUpdate {
      specialties: Some(vec!["Evacuation".into()]),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.availability, "weekdays");
  assert_eq!(updated.specialties, vec!["Evacuation".to_string()]);
}

// ─── Ranking ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rank_candidates_prefers_matching_specialty() {
  let (_, svc) = service().await;
  let submitter = register(&svc, Role::AffectedIndividual).await;
  let medic = register(&svc, Role::Volunteer).await;
  let cook = register(&svc, Role::Volunteer).await;

  svc
    .register_volunteer(medic.id, NewVolunteerProfile {
      user_id:      medic.id,
      specialties:  vec!["Medical".into()],
      availability: String::new(),
      experience:   String::new(),
    })
    .await
    .unwrap();
  svc
    .register_volunteer(cook.id, NewVolunteerProfile {
      user_id:      cook.id,
      specialties:  vec!["Food".into()],
      availability: "always".into(),
      experience:   String::new(),
    })
    .await
    .unwrap();

  let mut input = water_request();
  input.category = Some(Category::Medical);
  let request = svc.create_request(submitter.id, input).await.unwrap();

  let ranked = svc.rank_candidates(request.id).await.unwrap();
  assert_eq!(ranked.len(), 2);
  assert_eq!(ranked[0], medic.id);
  assert_eq!(ranked[1], cook.id);
}

#[tokio::test]
async fn rank_candidates_unknown_request_is_not_found() {
  let (_, svc) = service().await;
  let err = svc.rank_candidates(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}
