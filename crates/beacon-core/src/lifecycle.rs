//! The request lifecycle state machine.
//!
//! Status moves monotonically through pending -> processing -> resolved,
//! with processing -> pending as the only reversal (hand-back). `resolved`
//! is terminal. No transition skips a state, so every resolved request has
//! a recorded responder and a processing interval behind it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  Result,
  error::Error,
  request::{Request, RequestStatus},
  user::Role,
};

// ─── Patch types ─────────────────────────────────────────────────────────────

/// The effect a transition has on `assignedResponder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentEffect {
  /// `pending -> processing`: the acting responder takes the request.
  Assign(Uuid),
  /// `processing -> pending`: hand-back; the request returns to the pool.
  Clear,
  /// `processing -> resolved`: the responder is retained for audit.
  Keep,
}

/// The validated field patch a transition applies. Consumed by
/// [`crate::store::DocumentStore::update_request_if_match`], which also
/// bumps the version counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPatch {
  pub status:       RequestStatus,
  pub assignment:   AssignmentEffect,
  pub last_updated: DateTime<Utc>,
}

// ─── Planning ────────────────────────────────────────────────────────────────

/// Validate a transition attempt and plan the patch it applies.
///
/// The caller has already passed the permission evaluator for `update` on
/// requests; this enforces the lifecycle-specific rules on top: legal
/// edges only, and completion/hand-back restricted to the assigned
/// responder with a first-responder override for reassignment.
pub fn plan_transition(
  request: &Request,
  actor_id: Uuid,
  actor_role: Role,
  target: RequestStatus,
  now: DateTime<Utc>,
) -> Result<TransitionPatch> {
  use RequestStatus::*;

  let assignment = match (request.status, target) {
    (Pending, Processing) => AssignmentEffect::Assign(actor_id),
    (Processing, Resolved) => {
      require_assigned_or_override(request, actor_id, actor_role)?;
      AssignmentEffect::Keep
    }
    (Processing, Pending) => {
      require_assigned_or_override(request, actor_id, actor_role)?;
      AssignmentEffect::Clear
    }
    (from, to) => return Err(Error::InvalidTransition { from, to }),
  };

  Ok(TransitionPatch { status: target, assignment, last_updated: now })
}

/// Completion and hand-back belong to the assigned responder; any first
/// responder may override (reassignment path).
fn require_assigned_or_override(
  request: &Request,
  actor_id: Uuid,
  actor_role: Role,
) -> Result<()> {
  if request.assigned_responder == Some(actor_id)
    || actor_role == Role::FirstResponder
  {
    Ok(())
  } else {
    Err(Error::Denied)
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::{AssignmentEffect, plan_transition};
  use crate::{
    error::Error,
    request::{Category, Request, RequestStatus, Urgency},
    user::Role,
  };

  fn request(status: RequestStatus, assigned: Option<Uuid>) -> Request {
    Request {
      id:                 Uuid::new_v4(),
      submitter_id:       Uuid::new_v4(),
      text:               "need water".into(),
      urgency:            Urgency::Unknown,
      category:           Category::Other,
      location:           String::new(),
      status,
      created_at:         Utc::now(),
      last_updated:       None,
      assigned_responder: assigned,
      version:            0,
    }
  }

  #[test]
  fn only_three_edges_are_legal() {
    use RequestStatus::*;
    let actor = Uuid::new_v4();

    for from in [Pending, Processing, Resolved] {
      for to in [Pending, Processing, Resolved] {
        let legal = matches!(
          (from, to),
          (Pending, Processing) | (Processing, Resolved) | (Processing, Pending)
        );
        let req = request(from, Some(actor));
        let result =
          plan_transition(&req, actor, Role::Volunteer, to, Utc::now());
        if legal {
          assert!(result.is_ok(), "{from} -> {to} should be legal");
        } else {
          assert!(
            matches!(result, Err(Error::InvalidTransition { .. })),
            "{from} -> {to} should be invalid"
          );
        }
      }
    }
  }

  #[test]
  fn accept_assigns_the_actor() {
    let actor = Uuid::new_v4();
    let req = request(RequestStatus::Pending, None);

    let patch = plan_transition(
      &req,
      actor,
      Role::Volunteer,
      RequestStatus::Processing,
      Utc::now(),
    )
    .unwrap();

    assert_eq!(patch.status, RequestStatus::Processing);
    assert_eq!(patch.assignment, AssignmentEffect::Assign(actor));
  }

  #[test]
  fn hand_back_clears_the_assignment() {
    let actor = Uuid::new_v4();
    let req = request(RequestStatus::Processing, Some(actor));

    let patch = plan_transition(
      &req,
      actor,
      Role::Volunteer,
      RequestStatus::Pending,
      Utc::now(),
    )
    .unwrap();

    assert_eq!(patch.assignment, AssignmentEffect::Clear);
  }

  #[test]
  fn resolve_keeps_the_responder_for_audit() {
    let actor = Uuid::new_v4();
    let req = request(RequestStatus::Processing, Some(actor));

    let patch = plan_transition(
      &req,
      actor,
      Role::Volunteer,
      RequestStatus::Resolved,
      Utc::now(),
    )
    .unwrap();

    assert_eq!(patch.assignment, AssignmentEffect::Keep);
  }

  #[test]
  fn unassigned_volunteer_cannot_resolve() {
    let assigned = Uuid::new_v4();
    let other = Uuid::new_v4();
    let req = request(RequestStatus::Processing, Some(assigned));

    let result = plan_transition(
      &req,
      other,
      Role::Volunteer,
      RequestStatus::Resolved,
      Utc::now(),
    );
    assert!(matches!(result, Err(Error::Denied)));
  }

  #[test]
  fn first_responder_may_override_resolution() {
    let assigned = Uuid::new_v4();
    let other = Uuid::new_v4();
    let req = request(RequestStatus::Processing, Some(assigned));

    let patch = plan_transition(
      &req,
      other,
      Role::FirstResponder,
      RequestStatus::Resolved,
      Utc::now(),
    )
    .unwrap();
    assert_eq!(patch.assignment, AssignmentEffect::Keep);
  }

  #[test]
  fn resolved_is_terminal_and_idempotently_so() {
    let actor = Uuid::new_v4();
    let req = request(RequestStatus::Resolved, Some(actor));

    for target in
      [RequestStatus::Pending, RequestStatus::Processing, RequestStatus::Resolved]
    {
      for _ in 0..3 {
        let result = plan_transition(
          &req,
          actor,
          Role::FirstResponder,
          target,
          Utc::now(),
        );
        assert!(matches!(result, Err(Error::InvalidTransition { .. })));
      }
    }
  }

  #[test]
  fn pending_cannot_skip_to_resolved() {
    let actor = Uuid::new_v4();
    let req = request(RequestStatus::Pending, None);

    let result = plan_transition(
      &req,
      actor,
      Role::FirstResponder,
      RequestStatus::Resolved,
      Utc::now(),
    );
    assert!(matches!(
      result,
      Err(Error::InvalidTransition {
        from: RequestStatus::Pending,
        to:   RequestStatus::Resolved,
      })
    ));
  }
}
