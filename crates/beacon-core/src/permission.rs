//! The permission evaluator — the single place access rules live.
//!
//! Pure and deterministic: identical (role, action, resource) input always
//! yields the identical decision, with no I/O and no panics. Rule
//! violations are expressed as [`Decision::Deny`], never as an error;
//! callers must check the result explicitly.

use crate::user::Role;

/// What the actor is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Create,
  Read,
  Update,
}

/// What the action targets. Ownership is resolved by the caller (an id
/// comparison) so the evaluator stays storage-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
  User { is_owner: bool },
  Request,
  VolunteerProfile { is_owner: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Allow,
  Deny,
}

impl Decision {
  pub fn is_allowed(self) -> bool { matches!(self, Self::Allow) }
}

/// Evaluate whether `actor` may perform `action` on `resource`.
pub fn evaluate(actor: Role, action: Action, resource: Resource) -> Decision {
  use {Action::*, Resource::*};

  let allowed = match (resource, action) {
    // A user record is created once by its owner, readable by the owner
    // or any first responder, and writable only by the owner.
    (User { is_owner }, Create | Update) => is_owner,
    (User { is_owner }, Read) => is_owner || actor == Role::FirstResponder,

    // Requests are publicly readable and any authenticated actor may file
    // one, but only responders may update: a submitter can never resolve
    // their own emergency.
    (Request, Create | Read) => true,
    (Request, Update) => actor.is_responder(),

    // Volunteer profiles are public; updates by the owner or a first
    // responder.
    (VolunteerProfile { .. }, Create | Read) => true,
    (VolunteerProfile { is_owner }, Update) => {
      is_owner || actor == Role::FirstResponder
    }
  };

  if allowed { Decision::Allow } else { Decision::Deny }
}

#[cfg(test)]
mod tests {
  use super::{Action::*, Decision, Resource::*, evaluate};
  use crate::user::Role::{self, *};

  const ALL_ROLES: [Role; 3] = [AffectedIndividual, Volunteer, FirstResponder];

  #[test]
  fn user_record_create_is_owner_only() {
    for role in ALL_ROLES {
      assert!(evaluate(role, Create, User { is_owner: true }).is_allowed());
      assert!(!evaluate(role, Create, User { is_owner: false }).is_allowed());
    }
  }

  #[test]
  fn user_record_read_by_owner_or_first_responder() {
    assert!(
      evaluate(AffectedIndividual, Read, User { is_owner: true })
        .is_allowed()
    );
    assert!(
      !evaluate(AffectedIndividual, Read, User { is_owner: false })
        .is_allowed()
    );
    assert!(!evaluate(Volunteer, Read, User { is_owner: false }).is_allowed());
    assert!(
      evaluate(FirstResponder, Read, User { is_owner: false }).is_allowed()
    );
  }

  #[test]
  fn user_record_update_is_owner_only() {
    assert!(
      !evaluate(FirstResponder, Update, User { is_owner: false })
        .is_allowed()
    );
    assert!(
      evaluate(AffectedIndividual, Update, User { is_owner: true })
        .is_allowed()
    );
  }

  #[test]
  fn requests_are_publicly_readable_and_creatable() {
    for role in ALL_ROLES {
      assert!(evaluate(role, Create, Request).is_allowed());
      assert!(evaluate(role, Read, Request).is_allowed());
    }
  }

  #[test]
  fn only_responders_may_update_requests() {
    assert!(!evaluate(AffectedIndividual, Update, Request).is_allowed());
    assert!(evaluate(Volunteer, Update, Request).is_allowed());
    assert!(evaluate(FirstResponder, Update, Request).is_allowed());
  }

  #[test]
  fn profile_update_by_owner_or_first_responder() {
    assert!(
      evaluate(Volunteer, Update, VolunteerProfile { is_owner: true })
        .is_allowed()
    );
    assert!(
      !evaluate(Volunteer, Update, VolunteerProfile { is_owner: false })
        .is_allowed()
    );
    assert!(
      evaluate(FirstResponder, Update, VolunteerProfile { is_owner: false })
        .is_allowed()
    );
  }

  #[test]
  fn evaluate_is_deterministic() {
    for role in ALL_ROLES {
      for action in [Create, Read, Update] {
        for resource in [
          User { is_owner: false },
          Request,
          VolunteerProfile { is_owner: true },
        ] {
          let first = evaluate(role, action, resource);
          for _ in 0..3 {
            assert_eq!(first, evaluate(role, action, resource));
          }
        }
      }
    }
  }

  #[test]
  fn deny_is_a_value_not_a_panic() {
    // Every denied combination comes back as Decision::Deny.
    assert_eq!(
      evaluate(AffectedIndividual, Update, Request),
      Decision::Deny
    );
  }
}
