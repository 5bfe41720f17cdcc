//! User — the authenticated identity every operation acts as.
//!
//! Authentication itself is external; Beacon only ever sees an
//! already-authenticated user id plus the role it registered under.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role a user registered under. Immutable after creation — elevation
/// would be a separate workflow, not an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  AffectedIndividual,
  Volunteer,
  FirstResponder,
}

impl Role {
  /// Whether this role is eligible to act on requests (accept, resolve,
  /// hand back).
  pub fn is_responder(self) -> bool {
    matches!(self, Self::Volunteer | Self::FirstResponder)
  }
}

/// A registered user. Serialised field names are the wire contract with
/// records stored by the original application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:         Uuid,
  pub email:      String,
  #[serde(rename = "fullName")]
  pub full_name:  String,
  pub role:       Role,
  pub location:   String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::service::RequestService::create_user`].
/// `id` and `created_at` are assigned by the service, never by callers.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub email:     String,
  #[serde(rename = "fullName")]
  pub full_name: String,
  pub role:      Role,
  #[serde(default)]
  pub location:  String,
}
