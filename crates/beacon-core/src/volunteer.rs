//! VolunteerProfile — responder capabilities, keyed 1:1 by user id.
//!
//! A profile is a weak extension of its [`crate::user::User`]: looked up by
//! the same id, never cascade-deleted. Name, role, and location are copied
//! from the user record at registration time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerProfile {
  /// Same UUID as the owning user.
  pub id:           Uuid,
  pub name:         String,
  pub role:         Role,
  pub location:     String,
  /// Specialty tags matched against request categories, e.g. "Medical".
  pub specialties:  Vec<String>,
  /// Free-text availability descriptor, e.g. "weekends".
  pub availability: String,
  /// Free-text experience descriptor.
  pub experience:   String,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::service::RequestService::register_volunteer`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewVolunteerProfile {
  /// The user this profile belongs to; must be a responder role.
  pub user_id:      Uuid,
  #[serde(default)]
  pub specialties:  Vec<String>,
  #[serde(default)]
  pub availability: String,
  #[serde(default)]
  pub experience:   String,
}

/// Partial update for [`crate::service::RequestService::update_volunteer`].
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
  pub location:     Option<String>,
  pub specialties:  Option<Vec<String>>,
  pub availability: Option<String>,
  pub experience:   Option<String>,
}
