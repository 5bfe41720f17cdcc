//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns, plus the error
//! translation required of the gateway boundary.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated
//! lowercase strings, specialty tags as compact JSON arrays. Enumeration
//! spellings match the wire contract exactly.

use beacon_core::{
  Error, Result,
  request::{Category, Request, RequestStatus, Urgency},
  user::{Role, User},
  volunteer::VolunteerProfile,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

// ─── Error translation ───────────────────────────────────────────────────────

/// Map a backend failure into the domain taxonomy: unique-constraint
/// violations are `AlreadyExists`, everything else is `Unavailable`.
pub fn translate(e: tokio_rusqlite::Error) -> Error {
  match e {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, msg))
      if f.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      Error::AlreadyExists(
        msg.unwrap_or_else(|| "unique constraint violated".into()),
      )
    }
    other => Error::Unavailable(other.to_string()),
  }
}

/// A stored record that no longer decodes. Reported as `Unavailable`; the
/// taxonomy has no dedicated corruption variant.
fn corrupt(detail: impl std::fmt::Display) -> Error {
  Error::Unavailable(format!("corrupt stored record: {detail}"))
}

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(corrupt)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(corrupt)
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::AffectedIndividual => "affected_individual",
    Role::Volunteer => "volunteer",
    Role::FirstResponder => "first_responder",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "affected_individual" => Ok(Role::AffectedIndividual),
    "volunteer" => Ok(Role::Volunteer),
    "first_responder" => Ok(Role::FirstResponder),
    other => Err(corrupt(format!("unknown role: {other:?}"))),
  }
}

// ─── Urgency ─────────────────────────────────────────────────────────────────

pub fn encode_urgency(u: Urgency) -> &'static str {
  match u {
    Urgency::High => "High",
    Urgency::Medium => "Medium",
    Urgency::Low => "Low",
    Urgency::Unknown => "Unknown",
  }
}

pub fn decode_urgency(s: &str) -> Result<Urgency> {
  match s {
    "High" => Ok(Urgency::High),
    "Medium" => Ok(Urgency::Medium),
    "Low" => Ok(Urgency::Low),
    "Unknown" => Ok(Urgency::Unknown),
    other => Err(corrupt(format!("unknown urgency: {other:?}"))),
  }
}

// ─── Category ────────────────────────────────────────────────────────────────

pub fn encode_category(c: Category) -> &'static str { c.as_str() }

pub fn decode_category(s: &str) -> Result<Category> {
  match s {
    "Medical" => Ok(Category::Medical),
    "Food" => Ok(Category::Food),
    "Shelter" => Ok(Category::Shelter),
    "Evacuation" => Ok(Category::Evacuation),
    "Other" => Ok(Category::Other),
    other => Err(corrupt(format!("unknown category: {other:?}"))),
  }
}

// ─── RequestStatus ───────────────────────────────────────────────────────────

pub fn encode_status(s: RequestStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<RequestStatus> {
  match s {
    "pending" => Ok(RequestStatus::Pending),
    "processing" => Ok(RequestStatus::Processing),
    "resolved" => Ok(RequestStatus::Resolved),
    other => Err(corrupt(format!("unknown status: {other:?}"))),
  }
}

// ─── Specialty tags ──────────────────────────────────────────────────────────

pub fn encode_specialties(tags: &[String]) -> Result<String> {
  serde_json::to_string(tags).map_err(corrupt)
}

pub fn decode_specialties(s: &str) -> Result<Vec<String>> {
  serde_json::from_str(s).map_err(corrupt)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub id:         String,
  pub email:      String,
  pub full_name:  String,
  pub role:       String,
  pub location:   String,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         decode_uuid(&self.id)?,
      email:      self.email,
      full_name:  self.full_name,
      role:       decode_role(&self.role)?,
      location:   self.location,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `requests` row.
pub struct RawRequest {
  pub id:                 String,
  pub submitter_id:       String,
  pub text:               String,
  pub urgency:            String,
  pub category:           String,
  pub location:           String,
  pub status:             String,
  pub created_at:         String,
  pub last_updated:       Option<String>,
  pub assigned_responder: Option<String>,
  pub version:            i64,
}

impl RawRequest {
  pub fn into_request(self) -> Result<Request> {
    Ok(Request {
      id:                 decode_uuid(&self.id)?,
      submitter_id:       decode_uuid(&self.submitter_id)?,
      text:               self.text,
      urgency:            decode_urgency(&self.urgency)?,
      category:           decode_category(&self.category)?,
      location:           self.location,
      status:             decode_status(&self.status)?,
      created_at:         decode_dt(&self.created_at)?,
      last_updated:       self
        .last_updated
        .as_deref()
        .map(decode_dt)
        .transpose()?,
      assigned_responder: self
        .assigned_responder
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      version:            self.version,
    })
  }
}

/// Raw strings read directly from a `volunteer_profiles` row.
pub struct RawProfile {
  pub id:           String,
  pub name:         String,
  pub role:         String,
  pub location:     String,
  pub specialties:  String,
  pub availability: String,
  pub experience:   String,
  pub created_at:   String,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<VolunteerProfile> {
    Ok(VolunteerProfile {
      id:           decode_uuid(&self.id)?,
      name:         self.name,
      role:         decode_role(&self.role)?,
      location:     self.location,
      specialties:  decode_specialties(&self.specialties)?,
      availability: self.availability,
      experience:   self.experience,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
