//! Request — an emergency-assistance request and its status vocabulary.
//!
//! A request is a shared, independently-addressable resource owned by the
//! service layer: it outlives the session that created it. Serialised
//! field names and enumeration spellings are the wire contract with
//! records stored by the original application.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Submitter-declared urgency. Never inferred from free text; absent means
/// [`Urgency::Unknown`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum Urgency {
  High,
  Medium,
  Low,
  #[default]
  Unknown,
}

/// The kind of assistance requested. Stored under the wire name `type`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum Category {
  Medical,
  Food,
  Shelter,
  Evacuation,
  #[default]
  Other,
}

impl Category {
  /// The tag spelling matched against volunteer specialties.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Medical => "Medical",
      Self::Food => "Food",
      Self::Shelter => "Shelter",
      Self::Evacuation => "Evacuation",
      Self::Other => "Other",
    }
  }
}

/// Where a request sits in its lifecycle. Transitions are validated by
/// [`crate::lifecycle`]; `resolved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
  Pending,
  Processing,
  Resolved,
}

impl RequestStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Processing => "processing",
      Self::Resolved => "resolved",
    }
  }

  /// Whether any further transition is permitted from this status.
  pub fn is_terminal(self) -> bool { matches!(self, Self::Resolved) }
}

impl fmt::Display for RequestStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
  pub id:                 Uuid,
  #[serde(rename = "submitterId")]
  pub submitter_id:       Uuid,
  pub text:               String,
  pub urgency:            Urgency,
  #[serde(rename = "type")]
  pub category:           Category,
  pub location:           String,
  pub status:             RequestStatus,
  /// Creation time; server-assigned, never changes.
  #[serde(rename = "timestamp")]
  pub created_at:         DateTime<Utc>,
  /// Set on every status change and only then; `None` until the first.
  #[serde(rename = "lastUpdated")]
  pub last_updated:       Option<DateTime<Utc>>,
  #[serde(rename = "assignedResponder")]
  pub assigned_responder: Option<Uuid>,
  /// Optimistic-concurrency counter, incremented on every successful
  /// update. The compare-and-update key.
  pub version:            i64,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::service::RequestService::create_request`]. Urgency and
/// category left unset default to `Unknown`/`Other` atomically at creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRequest {
  pub text:     String,
  #[serde(default)]
  pub urgency:  Option<Urgency>,
  #[serde(rename = "type", default)]
  pub category: Option<Category>,
  #[serde(default)]
  pub location: String,
}

/// Filter for [`crate::service::RequestService::list_requests`]; an empty
/// filter matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestFilter {
  pub status:   Option<RequestStatus>,
  #[serde(rename = "type")]
  pub category: Option<Category>,
  pub urgency:  Option<Urgency>,
}
