//! The domain error taxonomy for `beacon-core`.
//!
//! Every fallible operation in the workspace returns one of these variants
//! by value; nothing is thrown, nothing is silently swallowed. Only
//! [`Error::Conflict`] and [`Error::Unavailable`] are meaningful to retry,
//! and retrying is the caller's decision, never the service's.

use thiserror::Error;
use uuid::Uuid;

use crate::request::RequestStatus;

#[derive(Debug, Error)]
pub enum Error {
  /// A create collided with an existing identifier or unique email.
  #[error("already exists: {0}")]
  AlreadyExists(String),

  /// A referenced user, request, or volunteer profile does not exist.
  #[error("not found: {0}")]
  NotFound(Uuid),

  /// The permission evaluator refused the action for this actor.
  #[error("permission denied")]
  Denied,

  /// The requested status change is not an edge of the lifecycle machine.
  #[error("invalid transition: {from} -> {to}")]
  InvalidTransition {
    from: RequestStatus,
    to:   RequestStatus,
  },

  /// Lost a compare-and-update race; re-read and decide whether to retry.
  #[error("concurrent update conflict")]
  Conflict,

  /// The storage backend timed out or failed transiently.
  #[error("storage unavailable: {0}")]
  Unavailable(String),
}

impl Error {
  /// Whether a retry could possibly succeed. `Denied` and
  /// `InvalidTransition` are always terminal for the caller.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::Conflict | Self::Unavailable(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
