//! Candidate ranking for new or updated requests.
//!
//! What the original application delegated to an unspecified model is
//! expressed here as an explicit, deterministic scoring function behind
//! the [`Ranker`] seam, so a future classifier can be substituted without
//! touching lifecycle or permission code.

use uuid::Uuid;

use crate::{request::Request, volunteer::VolunteerProfile};

/// The ranking seam: order a candidate pool by fitness for a request,
/// best first. Implementations must be deterministic for identical input.
pub trait Ranker: Send + Sync {
  fn rank(&self, request: &Request, pool: &[VolunteerProfile]) -> Vec<Uuid>;
}

/// Default ranker: specialty match against the request category, then
/// declared availability, then location match, with profile id as the
/// final tiebreak so equal scores order stably.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecialtyRanker;

/// Score components, compared lexicographically. `bool` orders false
/// before true, so descending comparison puts matches first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Score {
  specialty: bool,
  available: bool,
  location:  bool,
}

impl Score {
  fn of(request: &Request, profile: &VolunteerProfile) -> Self {
    let category = request.category.as_str();
    Self {
      specialty: profile
        .specialties
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(category)),
      available: !profile.availability.trim().is_empty(),
      location:  location_matches(&request.location, &profile.location),
    }
  }
}

/// Exact or substring match, case-insensitive. Geocoding is out of scope;
/// two empty locations are not a match.
fn location_matches(request_loc: &str, profile_loc: &str) -> bool {
  let r = request_loc.trim().to_lowercase();
  let p = profile_loc.trim().to_lowercase();
  if r.is_empty() || p.is_empty() {
    return false;
  }
  r == p || r.contains(&p) || p.contains(&r)
}

impl Ranker for SpecialtyRanker {
  fn rank(&self, request: &Request, pool: &[VolunteerProfile]) -> Vec<Uuid> {
    let mut scored: Vec<(Score, Uuid)> = pool
      .iter()
      .map(|profile| (Score::of(request, profile), profile.id))
      .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, id)| id).collect()
  }
}
