//! [`SqliteStore`] — the SQLite implementation of
//! [`beacon_core::store::DocumentStore`].

use std::path::Path;

use beacon_core::{
  Error, Result,
  lifecycle::{AssignmentEffect, TransitionPatch},
  request::{Request, RequestFilter},
  store::DocumentStore,
  user::User,
  volunteer::VolunteerProfile,
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  encode::{
    RawProfile, RawRequest, RawUser, encode_category, encode_dt,
    encode_role, encode_specialties, encode_status, encode_urgency,
    encode_uuid, translate,
  },
  schema::SCHEMA,
};

// ─── Row mapping ─────────────────────────────────────────────────────────────

const REQUEST_COLUMNS: &str = "id, submitter_id, text, urgency, category, \
                               location, status, created_at, last_updated, \
                               assigned_responder, version";

fn read_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    id:         row.get(0)?,
    email:      row.get(1)?,
    full_name:  row.get(2)?,
    role:       row.get(3)?,
    location:   row.get(4)?,
    created_at: row.get(5)?,
  })
}

fn read_request(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRequest> {
  Ok(RawRequest {
    id:                 row.get(0)?,
    submitter_id:       row.get(1)?,
    text:               row.get(2)?,
    urgency:            row.get(3)?,
    category:           row.get(4)?,
    location:           row.get(5)?,
    status:             row.get(6)?,
    created_at:         row.get(7)?,
    last_updated:       row.get(8)?,
    assigned_responder: row.get(9)?,
    version:            row.get(10)?,
  })
}

fn read_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProfile> {
  Ok(RawProfile {
    id:           row.get(0)?,
    name:         row.get(1)?,
    role:         row.get(2)?,
    location:     row.get(3)?,
    specialties:  row.get(4)?,
    availability: row.get(5)?,
    experience:   row.get(6)?,
    created_at:   row.get(7)?,
  })
}

/// Outcome of the conditional UPDATE, resolved inside a single call so the
/// existence probe sees the same connection state.
enum CasOutcome {
  Updated(RawRequest),
  Stale,
  Missing,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Beacon document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(translate)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(translate)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(translate)
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  // ── Users ─────────────────────────────────────────────────────────────

  async fn create_user(&self, user: &User) -> Result<()> {
    let id_str     = encode_uuid(user.id);
    let email      = user.email.clone();
    let full_name  = user.full_name.clone();
    let role_str   = encode_role(user.role).to_owned();
    let location   = user.location.clone();
    let at_str     = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, email, full_name, role, location, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, email, full_name, role_str, location, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(translate)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, email, full_name, role, location, created_at
               FROM users WHERE id = ?1",
              rusqlite::params![id_str],
              read_user,
            )
            .optional()?,
        )
      })
      .await
      .map_err(translate)?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, email, full_name, role, location, created_at
               FROM users WHERE email = ?1",
              rusqlite::params![email],
              read_user,
            )
            .optional()?,
        )
      })
      .await
      .map_err(translate)?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Requests ──────────────────────────────────────────────────────────

  async fn create_request(&self, request: &Request) -> Result<()> {
    let id_str        = encode_uuid(request.id);
    let submitter_str = encode_uuid(request.submitter_id);
    let text          = request.text.clone();
    let urgency_str   = encode_urgency(request.urgency).to_owned();
    let category_str  = encode_category(request.category).to_owned();
    let location      = request.location.clone();
    let status_str    = encode_status(request.status).to_owned();
    let at_str        = encode_dt(request.created_at);
    let updated_str   = request.last_updated.map(encode_dt);
    let responder_str = request.assigned_responder.map(encode_uuid);
    let version       = request.version;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO requests (
             id, submitter_id, text, urgency, category, location,
             status, created_at, last_updated, assigned_responder, version
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            submitter_str,
            text,
            urgency_str,
            category_str,
            location,
            status_str,
            at_str,
            updated_str,
            responder_str,
            version,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(translate)
  }

  async fn get_request(&self, id: Uuid) -> Result<Option<Request>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRequest> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?1"),
              rusqlite::params![id_str],
              read_request,
            )
            .optional()?,
        )
      })
      .await
      .map_err(translate)?;

    raw.map(RawRequest::into_request).transpose()
  }

  async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<Request>> {
    // Build the WHERE clause from whichever filter fields are present;
    // conds and params stay index-aligned.
    let mut conds: Vec<&'static str> = vec![];
    let mut params: Vec<String> = vec![];

    if let Some(status) = filter.status {
      conds.push("status = ?");
      params.push(encode_status(status).to_owned());
    }
    if let Some(category) = filter.category {
      conds.push("category = ?");
      params.push(encode_category(category).to_owned());
    }
    if let Some(urgency) = filter.urgency {
      conds.push("urgency = ?");
      params.push(encode_urgency(urgency).to_owned());
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };

    let raws: Vec<RawRequest> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {REQUEST_COLUMNS} FROM requests {where_clause}
           ORDER BY created_at DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), read_request)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(translate)?;

    raws.into_iter().map(RawRequest::into_request).collect()
  }

  async fn update_request_if_match(
    &self,
    id: Uuid,
    expected_version: i64,
    patch: &TransitionPatch,
  ) -> Result<Request> {
    let id_str      = encode_uuid(id);
    let status_str  = encode_status(patch.status).to_owned();
    let updated_str = encode_dt(patch.last_updated);
    let assignment  = patch.assignment;

    let outcome: CasOutcome = self
      .conn
      .call(move |conn| {
        let rows = match assignment {
          AssignmentEffect::Assign(responder) => conn.execute(
            "UPDATE requests
             SET status = ?1, last_updated = ?2, assigned_responder = ?3,
                 version = version + 1
             WHERE id = ?4 AND version = ?5",
            rusqlite::params![
              status_str,
              updated_str,
              encode_uuid(responder),
              id_str,
              expected_version,
            ],
          )?,
          AssignmentEffect::Clear => conn.execute(
            "UPDATE requests
             SET status = ?1, last_updated = ?2, assigned_responder = NULL,
                 version = version + 1
             WHERE id = ?3 AND version = ?4",
            rusqlite::params![status_str, updated_str, id_str, expected_version],
          )?,
          AssignmentEffect::Keep => conn.execute(
            "UPDATE requests
             SET status = ?1, last_updated = ?2, version = version + 1
             WHERE id = ?3 AND version = ?4",
            rusqlite::params![status_str, updated_str, id_str, expected_version],
          )?,
        };

        if rows == 0 {
          // Distinguish a stale version from a missing row.
          let exists: bool = conn
            .query_row(
              "SELECT 1 FROM requests WHERE id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          return Ok(if exists { CasOutcome::Stale } else { CasOutcome::Missing });
        }

        let raw = conn.query_row(
          &format!("SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?1"),
          rusqlite::params![id_str],
          read_request,
        )?;
        Ok(CasOutcome::Updated(raw))
      })
      .await
      .map_err(translate)?;

    match outcome {
      CasOutcome::Updated(raw) => raw.into_request(),
      CasOutcome::Stale => Err(Error::Conflict),
      CasOutcome::Missing => Err(Error::NotFound(id)),
    }
  }

  // ── Volunteer profiles ────────────────────────────────────────────────

  async fn create_profile(&self, profile: &VolunteerProfile) -> Result<()> {
    let id_str          = encode_uuid(profile.id);
    let name            = profile.name.clone();
    let role_str        = encode_role(profile.role).to_owned();
    let location        = profile.location.clone();
    let specialties_str = encode_specialties(&profile.specialties)?;
    let availability    = profile.availability.clone();
    let experience      = profile.experience.clone();
    let at_str          = encode_dt(profile.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO volunteer_profiles (
             id, name, role, location, specialties,
             availability, experience, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            name,
            role_str,
            location,
            specialties_str,
            availability,
            experience,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(translate)
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<VolunteerProfile>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, role, location, specialties,
                      availability, experience, created_at
               FROM volunteer_profiles WHERE id = ?1",
              rusqlite::params![id_str],
              read_profile,
            )
            .optional()?,
        )
      })
      .await
      .map_err(translate)?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_profiles(&self) -> Result<Vec<VolunteerProfile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, role, location, specialties,
                  availability, experience, created_at
           FROM volunteer_profiles",
        )?;
        let rows = stmt
          .query_map([], read_profile)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(translate)?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn update_profile(&self, profile: &VolunteerProfile) -> Result<()> {
    let id_str          = encode_uuid(profile.id);
    let location        = profile.location.clone();
    let specialties_str = encode_specialties(&profile.specialties)?;
    let availability    = profile.availability.clone();
    let experience      = profile.experience.clone();
    let id              = profile.id;

    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE volunteer_profiles
           SET location = ?1, specialties = ?2, availability = ?3,
               experience = ?4
           WHERE id = ?5",
          rusqlite::params![
            location,
            specialties_str,
            availability,
            experience,
            id_str,
          ],
        )?)
      })
      .await
      .map_err(translate)?;

    if rows == 0 {
      return Err(Error::NotFound(id));
    }
    Ok(())
  }
}
