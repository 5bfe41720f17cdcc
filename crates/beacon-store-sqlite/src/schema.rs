//! SQL schema for the Beacon SQLite store.
//!
//! One table per collection, mirroring the record shapes of the original
//! document store. Executed at connection startup; idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`.

pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id         TEXT PRIMARY KEY,
    email      TEXT NOT NULL UNIQUE,
    full_name  TEXT NOT NULL,
    role       TEXT NOT NULL,   -- 'affected_individual' | 'volunteer' | 'first_responder'
    location   TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL    -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS requests (
    id                 TEXT PRIMARY KEY,
    submitter_id       TEXT NOT NULL REFERENCES users(id),
    text               TEXT NOT NULL,
    urgency            TEXT NOT NULL DEFAULT 'Unknown',
    category           TEXT NOT NULL DEFAULT 'Other',
    location           TEXT NOT NULL DEFAULT '',
    status             TEXT NOT NULL DEFAULT 'pending',
    created_at         TEXT NOT NULL,
    last_updated       TEXT,            -- NULL until the first status change
    assigned_responder TEXT REFERENCES users(id),
    version            INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS volunteer_profiles (
    id           TEXT PRIMARY KEY REFERENCES users(id),
    name         TEXT NOT NULL,
    role         TEXT NOT NULL,
    location     TEXT NOT NULL DEFAULT '',
    specialties  TEXT NOT NULL DEFAULT '[]',  -- JSON array of tags
    availability TEXT NOT NULL DEFAULT '',
    experience   TEXT NOT NULL DEFAULT '',
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS requests_status_idx   ON requests(status);
CREATE INDEX IF NOT EXISTS requests_category_idx ON requests(category);
CREATE INDEX IF NOT EXISTS requests_urgency_idx  ON requests(urgency);

PRAGMA user_version = 1;
";
