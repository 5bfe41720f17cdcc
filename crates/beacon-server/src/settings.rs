//! Server configuration, deserialised from `config.toml` layered under
//! `BEACON_*` environment overrides.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  /// Upper bound on each persistence-gateway call, in milliseconds.
  /// Elapsed calls surface to clients as 503.
  #[serde(default = "default_request_timeout_ms")]
  pub request_timeout_ms: u64,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("beacon.db") }

fn default_request_timeout_ms() -> u64 { 5_000 }
