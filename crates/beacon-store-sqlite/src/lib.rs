//! SQLite implementation of the Beacon persistence gateway.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Backend failures are
//! translated into the `beacon-core` error taxonomy at this boundary;
//! nothing rusqlite-specific leaks out of the crate.

mod encode;
mod schema;
mod store;

pub use store::SqliteStore;

#[cfg(test)]
mod tests;
