//! Core types and logic for the Beacon request-routing service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::DocumentStore`]; callers drive
//! everything through [`service::RequestService`].

pub mod assignment;
pub mod error;
pub mod lifecycle;
pub mod permission;
pub mod request;
pub mod service;
pub mod store;
pub mod user;
pub mod volunteer;

pub use error::{Error, Result};
