//! Canonical client for the target API: structured request payloads, typed
//! response shapes, and a thin wrapper over reqwest.
//!
//! This is the single source of truth for how the harness talks to the
//! backend; every request body goes through a serde encoder, never through
//! string templating.
mod client;
pub mod payload;
pub mod response;

pub use client::ApiClient;
