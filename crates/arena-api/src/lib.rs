//! Arena API
//!
//! HTTP service accepting code-challenge submissions: a multipart upload with
//! JSON metadata and a zip archive, authenticated by API key.

pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod middleware;
pub mod setup;
pub mod state;
pub mod telemetry;
