//! Data models for the application
//!
//! Challenges, users (principals) and code submissions.

mod challenge;
mod submission;
mod user;

pub use challenge::*;
pub use submission::*;
pub use user::*;
