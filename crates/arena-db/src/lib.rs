//! Arena stores
//!
//! The challenge, submission and user stores the API consumes, as narrow async
//! contracts with a Postgres implementation and an in-memory one.

pub mod db;
pub mod memory;
pub mod traits;

pub use db::{ChallengeRepository, SubmissionRepository, UserRepository};
pub use memory::{InMemoryChallenges, InMemorySubmissions, InMemoryUsers};
pub use traits::{Challenges, Submissions, Users};
