pub mod challenge;
pub mod submission;
pub mod user;

pub use challenge::ChallengeRepository;
pub use submission::SubmissionRepository;
pub use user::UserRepository;
