//! Multipart submission ingestion

pub mod archive;
pub mod boundary;
pub mod metadata;
pub mod part;
pub mod pipeline;

pub use boundary::{boundary_from_headers, resolve_boundary, BoundaryError};
pub use part::{Part, PartKind};
pub use pipeline::{parse_challenge_id, read_submission, IngestedSubmission, SubmissionIngest};
