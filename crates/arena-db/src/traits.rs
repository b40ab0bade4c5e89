//! Store contracts consumed by the API
//!
//! Each lookup returns `AppError::NotFound` on a miss; callers decide what a miss means.

use arena_core::models::{Challenge, NewSubmission, Submission, User};
use arena_core::AppError;
use async_trait::async_trait;
use uuid::Uuid;

use crate::db::{ChallengeRepository, SubmissionRepository, UserRepository};

/// Challenge lookups
#[async_trait]
pub trait Challenges: Send + Sync {
    async fn find(&self, id: i64) -> Result<Challenge, AppError>;
}

/// Submission persistence
#[async_trait]
pub trait Submissions: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Submission, AppError>;

    /// Persist a stamped submission and return it with its assigned identifier.
    async fn add(&self, submission: NewSubmission) -> Result<Submission, AppError>;
}

/// Principal lookups by credential
#[async_trait]
pub trait Users: Send + Sync {
    async fn find_by_api_key(&self, api_key: &str) -> Result<User, AppError>;
}

// Implementations for concrete repository types

#[async_trait]
impl Challenges for ChallengeRepository {
    async fn find(&self, id: i64) -> Result<Challenge, AppError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("challenge {}", id)))
    }
}

#[async_trait]
impl Submissions for SubmissionRepository {
    async fn find(&self, id: Uuid) -> Result<Submission, AppError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("submission {}", id)))
    }

    async fn add(&self, submission: NewSubmission) -> Result<Submission, AppError> {
        self.create(submission).await
    }
}

#[async_trait]
impl Users for UserRepository {
    async fn find_by_api_key(&self, api_key: &str) -> Result<User, AppError> {
        self.get_by_api_key(api_key)
            .await?
            .ok_or_else(|| AppError::NotFound("user".to_string()))
    }
}
